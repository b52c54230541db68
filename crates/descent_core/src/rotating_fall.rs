//! Object released from a tower on a rotating Earth, in polar coordinates.
//!
//! The object state is integrated in the inertial frame, where only gravity
//! acts; the observer at the top of the tower simply co-rotates with the
//! Earth. Comparing the two angles exposes the eastward (Coriolis) drift.

use crate::config::FallConfig;
use crate::error::DescentResult;
use crate::solvers::{integrate_span, ExplicitRungeKutta};
use crate::traits::{DynamicalSystem, Scalar, Steppable};
use log::{debug, info};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// `(r, θ, ṙ, θ̇)` of the falling object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallState {
    pub r: f64,
    pub theta: f64,
    pub r_dot: f64,
    pub theta_dot: f64,
}

impl FallState {
    pub const DIM: usize = 4;

    /// At rest on top of the tower, co-rotating with the Earth.
    pub fn released(config: &FallConfig) -> Self {
        Self {
            r: config.earth_radius + config.initial_height,
            theta: FRAC_PI_2,
            r_dot: 0.0,
            theta_dot: config.omega,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.theta, self.r_dot, self.theta_dot]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        let [r, theta, r_dot, theta_dot] = values;
        Self {
            r,
            theta,
            r_dot,
            theta_dot,
        }
    }

    /// Integrates over one interval of length `dt` split into `substeps`
    /// solver steps and returns the new state.
    pub fn advance<S: Steppable<f64>>(
        self,
        system: &FallSystem,
        stepper: &mut S,
        dt: f64,
        substeps: usize,
    ) -> Self {
        let mut values = self.to_array();
        let mut t = 0.0;
        integrate_span(stepper, system, &mut t, &mut values, dt, substeps);
        Self::from_array(values)
    }
}

/// Time derivative of `state` under `gravity`:
/// `r̈ = r θ̇² − g`, `θ̈ = −2 ṙ θ̇ / r`. Singular at `r = 0`.
pub fn state_dot(state: &FallState, gravity: f64) -> FallState {
    let mut out = [0.0; 4];
    FallSystem { gravity }.apply(0.0, &state.to_array(), &mut out);
    FallState::from_array(out)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallSystem {
    pub gravity: f64,
}

impl<T: Scalar> DynamicalSystem<T> for FallSystem {
    fn dimension(&self) -> usize {
        FallState::DIM
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let (r, r_dot, theta_dot) = (x[0], x[2], x[3]);
        let two = T::lit(2.0);
        out[0] = r_dot;
        out[1] = theta_dot;
        out[2] = r * theta_dot * theta_dot - T::lit(self.gravity);
        out[3] = -(two * r_dot * theta_dot) / r;
    }
}

/// Reference point on the ground rotating at a constant rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverState {
    pub r: f64,
    pub theta: f64,
    pub r_dot: f64,
    pub theta_dot: f64,
}

impl ObserverState {
    pub fn released(config: &FallConfig) -> Self {
        let state = FallState::released(config);
        Self {
            r: state.r,
            theta: state.theta,
            r_dot: state.r_dot,
            theta_dot: state.theta_dot,
        }
    }

    /// Euler step of the angle; radius and rates are constant.
    pub fn advance(self, dt: f64) -> Self {
        Self {
            theta: self.theta + dt * self.theta_dot,
            ..self
        }
    }
}

/// Whole-Earth picture: radii shifted so the surface sits at `draw_radius`,
/// angles about the top exaggerated by `angle_exaggeration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EarthView {
    pub object: Point2<f64>,
    pub observer: Point2<f64>,
    /// Orientation of the drawn Earth disc.
    pub earth_rotation: f64,
    /// Direction of the marker pointing from the centre to the observer.
    pub observer_heading: f64,
}

/// Object position seen from the tower top, in metres; the observer sits at
/// `(0, initial_height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundView {
    pub object: Point2<f64>,
    pub observer: Point2<f64>,
}

impl GroundView {
    pub fn drift_cm(&self) -> f64 {
        self.object.x * 100.0
    }
}

fn exaggerate(theta: f64, config: &FallConfig) -> f64 {
    (theta - FRAC_PI_2) * config.angle_exaggeration + FRAC_PI_2
}

fn to_display(r: f64, theta: f64, config: &FallConfig) -> Point2<f64> {
    let r = r - config.earth_radius + config.draw_radius;
    let theta = exaggerate(theta, config);
    Point2::new(r * theta.cos(), r * theta.sin())
}

pub fn earth_view(object: &FallState, observer: &ObserverState, config: &FallConfig) -> EarthView {
    let observer_point = to_display(observer.r, observer.theta, config);
    EarthView {
        object: to_display(object.r, object.theta, config),
        observer: observer_point,
        earth_rotation: exaggerate(observer.theta, config),
        observer_heading: observer_point.y.atan2(observer_point.x),
    }
}

pub fn ground_view(object: &FallState, observer: &ObserverState, config: &FallConfig) -> GroundView {
    let relative = object.theta - observer.theta;
    GroundView {
        object: Point2::new(
            -object.r * relative.sin(),
            object.r * relative.cos() - observer.r + config.initial_height,
        ),
        observer: Point2::new(0.0, config.initial_height),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FallPhase {
    Falling,
    Landed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FallOutcome {
    /// The object reached the surface during step `step`, at `time`.
    Landed { step: usize, time: f64 },
    /// `max_steps` frames were produced without landing.
    StepLimit { steps: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallFrame {
    pub step: usize,
    pub time: f64,
    pub object: FallState,
    pub observer: ObserverState,
    pub earth_view: EarthView,
    pub ground_view: GroundView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallRun {
    pub frames: Vec<FallFrame>,
    pub outcome: FallOutcome,
}

/// Steps the object and observer in lockstep, yielding one frame per
/// interval until the object lands or `max_steps` is reached.
pub struct FallSimulation {
    config: FallConfig,
    system: FallSystem,
    stepper: ExplicitRungeKutta<f64>,
    object: FallState,
    observer: ObserverState,
    step: usize,
    phase: FallPhase,
    outcome: Option<FallOutcome>,
}

impl FallSimulation {
    pub fn new(config: FallConfig) -> DescentResult<Self> {
        config.validate()?;
        debug!(
            "fall simulation: h = {} m, dt = {} s, stepper = {}",
            config.initial_height,
            config.dt,
            config.stepper.as_str()
        );
        Ok(Self {
            system: FallSystem {
                gravity: config.gravity,
            },
            stepper: config.stepper.build(FallState::DIM),
            object: FallState::released(&config),
            observer: ObserverState::released(&config),
            step: 0,
            phase: FallPhase::Falling,
            outcome: None,
            config,
        })
    }

    pub fn config(&self) -> &FallConfig {
        &self.config
    }

    pub fn phase(&self) -> FallPhase {
        self.phase
    }

    pub fn object(&self) -> FallState {
        self.object
    }

    pub fn observer(&self) -> ObserverState {
        self.observer
    }

    /// Set once the iterator is exhausted.
    pub fn outcome(&self) -> Option<FallOutcome> {
        self.outcome
    }

    pub fn run(mut self) -> FallRun {
        let frames: Vec<FallFrame> = self.by_ref().collect();
        let outcome = self
            .outcome
            .unwrap_or(FallOutcome::StepLimit { steps: self.step });
        FallRun { frames, outcome }
    }
}

impl Iterator for FallSimulation {
    type Item = FallFrame;

    fn next(&mut self) -> Option<FallFrame> {
        if self.phase == FallPhase::Landed {
            return None;
        }
        if self.step >= self.config.max_steps {
            self.outcome = Some(FallOutcome::StepLimit { steps: self.step });
            return None;
        }

        let step = self.step;
        self.step += 1;
        let time = self.step as f64 * self.config.dt;

        self.object = self.object.advance(
            &self.system,
            &mut self.stepper,
            self.config.dt,
            self.config.substeps,
        );
        self.observer = self.observer.advance(self.config.dt);

        if self.object.r <= self.config.earth_radius {
            self.phase = FallPhase::Landed;
            self.outcome = Some(FallOutcome::Landed { step, time });
            info!("object landed at step {step} (t = {time:.1} s)");
            return None;
        }

        Some(FallFrame {
            step,
            time,
            object: self.object,
            observer: self.observer,
            earth_view: earth_view(&self.object, &self.observer, &self.config),
            ground_view: ground_view(&self.object, &self.observer, &self.config),
        })
    }
}
