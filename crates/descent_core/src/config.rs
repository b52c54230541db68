//! Physical constants and sampling settings for both demonstrations.
//!
//! Both structs deserialize with `#[serde(default)]`, so a partial JSON
//! document only overrides the fields it names.

use crate::error::{ensure_positive, DescentError, DescentResult};
use crate::profile::ZeroSpeedPolicy;
use crate::solvers::Stepper;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallConfig {
    /// Gravitational acceleration [m/s^2].
    pub gravity: f64,
    /// Angular velocity of the Earth [rad/s].
    pub omega: f64,
    /// Surface radius the object lands on [m].
    pub earth_radius: f64,
    /// Radius of the Earth disc in the earth view.
    pub draw_radius: f64,
    /// Release height above the surface [m].
    pub initial_height: f64,
    /// Frame interval [s].
    pub dt: f64,
    pub max_steps: usize,
    /// Solver sub-steps per frame interval.
    pub substeps: usize,
    /// Factor applied to angles in the earth view so the rotation is visible.
    pub angle_exaggeration: f64,
    pub stepper: Stepper,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            omega: 2.0 * PI / 24.0 / 3600.0,
            earth_radius: 6378.0 * 1000.0 / 2.0,
            draw_radius: 800.0,
            initial_height: 158.5,
            dt: 0.1,
            max_steps: 100,
            substeps: 10,
            angle_exaggeration: 3600.0,
            stepper: Stepper::Rk4,
        }
    }
}

impl FallConfig {
    pub fn validate(&self) -> DescentResult<()> {
        ensure_positive("gravity", self.gravity)?;
        ensure_positive("earth_radius", self.earth_radius)?;
        ensure_positive("dt", self.dt)?;
        ensure_positive("draw_radius", self.draw_radius)?;
        if !self.omega.is_finite() {
            return Err(DescentError::invalid("omega", "must be finite"));
        }
        if !self.initial_height.is_finite() || self.initial_height < 0.0 {
            return Err(DescentError::invalid(
                "initial_height",
                format!("must be non-negative, got {}", self.initial_height),
            ));
        }
        if !self.angle_exaggeration.is_finite() {
            return Err(DescentError::invalid("angle_exaggeration", "must be finite"));
        }
        if self.max_steps == 0 {
            return Err(DescentError::invalid("max_steps", "must be at least 1"));
        }
        if self.substeps == 0 {
            return Err(DescentError::invalid("substeps", "must be at least 1"));
        }
        Ok(())
    }
}

/// Number of points sampled along each comparison curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub cycloid: usize,
    pub line: usize,
    pub vertical: usize,
    pub horizontal: usize,
    pub arc: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            cycloid: 100,
            line: 1000,
            vertical: 50,
            horizontal: 50,
            arc: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescentConfig {
    /// Radius of the rolling circle that traces the cycloid [m].
    pub radius: f64,
    /// Final cycloid parameter; fixes the shared end point [rad].
    pub sweep_angle: f64,
    pub gravity: f64,
    /// Spacing of reference times between frames [s].
    pub dt: f64,
    pub sampling: SamplingConfig,
    pub zero_speed: ZeroSpeedPolicy,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            sweep_angle: 1.3 * PI,
            gravity: 9.8,
            dt: 0.1,
            sampling: SamplingConfig::default(),
            zero_speed: ZeroSpeedPolicy::default(),
        }
    }
}

impl DescentConfig {
    pub fn validate(&self) -> DescentResult<()> {
        ensure_positive("radius", self.radius)?;
        ensure_positive("gravity", self.gravity)?;
        ensure_positive("dt", self.dt)?;
        // Past a full turn the end point returns to y = 0 and the
        // vertical-horizontal and arc curves collapse.
        if !self.sweep_angle.is_finite() || self.sweep_angle <= 0.0 || self.sweep_angle >= 2.0 * PI
        {
            return Err(DescentError::invalid(
                "sweep_angle",
                format!("must lie in (0, 2π), got {}", self.sweep_angle),
            ));
        }
        let counts = [
            ("sampling.cycloid", self.sampling.cycloid),
            ("sampling.line", self.sampling.line),
            ("sampling.vertical", self.sampling.vertical),
            ("sampling.horizontal", self.sampling.horizontal),
            ("sampling.arc", self.sampling.arc),
        ];
        for (name, count) in counts {
            if count < 2 {
                return Err(DescentError::invalid(
                    name,
                    format!("needs at least 2 samples, got {count}"),
                ));
            }
        }
        self.zero_speed.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{DescentConfig, FallConfig};
    use crate::error::DescentError;
    use crate::profile::ZeroSpeedPolicy;
    use crate::solvers::Stepper;

    fn assert_invalid(result: Result<(), DescentError>, field: &str) {
        match result {
            Err(DescentError::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid `{field}`, got {other:?}"),
        }
    }

    #[test]
    fn defaults_validate() {
        FallConfig::default().validate().expect("fall defaults are valid");
        DescentConfig::default().validate().expect("descent defaults are valid");
    }

    #[test]
    fn earth_rotation_rate_is_one_turn_per_day() {
        let config = FallConfig::default();
        assert!((config.omega * 86_400.0 - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn fall_config_rejects_bad_values() {
        let mut config = FallConfig::default();
        config.gravity = 0.0;
        assert_invalid(config.validate(), "gravity");

        let mut config = FallConfig::default();
        config.initial_height = -1.0;
        assert_invalid(config.validate(), "initial_height");

        let mut config = FallConfig::default();
        config.substeps = 0;
        assert_invalid(config.validate(), "substeps");

        let mut config = FallConfig::default();
        config.dt = f64::NAN;
        assert_invalid(config.validate(), "dt");
    }

    #[test]
    fn descent_config_rejects_bad_values() {
        let mut config = DescentConfig::default();
        config.sweep_angle = 2.0 * std::f64::consts::PI;
        assert_invalid(config.validate(), "sweep_angle");

        let mut config = DescentConfig::default();
        config.sampling.horizontal = 1;
        assert_invalid(config.validate(), "sampling.horizontal");

        let mut config = DescentConfig::default();
        config.zero_speed = ZeroSpeedPolicy::ClampSpeed { min_speed: 0.0 };
        assert_invalid(config.validate(), "min_speed");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: FallConfig =
            serde_json::from_str(r#"{ "initial_height": 50.0, "stepper": "tsit5" }"#)
                .expect("partial fall config parses");
        assert_eq!(config.initial_height, 50.0);
        assert_eq!(config.stepper, Stepper::Tsit5);
        assert_eq!(config.max_steps, 100);

        let config: DescentConfig = serde_json::from_str(
            r#"{ "sampling": { "line": 20 }, "zero_speed": { "policy": "propagate" } }"#,
        )
        .expect("partial descent config parses");
        assert_eq!(config.sampling.line, 20);
        assert_eq!(config.sampling.cycloid, 100);
        assert_eq!(config.zero_speed, ZeroSpeedPolicy::Propagate);
        assert_eq!(config.radius, 10.0);
    }
}
