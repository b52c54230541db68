//! Synchronised race between the comparison curves.
//!
//! Every curve gets its time profile once; frames then sample all curves at
//! the same reference time so a renderer can draw the beads side by side.

use crate::config::DescentConfig;
use crate::curves::{all_curves, Curve, CurveKind};
use crate::error::DescentResult;
use crate::profile::{compute_time_profile, find_closest, CurveSample, TimeProfile};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveRun {
    pub curve: Curve,
    pub profile: TimeProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrivalTime {
    pub kind: CurveKind,
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub kind: CurveKind,
    pub sample: CurveSample,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentFrame {
    pub index: usize,
    pub t_ref: f64,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentSummary {
    pub ranking: Vec<ArrivalTime>,
    pub fastest: Option<CurveKind>,
}

#[derive(Debug, Clone)]
pub struct DescentComparison {
    config: DescentConfig,
    runs: Vec<CurveRun>,
}

impl DescentComparison {
    /// Builds the four standard curves from `config`.
    pub fn new(config: DescentConfig) -> DescentResult<Self> {
        Self::from_curves(config, all_curves(&config))
    }

    /// Races arbitrary curves under the physics in `config`.
    pub fn from_curves(config: DescentConfig, curves: Vec<Curve>) -> DescentResult<Self> {
        config.validate()?;
        let mut runs = Vec::with_capacity(curves.len());
        for curve in curves {
            let profile = compute_time_profile(&curve, config.gravity, config.zero_speed)?;
            debug!(
                "{}: {} samples, length {:.3} m, arrival {:.3} s",
                curve.kind().as_str(),
                curve.len(),
                curve.length(),
                profile.final_time()
            );
            runs.push(CurveRun { curve, profile });
        }
        let comparison = Self { config, runs };
        for arrival in comparison.final_times() {
            info!("{} arrives after {:.3} s", arrival.kind.as_str(), arrival.time);
        }
        Ok(comparison)
    }

    pub fn config(&self) -> &DescentConfig {
        &self.config
    }

    pub fn runs(&self) -> &[CurveRun] {
        &self.runs
    }

    pub fn run(&self, kind: CurveKind) -> Option<&CurveRun> {
        self.runs.iter().find(|run| run.curve.kind() == kind)
    }

    /// Arrival time of each curve, in construction order.
    pub fn final_times(&self) -> Vec<ArrivalTime> {
        self.runs
            .iter()
            .map(|run| ArrivalTime {
                kind: run.curve.kind(),
                time: run.profile.final_time(),
            })
            .collect()
    }

    /// Arrival times sorted fastest first; non-finite times sort last.
    pub fn ranking(&self) -> Vec<ArrivalTime> {
        let mut times = self.final_times();
        times.sort_by(|a, b| match (a.time.is_finite(), b.time.is_finite()) {
            (true, true) => a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => std::cmp::Ordering::Equal,
        });
        times
    }

    pub fn summary(&self) -> DescentSummary {
        let ranking = self.ranking();
        let fastest = ranking
            .first()
            .filter(|arrival| arrival.time.is_finite())
            .map(|arrival| arrival.kind);
        DescentSummary { ranking, fastest }
    }

    /// Latest finite arrival time, or zero when there is none.
    pub fn max_time(&self) -> f64 {
        self.runs
            .iter()
            .map(|run| run.profile.final_time())
            .filter(|t| t.is_finite())
            .fold(0.0, f64::max)
    }

    /// `0, dt, 2 dt, ...` strictly below `max_time + dt`.
    pub fn reference_times(&self) -> impl Iterator<Item = f64> {
        let dt = self.config.dt;
        let count = ((self.max_time() + dt) / dt).ceil().max(0.0) as usize;
        (0..count).map(move |k| k as f64 * dt)
    }

    pub fn frame_at(&self, index: usize, t_ref: f64) -> DescentResult<DescentFrame> {
        let markers = self
            .runs
            .iter()
            .map(|run| {
                find_closest(t_ref, &run.curve, &run.profile).map(|sample| Marker {
                    kind: run.curve.kind(),
                    sample,
                })
            })
            .collect::<DescentResult<Vec<_>>>()?;
        Ok(DescentFrame {
            index,
            t_ref,
            markers,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = DescentResult<DescentFrame>> + '_ {
        self.reference_times()
            .enumerate()
            .map(move |(index, t_ref)| self.frame_at(index, t_ref))
    }
}
