//! Cumulative travel times along a curve and nearest-time sample lookup.
//!
//! A bead released from rest at the origin slides without friction, so its
//! speed at depth `|y|` is `sqrt(2 g |y|)`. Each segment is traversed at the
//! mean of its two endpoint speeds.

use crate::curves::Curve;
use crate::error::{ensure_positive, DescentError, DescentResult};
use log::warn;
use serde::{Deserialize, Serialize};

/// What to do with a segment of positive length whose mean speed is zero,
/// i.e. one that runs along `y = 0` from the release point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ZeroSpeedPolicy {
    #[default]
    Reject,
    /// Floor applied to the mean speed of every positive-length segment.
    ClampSpeed {
        min_speed: f64,
    },
    /// Keep the infinite duration; see [`TimeProfile::first_non_finite`].
    Propagate,
}

impl ZeroSpeedPolicy {
    pub fn validate(&self) -> DescentResult<()> {
        match *self {
            ZeroSpeedPolicy::ClampSpeed { min_speed } => ensure_positive("min_speed", min_speed),
            ZeroSpeedPolicy::Reject | ZeroSpeedPolicy::Propagate => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeProfile {
    times: Vec<f64>,
}

impl TimeProfile {
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Arrival time at the last sample.
    pub fn final_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Index of the first infinite or NaN entry, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.times.iter().position(|t| !t.is_finite())
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.times.windows(2).all(|pair| pair[1] >= pair[0])
    }
}

/// Speed reached after dropping `|height|` from rest.
pub fn sliding_speed(height: f64, gravity: f64) -> f64 {
    (2.0 * gravity * height.abs()).sqrt()
}

pub fn compute_time_profile(
    curve: &Curve,
    gravity: f64,
    policy: ZeroSpeedPolicy,
) -> DescentResult<TimeProfile> {
    if curve.is_empty() {
        return Err(DescentError::EmptyCurve);
    }
    ensure_positive("gravity", gravity)?;
    policy.validate()?;

    let points = curve.points();
    let mut elapsed = 0.0;
    let mut times = Vec::with_capacity(points.len());
    times.push(elapsed);

    for (offset, pair) in points.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let length = nalgebra::distance(prev, next);
        let speed = 0.5 * (sliding_speed(next.y, gravity) + sliding_speed(prev.y, gravity));

        let duration = if length == 0.0 {
            0.0
        } else {
            match policy {
                // Also covers tiny positive speeds left by rounding near y = 0.
                ZeroSpeedPolicy::ClampSpeed { min_speed } => length / speed.max(min_speed),
                _ if speed > 0.0 => length / speed,
                ZeroSpeedPolicy::Reject => {
                    return Err(DescentError::ZeroSpeedSegment { index: offset + 1 })
                }
                ZeroSpeedPolicy::Propagate => length / speed,
            }
        };
        elapsed += duration;
        times.push(elapsed);
    }

    let profile = TimeProfile { times };
    if let Some(index) = profile.first_non_finite() {
        warn!(
            "{} time profile is non-finite from sample {index}",
            curve.kind().as_str()
        );
    }
    Ok(profile)
}

/// A curve sample tagged with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

/// Returns the sample whose arrival time is closest to `target`. The lowest
/// index wins ties; NaN entries are never chosen over a comparable one.
pub fn find_closest(target: f64, curve: &Curve, profile: &TimeProfile) -> DescentResult<CurveSample> {
    if !target.is_finite() {
        return Err(DescentError::invalid(
            "target",
            format!("must be finite, got {target}"),
        ));
    }
    if curve.is_empty() {
        return Err(DescentError::EmptyCurve);
    }
    if profile.len() != curve.len() {
        return Err(DescentError::LengthMismatch {
            curve: curve.len(),
            profile: profile.len(),
        });
    }

    let mut best = 0;
    let mut best_gap = f64::INFINITY;
    for (index, t) in profile.times().iter().enumerate() {
        let gap = (target - t).abs();
        if gap < best_gap {
            best = index;
            best_gap = gap;
        }
    }

    let point = curve.points()[best];
    Ok(CurveSample {
        index: best,
        x: point.x,
        y: point.y,
        t: profile.times()[best],
    })
}

#[cfg(test)]
mod tests {
    use super::{compute_time_profile, find_closest, sliding_speed, TimeProfile, ZeroSpeedPolicy};
    use crate::config::DescentConfig;
    use crate::curves::{all_curves, vertical_horizontal_line, Curve, CurveKind};
    use crate::error::DescentError;
    use nalgebra::Point2;

    const G: f64 = 9.8;

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T, DescentError>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    fn flat_start() -> Curve {
        Curve::new(
            CurveKind::StraightLine,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, -1.0),
            ],
        )
    }

    #[test]
    fn profiles_start_at_zero_and_never_decrease() {
        let config = DescentConfig::default();
        for curve in all_curves(&config) {
            let profile = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
                .expect("default curves have no zero-speed segments");
            assert_eq!(profile.len(), curve.len());
            assert_eq!(profile.times()[0], 0.0);
            assert!(profile.is_non_decreasing(), "{:?}", curve.kind());
            assert!(profile.first_non_finite().is_none());
        }
    }

    #[test]
    fn vertical_drop_matches_free_fall() {
        let curve = Curve::new(
            CurveKind::VerticalHorizontal,
            vec![Point2::new(0.0, 0.0), Point2::new(0.0, -5.0)],
        );
        let profile = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
            .expect("profile should compute");
        let expected = (2.0 * 5.0 / G).sqrt();
        assert!((profile.final_time() - expected).abs() < 1e-12);
    }

    #[test]
    fn corner_segment_adds_no_time() {
        let config = DescentConfig::default();
        let curve = vertical_horizontal_line(&config);
        let profile = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
            .expect("profile should compute");
        let corner = config.sampling.vertical - 1;
        assert_eq!(profile.times()[corner], profile.times()[corner + 1]);
    }

    #[test]
    fn zero_speed_segment_is_rejected_by_default() {
        let result = compute_time_profile(&flat_start(), G, ZeroSpeedPolicy::Reject);
        assert_eq!(result, Err(DescentError::ZeroSpeedSegment { index: 1 }));
    }

    #[test]
    fn zero_speed_segment_can_be_clamped() {
        let policy = ZeroSpeedPolicy::ClampSpeed { min_speed: 0.5 };
        let profile =
            compute_time_profile(&flat_start(), G, policy).expect("clamped profile computes");
        assert_eq!(profile.times()[1], 2.0);
        let drop = 1.0 / (0.5 * sliding_speed(1.0, G));
        assert!((profile.times()[2] - (2.0 + drop)).abs() < 1e-12);
    }

    #[test]
    fn clamp_covers_near_zero_speeds() {
        let curve = Curve::new(
            CurveKind::StraightLine,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, -1e-30),
                Point2::new(1.0, -1.0),
            ],
        );
        let policy = ZeroSpeedPolicy::ClampSpeed { min_speed: 0.5 };
        let profile = compute_time_profile(&curve, G, policy).expect("clamped profile computes");
        assert_eq!(profile.times()[1], 2.0);
        let drop = 1.0 / (0.5 * sliding_speed(1.0, G));
        assert!((profile.times()[2] - (2.0 + drop)).abs() < 1e-12);

        // Without clamping the near-flat leg takes an absurdly long time.
        let unclamped = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
            .expect("positive speed is not rejected");
        assert!(unclamped.times()[1] > 1e12);
    }

    #[test]
    fn zero_speed_segment_can_propagate() {
        let profile = compute_time_profile(&flat_start(), G, ZeroSpeedPolicy::Propagate)
            .expect("propagated profile computes");
        assert_eq!(profile.times()[0], 0.0);
        assert!(profile.times()[1].is_infinite());
        assert_eq!(profile.first_non_finite(), Some(1));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let empty = Curve::new(CurveKind::Arc, Vec::new());
        assert_eq!(
            compute_time_profile(&empty, G, ZeroSpeedPolicy::Reject),
            Err(DescentError::EmptyCurve)
        );
        assert_err_contains(
            compute_time_profile(&flat_start(), 0.0, ZeroSpeedPolicy::Reject),
            "gravity",
        );
        assert_err_contains(
            compute_time_profile(
                &flat_start(),
                G,
                ZeroSpeedPolicy::ClampSpeed { min_speed: -1.0 },
            ),
            "min_speed",
        );
    }

    #[test]
    fn single_sample_curve_has_zero_profile() {
        let curve = Curve::new(CurveKind::Cycloid, vec![Point2::new(0.0, 0.0)]);
        let profile = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
            .expect("single sample profile computes");
        assert_eq!(profile.times(), &[0.0]);
        let sample = find_closest(3.0, &curve, &profile).expect("lookup succeeds");
        assert_eq!(sample.index, 0);
    }

    #[test]
    fn find_closest_snaps_to_endpoints() {
        let config = DescentConfig::default();
        for curve in all_curves(&config) {
            let profile = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
                .expect("profile should compute");
            let last = curve.last().copied().expect("curve has samples");

            let start = find_closest(0.0, &curve, &profile).expect("lookup succeeds");
            assert_eq!(start.index, 0);
            assert!(start.x.abs() < 1e-6 && start.y.abs() < 1e-6);

            let end = find_closest(profile.final_time(), &curve, &profile)
                .expect("lookup succeeds");
            assert_eq!((end.x, end.y), (last.x, last.y));
            assert_eq!(end.t, profile.final_time());

            let before = find_closest(-1.0, &curve, &profile).expect("lookup succeeds");
            assert_eq!(before.index, 0);
            let after = find_closest(profile.final_time() + 10.0, &curve, &profile)
                .expect("lookup succeeds");
            assert_eq!(after.index, curve.len() - 1);
        }
    }

    #[test]
    fn find_closest_prefers_lowest_index_on_ties() {
        let config = DescentConfig::default();
        let curve = vertical_horizontal_line(&config);
        let profile = compute_time_profile(&curve, G, ZeroSpeedPolicy::Reject)
            .expect("profile should compute");
        let corner = config.sampling.vertical - 1;
        let sample = find_closest(profile.times()[corner], &curve, &profile)
            .expect("lookup succeeds");
        assert_eq!(sample.index, corner);

        let curve = Curve::new(
            CurveKind::StraightLine,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, -1.0), Point2::new(2.0, -2.0)],
        );
        let profile = TimeProfile {
            times: vec![0.0, 1.0, 2.0],
        };
        let sample = find_closest(1.5, &curve, &profile).expect("lookup succeeds");
        assert_eq!(sample.index, 1);
    }

    #[test]
    fn find_closest_skips_nan_times() {
        let curve = Curve::new(
            CurveKind::StraightLine,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, -1.0), Point2::new(2.0, -2.0)],
        );
        let profile = TimeProfile {
            times: vec![0.0, f64::NAN, 5.0],
        };
        let sample = find_closest(4.0, &curve, &profile).expect("lookup succeeds");
        assert_eq!(sample.index, 2);
    }

    #[test]
    fn find_closest_validates_inputs() {
        let config = DescentConfig::default();
        let curve = vertical_horizontal_line(&config);
        let short = TimeProfile {
            times: vec![0.0, 1.0],
        };
        assert_eq!(
            find_closest(0.5, &curve, &short),
            Err(DescentError::LengthMismatch {
                curve: curve.len(),
                profile: 2,
            })
        );
        let empty = Curve::new(CurveKind::Arc, Vec::new());
        assert_eq!(
            find_closest(0.5, &empty, &TimeProfile { times: Vec::new() }),
            Err(DescentError::EmptyCurve)
        );
        assert_err_contains(find_closest(f64::NAN, &curve, &short), "target");
    }
}
