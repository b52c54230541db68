//! Comparison curves for the fastest-descent demonstration.
//!
//! Every generator is a pure function of [`DescentConfig`]. All four curves
//! start at the origin and finish at [`endpoint`], sampled at the counts in
//! [`SamplingConfig`](crate::config::SamplingConfig) without resampling.

use crate::config::DescentConfig;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Cycloid,
    StraightLine,
    VerticalHorizontal,
    Arc,
}

impl CurveKind {
    pub const ALL: [CurveKind; 4] = [
        CurveKind::Cycloid,
        CurveKind::StraightLine,
        CurveKind::VerticalHorizontal,
        CurveKind::Arc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Cycloid => "cycloid",
            CurveKind::StraightLine => "straight_line",
            CurveKind::VerticalHorizontal => "vertical_horizontal",
            CurveKind::Arc => "arc",
        }
    }

    pub fn generate(self, config: &DescentConfig) -> Curve {
        match self {
            CurveKind::Cycloid => invert_cycloid(config),
            CurveKind::StraightLine => straight_line(config),
            CurveKind::VerticalHorizontal => vertical_horizontal_line(config),
            CurveKind::Arc => arc_curve(config),
        }
    }
}

/// An immutable polyline sampled along one of the comparison paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    kind: CurveKind,
    points: Vec<Point2<f64>>,
}

impl Curve {
    pub fn new(kind: CurveKind, points: Vec<Point2<f64>>) -> Self {
        Self { kind, points }
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2<f64>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2<f64>> {
        self.points.last()
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| nalgebra::distance(&pair[0], &pair[1]))
            .sum()
    }
}

/// End point shared by every curve: the cycloid evaluated at the sweep angle.
pub fn endpoint(config: &DescentConfig) -> Point2<f64> {
    let phi = config.sweep_angle;
    Point2::new(
        config.radius * (phi - phi.sin()),
        -config.radius * (1.0 - phi.cos()),
    )
}

/// Inverted cycloid, the brachistochrone between the origin and [`endpoint`].
pub fn invert_cycloid(config: &DescentConfig) -> Curve {
    let r = config.radius;
    let points = linspace(0.0, config.sweep_angle, config.sampling.cycloid)
        .map(|phi| Point2::new(r * (phi - phi.sin()), -r * (1.0 - phi.cos())))
        .collect();
    Curve::new(CurveKind::Cycloid, points)
}

pub fn straight_line(config: &DescentConfig) -> Curve {
    let end = endpoint(config);
    let points = segment(Point2::origin(), end, config.sampling.line).collect();
    Curve::new(CurveKind::StraightLine, points)
}

/// Vertical drop to the end height followed by a horizontal run. The corner
/// is sampled by both legs, so the curve holds one zero-length segment.
pub fn vertical_horizontal_line(config: &DescentConfig) -> Curve {
    let end = endpoint(config);
    let corner = Point2::new(0.0, end.y);
    let points = segment(Point2::origin(), corner, config.sampling.vertical)
        .chain(segment(corner, end, config.sampling.horizontal))
        .collect();
    Curve::new(CurveKind::VerticalHorizontal, points)
}

/// Circular arc through the origin and [`endpoint`], tangent to the vertical
/// at the origin (centre on the x axis).
pub fn arc_curve(config: &DescentConfig) -> Curve {
    let end = endpoint(config);
    let theta = (-end.y).atan2(end.x);
    let arc_radius = end.x.hypot(end.y) / (2.0 * theta.cos());
    let center = Point2::new(arc_radius, 0.0);
    let points = linspace(PI, PI + (PI - 2.0 * theta), config.sampling.arc)
        .map(|angle| {
            Point2::new(
                center.x + arc_radius * angle.cos(),
                center.y + arc_radius * angle.sin(),
            )
        })
        .collect();
    Curve::new(CurveKind::Arc, points)
}

/// The four comparison curves, in [`CurveKind::ALL`] order.
pub fn all_curves(config: &DescentConfig) -> Vec<Curve> {
    CurveKind::ALL
        .iter()
        .map(|kind| kind.generate(config))
        .collect()
}

/// `count` evenly spaced values; the last one is exactly `end`.
fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (end - start) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| {
        if i + 1 == count && count > 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

fn segment(from: Point2<f64>, to: Point2<f64>, count: usize) -> impl Iterator<Item = Point2<f64>> {
    linspace(from.x, to.x, count)
        .zip(linspace(from.y, to.y, count))
        .map(|(x, y)| Point2::new(x, y))
}
