//! Geometric paths evaluated at eased progress.

use glam::Vec2;
use liftoff_core::{ConfigError, Position};
use serde::{Deserialize, Serialize};

const MIN_BEZIER_POINTS: usize = 3;

/// Geometry traced by a [`crate::ParametricCurve`].
///
/// Every variant is endpoint exact: `point_at(0.0)` is the start anchor and
/// `point_at(1.0)` the end anchor, bit for bit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurvePath {
    /// Quadratic (3 points) or cubic (4 points) Bezier curve. Five or more
    /// points form a Catmull-Rom spline passing through every point.
    Bezier {
        /// Start anchor, inner control points and end anchor, in order.
        points: Vec<Position>,
    },
    /// Straight segment between two anchors.
    Line {
        /// Start anchor.
        start: Position,
        /// End anchor.
        end: Position,
    },
    /// Circular arc about a fixed centre.
    Orbit {
        /// Centre of the orbit.
        center: Position,
        /// Distance from the centre.
        radius: f32,
        /// Angle of the start anchor in radians.
        start_angle: f32,
        /// Signed angle swept over the full curve in radians.
        sweep: f32,
    },
}

impl CurvePath {
    /// Checks that the path can be evaluated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Bezier { points } => {
                if points.len() < MIN_BEZIER_POINTS {
                    return Err(ConfigError::TooFewControlPoints {
                        required: MIN_BEZIER_POINTS,
                        provided: points.len(),
                    });
                }
                check_finite(points.iter().copied())
            }
            Self::Line { start, end } => check_finite([*start, *end]),
            Self::Orbit {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                check_finite([*center, Vec2::new(*start_angle, *sweep)])?;
                if radius.is_finite() && *radius > 0.0 {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidOrbitRadius(*radius))
                }
            }
        }
    }

    /// Evaluates the path at eased progress `u`.
    ///
    /// Values of `u` outside `0.0..=1.0` extrapolate, which non-anchored
    /// rate functions rely on.
    #[must_use]
    pub fn point_at(&self, u: f32) -> Position {
        match self {
            Self::Bezier { points } => match points.as_slice() {
                [p0, p1, p2] => quadratic(*p0, *p1, *p2, u),
                [p0, p1, p2, p3] => cubic(*p0, *p1, *p2, *p3, u),
                points => catmull_rom(points, u),
            },
            Self::Line { start, end } => *start * (1.0 - u) + *end * u,
            Self::Orbit {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let angle = start_angle + sweep * u;
                *center + Vec2::new(angle.cos(), angle.sin()) * *radius
            }
        }
    }

    /// Returns a copy of the path whose end anchor is `end`.
    ///
    /// Orbits keep their radius and sweep and translate their centre instead.
    #[must_use]
    pub fn with_end(&self, end: Position) -> Self {
        match self {
            Self::Bezier { points } => {
                let mut points = points.clone();
                if let Some(last) = points.last_mut() {
                    *last = end;
                }
                Self::Bezier { points }
            }
            Self::Line { start, .. } => Self::Line { start: *start, end },
            Self::Orbit {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let shift = end - self.point_at(1.0);
                Self::Orbit {
                    center: *center + shift,
                    radius: *radius,
                    start_angle: *start_angle,
                    sweep: *sweep,
                }
            }
        }
    }
}

fn check_finite(points: impl IntoIterator<Item = Position>) -> Result<(), ConfigError> {
    match points.into_iter().position(|point| !point.is_finite()) {
        Some(index) => Err(ConfigError::NonFiniteControlPoint { index }),
        None => Ok(()),
    }
}

fn quadratic(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let s = 1.0 - t;
    p0 * (s * s) + p1 * (2.0 * s * t) + p2 * (t * t)
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let s = 1.0 - t;
    p0 * (s * s * s) + p1 * (3.0 * s * s * t) + p2 * (3.0 * s * t * t) + p3 * (t * t * t)
}

fn catmull_rom(points: &[Vec2], u: f32) -> Vec2 {
    let segments = points.len() - 1;
    let scaled = u * segments as f32;
    let index = (scaled.floor().max(0.0) as usize).min(segments - 1);
    let local = scaled - index as f32;

    let p1 = points[index];
    let p2 = points[index + 1];
    if local == 0.0 {
        return p1;
    }
    if local == 1.0 {
        return p2;
    }
    let p0 = if index == 0 {
        p1 * 2.0 - p2
    } else {
        points[index - 1]
    };
    let p3 = points.get(index + 2).copied().unwrap_or(p2 * 2.0 - p1);

    let t2 = local * local;
    let t3 = t2 * local;
    (p1 * 2.0
        + (p2 - p0) * local
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5
}
