#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Parametric motion paths evaluated at normalised progress.
//!
//! A [`ParametricCurve`] pairs a [`CurvePath`] with a [`RateFunction`]. Raw
//! progress `t` is first checked against the curve's [`DomainPolicy`], then
//! eased by the rate function and finally mapped onto the path. Evaluation
//! is pure: the same `t` always yields the same position.

mod path;
mod rate;

pub use path::CurvePath;
pub use rate::RateFunction;

use glam::Vec2;
use liftoff_core::{ConfigError, Direction, DomainError, Position, DEFAULT_HEADING};
use serde::{Deserialize, Serialize};

const TANGENT_EPSILON: f32 = 1e-3;
const MIN_TANGENT_LENGTH_SQUARED: f32 = 1e-12;

/// Handling of progress values outside `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    /// Out-of-range progress is reported as a [`DomainError`].
    #[default]
    Reject,
    /// Out-of-range progress is clamped into `0.0..=1.0`.
    Clamp,
}

/// Immutable path with an easing curve applied to its progress.
#[derive(Clone, Debug)]
pub struct ParametricCurve {
    path: CurvePath,
    rate: RateFunction,
    policy: DomainPolicy,
}

impl ParametricCurve {
    /// Creates a curve from a validated path and rate function.
    pub fn new(path: CurvePath, rate: RateFunction) -> Result<Self, ConfigError> {
        path.validate()?;
        Ok(Self {
            path,
            rate,
            policy: DomainPolicy::default(),
        })
    }

    /// Creates a linear-rate quadratic Bezier curve.
    pub fn quadratic(
        start: Position,
        control: Position,
        end: Position,
    ) -> Result<Self, ConfigError> {
        Self::bezier(vec![start, control, end])
    }

    /// Creates a linear-rate cubic Bezier curve.
    pub fn cubic(
        start: Position,
        first: Position,
        second: Position,
        end: Position,
    ) -> Result<Self, ConfigError> {
        Self::bezier(vec![start, first, second, end])
    }

    /// Creates a linear-rate curve through the provided control points.
    pub fn bezier(points: Vec<Position>) -> Result<Self, ConfigError> {
        Self::new(CurvePath::Bezier { points }, RateFunction::Linear)
    }

    /// Creates a straight transfer between two anchors eased by smoothstep.
    pub fn transfer(start: Position, end: Position) -> Result<Self, ConfigError> {
        Self::new(CurvePath::Line { start, end }, RateFunction::Smoothstep)
    }

    /// Creates a linear-rate circular orbit.
    pub fn orbit(
        center: Position,
        radius: f32,
        start_angle: f32,
        sweep: f32,
    ) -> Result<Self, ConfigError> {
        Self::new(
            CurvePath::Orbit {
                center,
                radius,
                start_angle,
                sweep,
            },
            RateFunction::Linear,
        )
    }

    /// Replaces the rate function.
    #[must_use]
    pub fn with_rate(mut self, rate: RateFunction) -> Self {
        self.rate = rate;
        self
    }

    /// Replaces the domain policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DomainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Evaluates the curve at raw progress `t`.
    ///
    /// Under [`DomainPolicy::Reject`] a `t` outside `0.0..=1.0` fails; under
    /// [`DomainPolicy::Clamp`] it is clamped first. Non-finite `t` always fails.
    pub fn evaluate(&self, t: f32) -> Result<Position, DomainError> {
        let t = self.resolve(t)?;
        Ok(self.sample(t))
    }

    /// Evaluates the unit direction of travel at `t`, falling back to
    /// [`DEFAULT_HEADING`] when the motion is momentarily stationary.
    pub fn evaluate_tangent(&self, t: f32) -> Result<Direction, DomainError> {
        self.evaluate_tangent_or(t, DEFAULT_HEADING)
    }

    /// Evaluates the unit direction of travel at `t`, returning `fallback`
    /// (typically the previous heading) when the sampled points coincide.
    pub fn evaluate_tangent_or(
        &self,
        t: f32,
        fallback: Direction,
    ) -> Result<Direction, DomainError> {
        let t = self.resolve(t)?;
        let delta = if t + TANGENT_EPSILON <= 1.0 {
            self.sample(t + TANGENT_EPSILON) - self.sample(t)
        } else {
            self.sample(t) - self.sample(t - TANGENT_EPSILON)
        };
        if delta.is_finite() && delta.length_squared() > MIN_TANGENT_LENGTH_SQUARED {
            Ok(delta.normalize())
        } else {
            Ok(fallback)
        }
    }

    /// Returns a copy of the curve ending at `end`, keeping rate and policy.
    pub fn retarget(&self, end: Position) -> Result<Self, ConfigError> {
        let path = self.path.with_end(end);
        path.validate()?;
        Ok(Self {
            path,
            rate: self.rate,
            policy: self.policy,
        })
    }

    /// Position of the start anchor.
    #[must_use]
    pub fn start(&self) -> Position {
        self.path.point_at(0.0)
    }

    /// Position of the end anchor.
    #[must_use]
    pub fn end(&self) -> Position {
        self.path.point_at(1.0)
    }

    /// Reports whether evaluation at 0 and 1 lands on the anchors.
    ///
    /// Curves driven by a non-anchored rate function (the there-and-back
    /// family, overshooting custom functions) return `false`.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.rate.is_anchored()
    }

    /// Geometry traced by the curve.
    #[must_use]
    pub fn path(&self) -> &CurvePath {
        &self.path
    }

    /// Easing applied to raw progress.
    #[must_use]
    pub fn rate(&self) -> RateFunction {
        self.rate
    }

    /// Handling of out-of-range progress.
    #[must_use]
    pub fn policy(&self) -> DomainPolicy {
        self.policy
    }

    fn resolve(&self, t: f32) -> Result<f32, DomainError> {
        if !t.is_finite() {
            return Err(DomainError::NotFinite);
        }
        if (0.0..=1.0).contains(&t) {
            return Ok(t);
        }
        match self.policy {
            DomainPolicy::Reject => Err(DomainError::OutOfRange(t)),
            DomainPolicy::Clamp => Ok(t.clamp(0.0, 1.0)),
        }
    }

    fn sample(&self, t: f32) -> Vec2 {
        self.path.point_at(self.rate.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_in_range_progress() {
        let curve = ParametricCurve::transfer(Vec2::ZERO, Vec2::ONE).expect("valid curve");
        assert_eq!(curve.resolve(0.25), Ok(0.25));
        assert_eq!(curve.resolve(-0.1), Err(DomainError::OutOfRange(-0.1)));
    }

    #[test]
    fn backward_difference_is_used_near_the_end() {
        let curve = ParametricCurve::quadratic(Vec2::ZERO, Vec2::new(0.0, 4.0), Vec2::new(4.0, 4.0))
            .expect("valid curve");
        let heading = curve.evaluate_tangent(1.0).expect("in range");
        assert!(heading.x > 0.99, "expected rightward heading, got {heading}");
    }
}
