//! Easing curves that remap raw progress before geometric evaluation.

use serde::{Deserialize, Serialize};

const SMOOTH_INFLECTION: f32 = 10.0;
const ANCHOR_TOLERANCE: f32 = 1e-6;
const MAX_PAUSE_RATIO: f32 = 0.99;

/// Mapping from raw progress to eased progress.
///
/// Anchored functions satisfy `f(0) = 0` and `f(1) = 1` exactly. The
/// there-and-back family returns to the start and is therefore non-anchored:
/// a curve driven by it ends where it began, which is how pulse effects are
/// built.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateFunction {
    /// Identity mapping.
    Linear,
    /// Sigmoid ease in and out.
    #[default]
    Smooth,
    /// Cubic Hermite ease `t²(3 - 2t)`.
    Smoothstep,
    /// First half of [`RateFunction::Smooth`] stretched to the full range.
    RushInto,
    /// Second half of [`RateFunction::Smooth`] stretched to the full range.
    RushFrom,
    /// Exponential ease out.
    EaseOutExpo,
    /// Smoothly out to the end and back again. Non-anchored.
    ThereAndBack,
    /// Like [`RateFunction::ThereAndBack`] but holding at the far end. Non-anchored.
    ThereAndBackWithPause {
        /// Fraction of the duration spent holding at the far end.
        pause_ratio: f32,
    },
    /// Caller-supplied pure function. May overshoot.
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl RateFunction {
    /// Maps raw progress `t` to eased progress.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Smooth => pinned(t, smooth),
            Self::Smoothstep => pinned(t, |t| t * t * (3.0 - 2.0 * t)),
            Self::RushInto => pinned(t, |t| 2.0 * smooth(t / 2.0)),
            Self::RushFrom => pinned(t, |t| 2.0 * smooth(t / 2.0 + 0.5) - 1.0),
            Self::EaseOutExpo => pinned(t, |t| 1.0 - 2.0_f32.powf(-10.0 * t)),
            Self::ThereAndBack => {
                let folded = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
                pinned(folded, smooth)
            }
            Self::ThereAndBackWithPause { pause_ratio } => {
                there_and_back_with_pause(t, pause_ratio)
            }
            Self::Custom(function) => function(t),
        }
    }

    /// Reports whether the function maps 0 to 0 and 1 to 1.
    #[must_use]
    pub fn is_anchored(self) -> bool {
        self.apply(0.0).abs() <= ANCHOR_TOLERANCE
            && (self.apply(1.0) - 1.0).abs() <= ANCHOR_TOLERANCE
    }
}

fn pinned(t: f32, ease: impl Fn(f32) -> f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        ease(t)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn smooth(t: f32) -> f32 {
    let error = sigmoid(-SMOOTH_INFLECTION / 2.0);
    let raw = (sigmoid(SMOOTH_INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error);
    raw.clamp(0.0, 1.0)
}

fn there_and_back_with_pause(t: f32, pause_ratio: f32) -> f32 {
    let pause_ratio = if pause_ratio.is_finite() {
        pause_ratio.clamp(0.0, MAX_PAUSE_RATIO)
    } else {
        0.0
    };
    let slope = 2.0 / (1.0 - pause_ratio);
    if t < 0.5 - pause_ratio / 2.0 {
        pinned(slope * t, smooth)
    } else if t < 0.5 + pause_ratio / 2.0 {
        1.0
    } else {
        pinned(slope - slope * t, smooth)
    }
}
