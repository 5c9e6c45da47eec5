#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-way threshold state machine driving scene regimes.
//!
//! A [`PhaseController`] starts in an initial phase and walks an ordered list
//! of [`PhaseStage`]s. Each stage is entered once the driving quantity reaches
//! its threshold; entering a stage applies its [`PhaseEffect`] to a
//! [`PhaseEffectSink`] exactly once. The controller never moves backwards
//! until [`PhaseController::reset`] is called.

use std::fmt::Debug;

use liftoff_core::{
    ConfigError, PhaseChangeEvent, PhaseEffectSink, Position, SpawnRateAdjustment,
    VisualParameters,
};
use serde::{Deserialize, Serialize};

/// Declarative side effects applied when a phase is entered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseEffect {
    /// Change forwarded to the emitter's spawn rate.
    #[serde(default)]
    pub spawn_rate: Option<SpawnRateAdjustment>,
    /// Replacement end anchor for the active motion path.
    #[serde(default)]
    pub curve_target: Option<Position>,
    /// Renderer-facing parameters forwarded untouched.
    #[serde(default)]
    pub visuals: VisualParameters,
}

impl PhaseEffect {
    /// Creates an effect that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spawn rate adjustment.
    #[must_use]
    pub fn with_spawn_rate(mut self, adjustment: SpawnRateAdjustment) -> Self {
        self.spawn_rate = Some(adjustment);
        self
    }

    /// Sets the curve target override.
    #[must_use]
    pub fn with_curve_target(mut self, target: Position) -> Self {
        self.curve_target = Some(target);
        self
    }

    /// Adds a named visual parameter.
    #[must_use]
    pub fn with_visual(mut self, name: impl Into<String>, value: f32) -> Self {
        self.visuals.set(name, value);
        self
    }

    /// Reports whether applying the effect would call the sink at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawn_rate.is_none() && self.curve_target.is_none() && self.visuals.is_empty()
    }

    /// Forwards every configured change to `sink`.
    pub fn apply<S: PhaseEffectSink + ?Sized>(&self, sink: &mut S) {
        if let Some(adjustment) = self.spawn_rate {
            sink.adjust_spawn_rate(adjustment);
        }
        if let Some(target) = self.curve_target {
            sink.override_curve_target(target);
        }
        if !self.visuals.is_empty() {
            sink.apply_visual_parameters(&self.visuals);
        }
    }
}

/// Phase entered once the driving quantity reaches `threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseStage<P> {
    /// Phase entered by this stage.
    pub phase: P,
    /// Driving value at which the stage is entered.
    pub threshold: f32,
    /// Effects applied on entry.
    #[serde(default)]
    pub effect: PhaseEffect,
}

impl<P> PhaseStage<P> {
    /// Creates a stage with no effects.
    #[must_use]
    pub fn new(phase: P, threshold: f32) -> Self {
        Self {
            phase,
            threshold,
            effect: PhaseEffect::default(),
        }
    }

    /// Replaces the stage's effect.
    #[must_use]
    pub fn with_effect(mut self, effect: PhaseEffect) -> Self {
        self.effect = effect;
        self
    }
}

/// Ordered, irreversible phase progression.
#[derive(Clone, Debug)]
pub struct PhaseController<P> {
    initial: P,
    stages: Vec<PhaseStage<P>>,
    entered: usize,
}

impl<P: Copy + Eq + Debug> PhaseController<P> {
    /// Creates a controller that starts in `initial` and walks `stages`.
    ///
    /// Fails when no stage is given or when thresholds are not finite and
    /// strictly increasing.
    pub fn new(initial: P, stages: Vec<PhaseStage<P>>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::NoPhaseStages);
        }
        let mut previous = f32::NEG_INFINITY;
        for (index, stage) in stages.iter().enumerate() {
            if !stage.threshold.is_finite() || stage.threshold <= previous {
                return Err(ConfigError::UnorderedThreshold {
                    index,
                    threshold: stage.threshold,
                });
            }
            previous = stage.threshold;
        }
        log::debug!(
            "phase controller configured: initial={initial:?} stages={}",
            stages.len()
        );
        Ok(Self {
            initial,
            stages,
            entered: 0,
        })
    }

    /// Feeds the latest driving value.
    ///
    /// Enters at most the next untraversed phase and returns the transition.
    /// Values below the next threshold, repeated values and NaN produce
    /// nothing.
    pub fn update<S: PhaseEffectSink + ?Sized>(
        &mut self,
        driving: f32,
        sink: &mut S,
    ) -> Option<PhaseChangeEvent<P>> {
        let stage = self.stages.get(self.entered)?;
        if driving.is_nan() || driving < stage.threshold {
            return None;
        }

        let from = self.current();
        let to = stage.phase;
        stage.effect.apply(sink);
        self.entered += 1;

        log::info!("phase changed: {from:?} -> {to:?} at {driving}");
        Some(PhaseChangeEvent {
            from,
            to,
            trigger: driving,
        })
    }

    /// Feeds the latest driving value, entering every phase whose threshold
    /// it reaches and pushing each transition into `out` in order.
    pub fn update_into<S: PhaseEffectSink + ?Sized>(
        &mut self,
        driving: f32,
        sink: &mut S,
        out: &mut Vec<PhaseChangeEvent<P>>,
    ) {
        while let Some(event) = self.update(driving, sink) {
            out.push(event);
        }
    }

    /// Returns to the initial phase. Effects already applied stay applied.
    pub fn reset(&mut self) {
        self.entered = 0;
        log::debug!("phase controller reset to {:?}", self.initial);
    }

    /// Phase the controller is currently in.
    #[must_use]
    pub fn current(&self) -> P {
        match self.entered.checked_sub(1) {
            Some(index) => self.stages[index].phase,
            None => self.initial,
        }
    }

    /// Threshold of the next untraversed stage, if any remain.
    #[must_use]
    pub fn next_threshold(&self) -> Option<f32> {
        self.stages.get(self.entered).map(|stage| stage.threshold)
    }

    /// Reports whether every stage has been entered.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.entered == self.stages.len()
    }

    /// Configured stages in threshold order.
    #[must_use]
    pub fn stages(&self) -> &[PhaseStage<P>] {
        &self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftoff_core::Regime;

    #[derive(Default)]
    struct Recorder {
        calls: usize,
    }

    impl PhaseEffectSink for Recorder {
        fn adjust_spawn_rate(&mut self, _adjustment: SpawnRateAdjustment) {
            self.calls += 1;
        }
    }

    #[test]
    fn empty_effect_never_calls_the_sink() {
        let mut recorder = Recorder::default();
        let effect = PhaseEffect::new();
        assert!(effect.is_empty());
        effect.apply(&mut recorder);
        assert_eq!(recorder.calls, 0);
    }

    #[test]
    fn rejects_missing_stages() {
        let result = PhaseController::<Regime>::new(Regime::Dense, Vec::new());
        assert!(matches!(result, Err(ConfigError::NoPhaseStages)));
    }

    #[test]
    fn rejects_non_finite_threshold() {
        let result = PhaseController::new(
            Regime::Dense,
            vec![PhaseStage::new(Regime::Sparse, f32::NAN)],
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnorderedThreshold { index: 0, .. })
        ));
    }

    #[test]
    fn nan_driving_value_is_ignored() {
        let mut controller =
            PhaseController::new(Regime::Dense, vec![PhaseStage::new(Regime::Sparse, 5.0)])
                .expect("valid");
        assert_eq!(controller.update(f32::NAN, &mut Recorder::default()), None);
        assert_eq!(controller.current(), Regime::Dense);
    }
}
