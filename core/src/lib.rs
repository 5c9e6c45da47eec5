#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Liftoff simulation kernel.
//!
//! This crate defines the vocabulary that connects the pure systems (curves,
//! particles, phases, starfields), the authoritative world and the adapters.
//! Adapters submit [`Command`] values, the world executes them through its
//! `apply` entry point and broadcasts [`Event`] values describing what
//! changed. Renderers never touch simulation state directly; they read
//! [`ParticleView`] snapshots and react to [`PhaseChangeEvent`]s.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Planar coordinate expressed in scene units.
pub type Position = Vec2;

/// Rate of change of a [`Position`] measured in scene units per second.
pub type Velocity = Vec2;

/// Unit-length heading.
pub type Direction = Vec2;

/// Heading reported when a tangent cannot be derived from the path.
pub const DEFAULT_HEADING: Direction = Vec2::Y;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Fires an ignition burst that fills free plume slots immediately.
    Ignite {
        /// Maximum number of particles to emit in the burst.
        burst: usize,
    },
    /// Overrides the plume spawn rate starting with the next tick.
    SetSpawnRate {
        /// New probability-per-second of spawning into each free slot.
        rate: f32,
    },
    /// Returns the world to its freshly configured state.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an ignition burst was emitted.
    Ignited {
        /// Number of particles the burst placed into the pool.
        spawned: usize,
    },
    /// Announces that the flight entered a new regime.
    PhaseChanged(PhaseChangeEvent<Regime>),
    /// Reports particles that entered the plume during a tick.
    ParticlesSpawned {
        /// Number of newly spawned particles.
        count: usize,
    },
    /// Reports particles that reached the end of their lifespan during a tick.
    ParticlesRetired {
        /// Number of retired particles.
        count: usize,
    },
    /// Confirms that a phase effect replaced the flight path's end anchor.
    CurveRetargeted {
        /// New end anchor of the flight path.
        end: Position,
    },
    /// Announces that the vehicle reached the end of its flight path.
    FlightCompleted,
}

/// Physical regime of a launch, generalised from the atmosphere/space split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    /// Thick atmosphere: dense plume, bright glows.
    Dense,
    /// Thin atmosphere or vacuum: sparse plume, long concentrated flame.
    Sparse,
}

/// Describes a single transition performed by a phase controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseChangeEvent<P> {
    /// Phase that was active before the transition.
    pub from: P,
    /// Phase that became active.
    pub to: P,
    /// Driving value that crossed the threshold.
    pub trigger: f32,
}

/// Change applied to a particle system's spawn rate when a phase is entered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpawnRateAdjustment {
    /// Adds the provided amount to the current rate.
    Offset(f32),
    /// Replaces the current rate with the provided value.
    Absolute(f32),
}

impl SpawnRateAdjustment {
    /// Resolves the adjusted rate, never producing a negative or non-finite value.
    #[must_use]
    pub fn resolve(self, current: f32) -> f32 {
        let rate = match self {
            Self::Offset(delta) => current + delta,
            Self::Absolute(rate) => rate,
        };
        if rate.is_finite() {
            rate.max(0.0)
        } else {
            0.0
        }
    }
}

/// Named scalar parameters forwarded verbatim to the rendering collaborator.
///
/// The kernel attaches no meaning to the names; `glow_opacity` or
/// `body_scale` are whatever the renderer decides they are.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualParameters {
    values: BTreeMap<String, f32>,
}

impl VisualParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with the provided parameter added or replaced.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set(name, value);
        self
    }

    /// Adds or replaces a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        let _ = self.values.insert(name.into(), value);
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    /// Overlays every parameter of `other` onto this set.
    pub fn merge(&mut self, other: &VisualParameters) {
        for (name, value) in &other.values {
            let _ = self.values.insert(name.clone(), *value);
        }
    }

    /// Iterator over the parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of parameters in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Reports whether the set holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collaborator that receives the side effects of entering a phase.
///
/// Every method defaults to a no-op so that implementors only handle the
/// effects they own.
pub trait PhaseEffectSink {
    /// Adjusts the spawn rate of the emitter bound to the sink.
    fn adjust_spawn_rate(&mut self, _adjustment: SpawnRateAdjustment) {}

    /// Replaces the end anchor of the active motion path.
    fn override_curve_target(&mut self, _target: Position) {}

    /// Applies renderer-facing parameters.
    fn apply_visual_parameters(&mut self, _parameters: &VisualParameters) {}
}

/// Immutable representation of a single drawable point used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    /// Pool slot (or star index) that produced the snapshot.
    pub slot: usize,
    /// Current position of the point.
    pub position: Position,
    /// Derived opacity in the range `0.0..=1.0`.
    pub opacity: f32,
}

/// Read-only snapshot describing every live point of an effect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    snapshots: Vec<ParticleSnapshot>,
}

impl ParticleView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ParticleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.slot);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of snapshots in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ParticleSnapshot> {
        self.snapshots
    }
}

/// Invalid setup detected while constructing or configuring a component.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The particle pool must hold at least one slot.
    #[error("particle pool capacity must be greater than zero")]
    ZeroCapacity,
    /// Lifespan bounds must be finite and strictly positive.
    #[error("lifespan bounds must be finite and positive, got {min}..={max}")]
    NonPositiveLifespan {
        /// Lower bound of the rejected range.
        min: f32,
        /// Upper bound of the rejected range.
        max: f32,
    },
    /// The lower lifespan bound exceeds the upper bound.
    #[error("lifespan range is inverted: {min} > {max}")]
    InvertedLifespan {
        /// Lower bound of the rejected range.
        min: f32,
        /// Upper bound of the rejected range.
        max: f32,
    },
    /// The lifespan range is too wide to draw from.
    #[error("lifespan range {min}..={max} is too wide to sample")]
    LifespanTooWide {
        /// Lower bound of the rejected range.
        min: f32,
        /// Upper bound of the rejected range.
        max: f32,
    },
    /// Spawn rates must be finite and non-negative.
    #[error("spawn rate must be finite and non-negative, got {0}")]
    InvalidSpawnRate(f32),
    /// The initial velocity policy cannot produce valid draws.
    #[error("invalid velocity policy: {0}")]
    InvalidVelocityPolicy(&'static str),
    /// Spawn jitter must be finite and non-negative on both axes.
    #[error("spawn jitter must be finite, non-negative and samplable, got {0}")]
    InvalidJitter(Vec2),
    /// Peak opacity must lie inside `0.0..=1.0` and be ordered.
    #[error("peak opacity range must be ordered within 0..=1, got {min}..={max}")]
    InvalidOpacity {
        /// Lower bound of the rejected range.
        min: f32,
        /// Upper bound of the rejected range.
        max: f32,
    },
    /// A curve was built with too few control points.
    #[error("curve requires at least {required} control points, got {provided}")]
    TooFewControlPoints {
        /// Minimum number of control points for the curve kind.
        required: usize,
        /// Number of control points supplied.
        provided: usize,
    },
    /// A control point contains NaN or infinite coordinates.
    #[error("control point {index} is not finite")]
    NonFiniteControlPoint {
        /// Index of the offending control point.
        index: usize,
    },
    /// Orbit radius must be finite and strictly positive.
    #[error("orbit radius must be finite and positive, got {0}")]
    InvalidOrbitRadius(f32),
    /// A phase controller needs at least one transition.
    #[error("phase controller requires at least one transition stage")]
    NoPhaseStages,
    /// Phase thresholds must be finite and strictly increasing.
    #[error("phase threshold {threshold} at stage {index} is not finite or not increasing")]
    UnorderedThreshold {
        /// Index of the offending stage.
        index: usize,
        /// Threshold configured for the stage.
        threshold: f32,
    },
    /// Starfield parameters cannot produce a valid layer.
    #[error("invalid starfield configuration: {0}")]
    InvalidStarfield(&'static str),
    /// A flight must last a non-zero amount of time.
    #[error("flight duration must be greater than zero")]
    ZeroFlightDuration,
}

/// Curve progress supplied outside the evaluable domain.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum DomainError {
    /// Progress lies outside `0.0..=1.0` and the curve rejects it.
    #[error("curve progress {0} lies outside 0..=1")]
    OutOfRange(f32),
    /// Progress is NaN or infinite.
    #[error("curve progress is not a finite number")]
    NotFinite,
}
