//! Emission tuning surface and its validation.

use glam::Vec2;
use liftoff_core::ConfigError;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Closed interval `min..=max` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Inclusive lower bound.
    pub min: f32,
    /// Inclusive upper bound.
    pub max: f32,
}

impl Interval {
    /// Creates an interval from its bounds.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Creates a degenerate interval that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Creates an interval symmetric about zero.
    #[must_use]
    pub const fn symmetric(extent: f32) -> Self {
        Self::new(-extent, extent)
    }

    /// Reports whether both bounds are finite and ordered.
    ///
    /// Twice the width must also be finite, which keeps uniform draws from
    /// overflowing.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && ((self.max - self.min) * 2.0).is_finite()
    }

    /// Draws a value uniformly from the interval.
    ///
    /// Degenerate and unordered intervals yield `min` without drawing.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min && self.is_ordered() {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// Distribution of the initial velocity given to freshly spawned particles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VelocityPolicy {
    /// Every particle starts with the same velocity.
    Fixed {
        /// Initial velocity.
        velocity: Vec2,
    },
    /// Random direction inside an angular cone with a random speed.
    Cone {
        /// Direction bounds in radians, measured counter-clockwise from +X.
        angle: Interval,
        /// Speed bounds in scene units per second.
        speed: Interval,
        /// Multiplier applied to the drawn velocity.
        scale: f32,
    },
    /// Independent normal draws per axis.
    Gaussian {
        /// Mean velocity.
        mean: Vec2,
        /// Standard deviation per axis.
        std_dev: Vec2,
    },
}

impl VelocityPolicy {
    pub(crate) fn sampler(&self) -> Result<VelocitySampler, ConfigError> {
        match *self {
            Self::Fixed { velocity } => {
                if velocity.is_finite() {
                    Ok(VelocitySampler::Fixed(velocity))
                } else {
                    Err(ConfigError::InvalidVelocityPolicy("fixed velocity must be finite"))
                }
            }
            Self::Cone { angle, speed, scale } => {
                if !angle.is_ordered() {
                    return Err(ConfigError::InvalidVelocityPolicy(
                        "cone angle bounds must be finite and ordered",
                    ));
                }
                if !speed.is_ordered() || speed.min < 0.0 {
                    return Err(ConfigError::InvalidVelocityPolicy(
                        "cone speed bounds must be finite, ordered and non-negative",
                    ));
                }
                if !scale.is_finite() {
                    return Err(ConfigError::InvalidVelocityPolicy("cone scale must be finite"));
                }
                Ok(VelocitySampler::Cone { angle, speed, scale })
            }
            Self::Gaussian { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(ConfigError::InvalidVelocityPolicy("gaussian mean must be finite"));
                }
                let invalid = || {
                    ConfigError::InvalidVelocityPolicy(
                        "gaussian deviation must be finite and non-negative",
                    )
                };
                if !std_dev.is_finite() {
                    return Err(invalid());
                }
                let horizontal = Normal::new(mean.x, std_dev.x).map_err(|_| invalid())?;
                let vertical = Normal::new(mean.y, std_dev.y).map_err(|_| invalid())?;
                Ok(VelocitySampler::Gaussian {
                    horizontal,
                    vertical,
                })
            }
        }
    }
}

/// Validated, ready-to-draw form of a [`VelocityPolicy`].
#[derive(Clone, Copy, Debug)]
pub(crate) enum VelocitySampler {
    Fixed(Vec2),
    Cone {
        angle: Interval,
        speed: Interval,
        scale: f32,
    },
    Gaussian {
        horizontal: Normal<f32>,
        vertical: Normal<f32>,
    },
}

impl VelocitySampler {
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self {
            Self::Fixed(velocity) => *velocity,
            Self::Cone { angle, speed, scale } => {
                let angle = angle.sample(rng);
                let speed = speed.sample(rng);
                Vec2::new(angle.cos(), angle.sin()) * speed * *scale
            }
            Self::Gaussian {
                horizontal,
                vertical,
            } => Vec2::new(horizontal.sample(rng), vertical.sample(rng)),
        }
    }
}

/// Emission parameters for a [`crate::ParticleSystem`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Number of particle slots in the pool.
    pub capacity: usize,
    /// Probability per second that a free slot spawns a particle.
    pub spawn_rate: f32,
    /// Bounds of the lifespan drawn for each particle, in seconds.
    pub lifespan: Interval,
    /// Distribution of initial velocities.
    pub velocity: VelocityPolicy,
    /// Half extents of the box around the emitter in which particles appear.
    #[serde(default)]
    pub jitter: Vec2,
    /// Bounds of the opacity a particle shows at birth.
    #[serde(default = "full_opacity")]
    pub peak_opacity: Interval,
}

fn full_opacity() -> Interval {
    Interval::fixed(1.0)
}

impl EmitterConfig {
    /// Creates a configuration with no spawn jitter and full peak opacity.
    #[must_use]
    pub fn new(
        capacity: usize,
        spawn_rate: f32,
        lifespan: Interval,
        velocity: VelocityPolicy,
    ) -> Self {
        Self {
            capacity,
            spawn_rate,
            lifespan,
            velocity,
            jitter: Vec2::ZERO,
            peak_opacity: full_opacity(),
        }
    }

    /// Overrides the spawn jitter half extents.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Vec2) -> Self {
        self.jitter = jitter;
        self
    }

    /// Overrides the peak opacity bounds.
    #[must_use]
    pub fn with_peak_opacity(mut self, peak_opacity: Interval) -> Self {
        self.peak_opacity = peak_opacity;
        self
    }

    /// Checks every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.velocity_sampler()?;
        Ok(())
    }

    pub(crate) fn velocity_sampler(&self) -> Result<VelocitySampler, ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.spawn_rate.is_finite() || self.spawn_rate < 0.0 {
            return Err(ConfigError::InvalidSpawnRate(self.spawn_rate));
        }

        let Interval { min, max } = self.lifespan;
        if !min.is_finite() || !max.is_finite() || min <= 0.0 {
            return Err(ConfigError::NonPositiveLifespan { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedLifespan { min, max });
        }
        if !self.lifespan.is_ordered() {
            return Err(ConfigError::LifespanTooWide { min, max });
        }

        let jitter_ordered = Interval::symmetric(self.jitter.x).is_ordered()
            && Interval::symmetric(self.jitter.y).is_ordered();
        if !jitter_ordered {
            return Err(ConfigError::InvalidJitter(self.jitter));
        }

        let Interval { min, max } = self.peak_opacity;
        if !self.peak_opacity.is_ordered() || min < 0.0 || max > 1.0 {
            return Err(ConfigError::InvalidOpacity { min, max });
        }

        self.velocity.sampler()
    }
}
