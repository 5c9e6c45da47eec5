#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ambient twinkling star layer.
//!
//! Stars are scattered once from a seeded generator and then evolve
//! deterministically: each star's twinkle phase advances with its own speed
//! and the whole layer drifts by a constant velocity, wrapping around a padded
//! frame so the sky never empties. Snapshots reuse [`ParticleView`] so a
//! renderer draws stars and particles the same way.

use std::time::Duration;

use glam::Vec2;
use liftoff_core::{ConfigError, ParticleSnapshot, ParticleView, Position, Velocity};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Tuning for one star layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars in the layer.
    pub count: usize,
    /// Half width and half height of the visible frame, centred on the origin.
    pub half_extents: Vec2,
    /// Extra band around the frame that stars travel through before wrapping.
    pub margin: f32,
    /// Bounds of each star's resting opacity.
    pub base_opacity: (f32, f32),
    /// Bounds of each star's twinkle speed in radians per second.
    pub twinkle_speed: (f32, f32),
    /// Strength of the twinkle modulation.
    pub amplitude: f32,
    /// Lowest opacity a star ever shows.
    pub floor: f32,
    /// Constant layer velocity.
    pub drift: Velocity,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 100,
            half_extents: Vec2::new(7.1, 4.0),
            margin: 1.0,
            base_opacity: (0.18, 0.85),
            twinkle_speed: (0.5, 1.5),
            amplitude: 0.45,
            floor: 0.06,
            drift: Vec2::ZERO,
        }
    }
}

impl StarfieldConfig {
    /// Far, middle and near layers drifting left at increasing speed.
    #[must_use]
    pub fn parallax_layers() -> [Self; 3] {
        let layer = |count: usize, speed: f32, amplitude: f32| Self {
            count,
            amplitude,
            drift: Vec2::NEG_X * speed,
            ..Self::default()
        };
        [
            layer(90, 0.108, 0.45),
            layer(60, 0.252, 0.45),
            layer(30, 0.54, 0.6),
        ]
    }

    /// Checks every parameter, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidStarfield("star count must be positive"));
        }
        if !self.half_extents.is_finite() || self.half_extents.min_element() <= 0.0 {
            return Err(ConfigError::InvalidStarfield(
                "half extents must be finite and positive",
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidStarfield(
                "margin must be finite and non-negative",
            ));
        }
        if !(self.padded() * 4.0).is_finite() {
            return Err(ConfigError::InvalidStarfield(
                "padded frame is too large to sample",
            ));
        }
        let (low, high) = self.base_opacity;
        if !ordered(low, high) || low < 0.0 || high > 1.0 {
            return Err(ConfigError::InvalidStarfield(
                "base opacity must be ordered within 0..=1",
            ));
        }
        let (low, high) = self.twinkle_speed;
        if !ordered(low, high) || low < 0.0 {
            return Err(ConfigError::InvalidStarfield(
                "twinkle speed must be ordered and non-negative",
            ));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(ConfigError::InvalidStarfield(
                "amplitude must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.floor) {
            return Err(ConfigError::InvalidStarfield("floor must lie within 0..=1"));
        }
        if !self.drift.is_finite() {
            return Err(ConfigError::InvalidStarfield("drift must be finite"));
        }
        Ok(())
    }

    fn padded(&self) -> Vec2 {
        self.half_extents + Vec2::splat(self.margin)
    }
}

fn ordered(low: f32, high: f32) -> bool {
    low.is_finite() && high.is_finite() && low <= high && ((high - low) * 2.0).is_finite()
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f32, f32)) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Star {
    position: Position,
    base_opacity: f32,
    phase: f32,
    speed: f32,
}

/// Layer of stars advanced in discrete ticks.
#[derive(Clone, Debug)]
pub struct Starfield {
    config: StarfieldConfig,
    stars: Vec<Star>,
}

impl Starfield {
    /// Scatters a layer using a ChaCha generator seeded with `seed`.
    pub fn seeded(config: StarfieldConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Scatters a layer drawing positions and twinkle parameters from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        config: StarfieldConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let extents = config.half_extents;
        let stars = (0..config.count)
            .map(|_| Star {
                position: Vec2::new(
                    rng.gen_range(-extents.x..=extents.x),
                    rng.gen_range(-extents.y..=extents.y),
                ),
                base_opacity: uniform(rng, config.base_opacity),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
                speed: uniform(rng, config.twinkle_speed),
            })
            .collect();
        log::debug!(
            "starfield scattered: count={} drift={}",
            config.count,
            config.drift
        );
        Ok(Self { config, stars })
    }

    /// Advances twinkle phases and drifts the layer by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        if dt <= 0.0 {
            return;
        }
        let padded = self.config.padded();
        let shift = self.config.drift * dt;
        for star in &mut self.stars {
            star.phase = (star.phase + dt * star.speed).rem_euclid(std::f32::consts::TAU);
            star.position = wrap(star.position + shift, padded);
        }
    }

    /// Captures every star's position and twinkle opacity in index order.
    #[must_use]
    pub fn snapshot(&self) -> ParticleView {
        let snapshots = self
            .stars
            .iter()
            .enumerate()
            .map(|(slot, star)| ParticleSnapshot {
                slot,
                position: star.position,
                opacity: self.opacity(star),
            })
            .collect();
        ParticleView::from_snapshots(snapshots)
    }

    /// Number of stars in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Reports whether the layer has no stars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Configuration the layer was scattered with.
    #[must_use]
    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    fn opacity(&self, star: &Star) -> f32 {
        let twinkle = 0.75 + self.config.amplitude * star.phase.sin().abs();
        (star.base_opacity * twinkle)
            .max(self.config.floor)
            .clamp(0.0, 1.0)
    }
}

fn wrap(position: Position, padded: Vec2) -> Position {
    let span = padded * 2.0;
    Vec2::new(
        (position.x + padded.x).rem_euclid(span.x) - padded.x,
        (position.y + padded.y).rem_euclid(span.y) - padded.y,
    )
}
