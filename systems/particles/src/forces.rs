//! Perturbation closures handed to [`crate::ParticleSystem::tick`].
//!
//! A perturbation receives the particle after it moved and the step length in
//! seconds, and returns the velocity change to apply before aging.

use glam::Vec2;
use liftoff_core::Velocity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Interval, Particle};

/// Leaves every velocity untouched.
pub fn none() -> impl FnMut(&Particle, f32) -> Velocity {
    |_: &Particle, _: f32| Vec2::ZERO
}

/// Constant acceleration, e.g. `Vec2::new(0.0, -0.04)` for a slow sag.
pub fn gravity(acceleration: Vec2) -> impl FnMut(&Particle, f32) -> Velocity {
    move |_: &Particle, dt: f32| acceleration * dt
}

/// Linear drag removing `coefficient * velocity * dt`.
///
/// The removed share is capped at the whole velocity so a large step never
/// reverses direction.
pub fn drag(coefficient: f32) -> impl FnMut(&Particle, f32) -> Velocity {
    move |particle: &Particle, dt: f32| -particle.velocity() * (coefficient * dt).clamp(0.0, 1.0)
}

/// Sums the changes returned by two perturbations.
pub fn combine<A, B>(mut first: A, mut second: B) -> impl FnMut(&Particle, f32) -> Velocity
where
    A: FnMut(&Particle, f32) -> Velocity,
    B: FnMut(&Particle, f32) -> Velocity,
{
    move |particle: &Particle, dt: f32| first(particle, dt) + second(particle, dt)
}

/// Random per-step velocity kick with its own generator.
///
/// Each sample draws a horizontal and a vertical component from the
/// configured intervals and scales them by `dt * scale`. The generator is
/// separate from the emitter's, so turbulence never shifts the spawn sequence.
#[derive(Clone, Debug)]
pub struct Turbulence<R = ChaCha8Rng> {
    horizontal: Interval,
    vertical: Interval,
    scale: f32,
    rng: R,
}

impl Turbulence<ChaCha8Rng> {
    /// Creates turbulence driven by a ChaCha generator seeded with `seed`.
    #[must_use]
    pub fn seeded(horizontal: Interval, vertical: Interval, scale: f32, seed: u64) -> Self {
        Self::with_rng(horizontal, vertical, scale, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Sideways flicker with a steady downward push used by exhaust plumes.
    #[must_use]
    pub fn plume(seed: u64) -> Self {
        Self::seeded(Interval::symmetric(0.8), Interval::new(0.8, 2.4), 0.6, seed)
    }
}

impl<R: Rng> Turbulence<R> {
    /// Creates turbulence that draws from `rng`.
    #[must_use]
    pub fn with_rng(horizontal: Interval, vertical: Interval, scale: f32, rng: R) -> Self {
        Self {
            horizontal,
            vertical,
            scale,
            rng,
        }
    }

    /// Draws one velocity change for a step of `dt` seconds.
    pub fn sample(&mut self, dt: f32) -> Velocity {
        let kick = Vec2::new(
            self.horizontal.sample(&mut self.rng),
            self.vertical.sample(&mut self.rng),
        );
        kick * dt * self.scale
    }

    /// Borrows the turbulence as a perturbation closure.
    pub fn force(&mut self) -> impl FnMut(&Particle, f32) -> Velocity + '_ {
        move |_: &Particle, dt: f32| self.sample(dt)
    }
}
