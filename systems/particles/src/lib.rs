#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic fixed-capacity particle pool.
//!
//! A [`ParticleSystem`] owns every particle it creates. Each call to
//! [`ParticleSystem::tick`] first advances and retires the live particles,
//! then rolls a spawn decision for every free slot. Particles born during a
//! tick are therefore never advanced in that same tick. All random draws come
//! from the generator handed to the system, so a fixed seed replays a run
//! bit for bit.

mod config;
pub mod forces;
mod particle;
pub mod presets;

pub use config::{EmitterConfig, Interval, VelocityPolicy};
pub use particle::{fade, Particle};

use std::{ops::AddAssign, time::Duration};

use config::VelocitySampler;
use glam::Vec2;
use liftoff_core::{
    ConfigError, ParticleSnapshot, ParticleView, PhaseEffectSink, Position, SpawnRateAdjustment,
    Velocity,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Particle population changes produced by a single operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TickStats {
    /// Particles that entered the pool.
    pub spawned: usize,
    /// Particles that reached the end of their lifespan.
    pub retired: usize,
}

impl AddAssign for TickStats {
    fn add_assign(&mut self, other: Self) {
        self.spawned = self.spawned.saturating_add(other.spawned);
        self.retired = self.retired.saturating_add(other.retired);
    }
}

/// Pool of particles advanced in discrete ticks.
#[derive(Debug)]
pub struct ParticleSystem<R = ChaCha8Rng> {
    config: EmitterConfig,
    sampler: VelocitySampler,
    spawn_rate: f32,
    pool: Vec<Option<Particle>>,
    active: usize,
    totals: TickStats,
    rng: R,
}

impl ParticleSystem<ChaCha8Rng> {
    /// Creates a system driven by a ChaCha generator seeded with `seed`.
    pub fn seeded(config: EmitterConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleSystem<R> {
    /// Creates a system that draws every random value from `rng`.
    pub fn with_rng(config: EmitterConfig, rng: R) -> Result<Self, ConfigError> {
        let sampler = config.velocity_sampler()?;
        log::debug!(
            "particle system configured: capacity={} spawn_rate={} lifespan={}..={}",
            config.capacity,
            config.spawn_rate,
            config.lifespan.min,
            config.lifespan.max
        );
        Ok(Self {
            spawn_rate: config.spawn_rate,
            pool: vec![None; config.capacity],
            config,
            sampler,
            active: 0,
            totals: TickStats::default(),
            rng,
        })
    }

    /// Replaces the emission configuration.
    ///
    /// The spawn rate resets to the configured value. Live particles keep
    /// their lifespans; particles in slots beyond a reduced capacity are
    /// retired and counted in [`ParticleSystem::totals`]. On error the
    /// previous configuration stays in effect.
    pub fn configure(&mut self, config: EmitterConfig) -> Result<(), ConfigError> {
        let sampler = config.velocity_sampler()?;
        self.pool.resize(config.capacity, None);
        let active = self.pool.iter().flatten().count();
        self.totals += TickStats {
            spawned: 0,
            retired: self.active - active,
        };
        self.active = active;
        self.spawn_rate = config.spawn_rate;
        self.sampler = sampler;
        self.config = config;
        log::debug!(
            "particle system reconfigured: capacity={} active={}",
            self.pool.len(),
            self.active
        );
        Ok(())
    }

    /// Advances every live particle by `dt`, retires expired ones and then
    /// rolls spawn decisions for the free slots.
    ///
    /// Each live particle moves by `velocity * dt`, receives
    /// `perturbation(particle, dt)` as a velocity change and ages by `dt`.
    /// Each free slot spawns at `emitter` with probability
    /// `spawn_rate * dt` clamped into `0.0..=1.0`. A zero `dt` is a no-op.
    pub fn tick<F>(&mut self, dt: Duration, emitter: Position, mut perturbation: F) -> TickStats
    where
        F: FnMut(&Particle, f32) -> Velocity,
    {
        let dt = dt.as_secs_f32();
        let mut stats = TickStats::default();
        if dt <= 0.0 {
            return stats;
        }

        for slot in &mut self.pool {
            let Some(particle) = slot.as_mut() else {
                continue;
            };
            particle.step(dt, &mut perturbation);
            if particle.is_expired() {
                *slot = None;
                stats.retired += 1;
            }
        }
        self.active -= stats.retired;

        let probability = spawn_probability(self.spawn_rate, dt);
        if probability > 0.0 {
            for index in 0..self.pool.len() {
                if self.pool[index].is_some() {
                    continue;
                }
                if self.rng.gen::<f32>() >= probability {
                    continue;
                }
                let particle = self.emit(emitter);
                self.pool[index] = Some(particle);
                stats.spawned += 1;
            }
        }
        self.active += stats.spawned;
        self.totals += stats;

        log::trace!(
            "particle tick: dt={dt} spawned={} retired={} active={}",
            stats.spawned,
            stats.retired,
            self.active
        );
        stats
    }

    /// Spawns up to `count` particles at `emitter` immediately, ignoring the
    /// spawn rate. Returns the number of particles placed.
    pub fn burst(&mut self, count: usize, emitter: Position) -> usize {
        let mut spawned = 0;
        for index in 0..self.pool.len() {
            if spawned == count {
                break;
            }
            if self.pool[index].is_none() {
                let particle = self.emit(emitter);
                self.pool[index] = Some(particle);
                spawned += 1;
            }
        }
        self.active += spawned;
        self.totals += TickStats {
            spawned,
            retired: 0,
        };
        spawned
    }

    /// Sets the spawn rate used from the next tick onwards.
    ///
    /// Negative and non-finite rates are clamped to zero.
    pub fn set_spawn_rate(&mut self, rate: f32) {
        self.spawn_rate = if rate.is_finite() && rate >= 0.0 {
            rate
        } else {
            log::warn!("ignoring invalid spawn rate {rate}; emission disabled");
            0.0
        };
    }

    /// Applies a relative or absolute spawn rate change.
    pub fn adjust_spawn_rate(&mut self, adjustment: SpawnRateAdjustment) {
        self.set_spawn_rate(adjustment.resolve(self.spawn_rate));
    }

    /// Captures the position and opacity of every live particle in slot order.
    #[must_use]
    pub fn snapshot(&self) -> ParticleView {
        let snapshots = self
            .pool
            .iter()
            .enumerate()
            .filter_map(|(slot, particle)| {
                particle.as_ref().map(|particle| ParticleSnapshot {
                    slot,
                    position: particle.position(),
                    opacity: particle.opacity(),
                })
            })
            .collect();
        ParticleView::from_snapshots(snapshots)
    }

    /// Iterator over the live particles in slot order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter().flatten()
    }

    /// Retires every live particle at once. They are counted in
    /// [`ParticleSystem::totals`].
    pub fn clear(&mut self) {
        for slot in &mut self.pool {
            *slot = None;
        }
        self.totals += TickStats {
            spawned: 0,
            retired: self.active,
        };
        self.active = 0;
    }

    /// Number of live particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    /// Spawn probability per second for each free slot.
    #[must_use]
    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    /// Configuration the system was last built or configured with.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Population changes accumulated since construction.
    #[must_use]
    pub fn totals(&self) -> TickStats {
        self.totals
    }

    fn emit(&mut self, emitter: Position) -> Particle {
        let jitter = self.config.jitter;
        let offset = Vec2::new(
            Interval::symmetric(jitter.x).sample(&mut self.rng),
            Interval::symmetric(jitter.y).sample(&mut self.rng),
        );
        let velocity = self.sampler.sample(&mut self.rng);
        let lifespan = self.config.lifespan.sample(&mut self.rng);
        let peak_opacity = self.config.peak_opacity.sample(&mut self.rng);
        Particle::spawn(emitter + offset, velocity, lifespan, peak_opacity)
    }
}

impl<R: Rng> PhaseEffectSink for ParticleSystem<R> {
    fn adjust_spawn_rate(&mut self, adjustment: SpawnRateAdjustment) {
        ParticleSystem::adjust_spawn_rate(self, adjustment);
    }
}

fn spawn_probability(rate: f32, dt: f32) -> f32 {
    let probability = rate * dt;
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}
