use std::time::Duration;

use glam::Vec2;
use liftoff_core::{ConfigError, PhaseEffectSink, SpawnRateAdjustment};
use liftoff_system_particles::{
    forces, presets, EmitterConfig, Interval, Particle, ParticleSystem, TickStats, VelocityPolicy,
};

const FRAME: Duration = Duration::from_millis(100);

fn upward(capacity: usize, spawn_rate: f32, lifespan: Interval) -> EmitterConfig {
    EmitterConfig::new(
        capacity,
        spawn_rate,
        lifespan,
        VelocityPolicy::Fixed { velocity: Vec2::Y },
    )
}

#[test]
fn active_count_never_exceeds_capacity() {
    let config = upward(16, 1_000.0, Interval::new(0.2, 0.9));
    let mut system = ParticleSystem::seeded(config, 0x5eed).expect("valid");

    for _ in 0..200 {
        let _ = system.tick(FRAME, Vec2::ZERO, forces::none());
        assert!(system.active_count() <= system.capacity());
        assert_eq!(system.active_count(), system.particles().count());
    }
}

#[test]
fn saturating_rate_fills_the_pool_and_keeps_it_full() {
    let mut system =
        ParticleSystem::seeded(upward(10, 10.0, Interval::fixed(1.0)), 1).expect("valid");

    for tick in 1..=20 {
        let _ = system.tick(FRAME, Vec2::ZERO, forces::none());
        assert!(system.active_count() <= 10);
        if tick >= 10 {
            assert_eq!(system.active_count(), 10, "pool full after tick {tick}");
        }
    }
    let totals = system.totals();
    assert!(totals.retired >= 10, "first generation retired: {totals:?}");
    assert!(totals.spawned >= 20, "freed slots respawn: {totals:?}");
}

#[test]
fn unit_rate_pool_stays_bounded_and_turns_over() {
    let mut system =
        ParticleSystem::seeded(upward(10, 1.0, Interval::new(0.5, 1.0)), 42).expect("valid");

    for _ in 0..10 {
        let _ = system.tick(FRAME, Vec2::ZERO, forces::none());
    }
    assert!(system.active_count() <= 10);

    for _ in 0..400 {
        let _ = system.tick(FRAME, Vec2::ZERO, forces::none());
        assert!(system.active_count() <= 10);
    }
    let totals = system.totals();
    assert!(totals.spawned > 10, "retired slots are reused: {totals:?}");
    assert!(totals.retired > 0);
    assert_eq!(totals.spawned - totals.retired, system.active_count());
}

#[test]
fn particle_retires_once_cumulative_age_reaches_lifespan() {
    let mut system =
        ParticleSystem::seeded(upward(4, 0.0, Interval::fixed(0.5)), 9).expect("valid");
    assert_eq!(system.burst(1, Vec2::ZERO), 1);

    let step = Duration::from_millis(250);
    let first = system.tick(step, Vec2::ZERO, forces::none());
    assert_eq!(first, TickStats::default());
    assert_eq!(system.active_count(), 1);

    let second = system.tick(step, Vec2::ZERO, forces::none());
    assert_eq!(
        second,
        TickStats {
            spawned: 0,
            retired: 1
        }
    );
    assert_eq!(system.active_count(), 0);
}

#[test]
fn newborn_particles_are_not_advanced_in_their_spawn_tick() {
    let emitter = Vec2::new(3.0, -2.0);
    let jitter = Vec2::new(0.12, 0.06);
    let config = upward(32, 50.0, Interval::fixed(1.0)).with_jitter(jitter);
    let mut system = ParticleSystem::seeded(config, 77).expect("valid");

    let stats = system.tick(FRAME, emitter, forces::none());
    assert_eq!(stats.spawned, 32);

    for particle in system.particles() {
        assert_eq!(particle.age(), 0.0);
        let offset = (particle.position() - emitter).abs();
        assert!(offset.x <= jitter.x + 1e-6 && offset.y <= jitter.y + 1e-6);
        assert_eq!(particle.opacity(), 1.0);
    }
}

#[test]
fn spawn_rate_change_applies_on_next_tick() {
    let mut system =
        ParticleSystem::seeded(upward(8, 0.0, Interval::fixed(2.0)), 3).expect("valid");

    let stats = system.tick(FRAME, Vec2::ZERO, forces::none());
    assert_eq!(stats.spawned, 0);

    system.set_spawn_rate(10.0);
    let stats = system.tick(FRAME, Vec2::ZERO, forces::none());
    assert_eq!(stats.spawned, 8);
}

#[test]
fn spawn_rate_changes_leave_live_lifespans_alone() {
    let mut system =
        ParticleSystem::seeded(upward(12, 2.0, Interval::new(0.5, 3.0)), 17).expect("valid");
    assert_eq!(system.burst(6, Vec2::ZERO), 6);
    let _ = system.tick(FRAME, Vec2::ZERO, forces::none());
    let record = |system: &ParticleSystem| -> Vec<(f32, f32)> {
        system
            .particles()
            .map(|particle| (particle.lifespan(), particle.age()))
            .collect()
    };
    let before = record(&system);
    assert!(!before.is_empty());

    system.set_spawn_rate(40.0);
    assert_eq!(record(&system), before);
    system.adjust_spawn_rate(SpawnRateAdjustment::Absolute(0.0));
    assert_eq!(record(&system), before);
    system.adjust_spawn_rate(SpawnRateAdjustment::Offset(5.0));
    assert_eq!(record(&system), before);

    let survivors: Vec<f32> = system.particles().map(Particle::lifespan).collect();
    system.set_spawn_rate(0.0);
    let _ = system.tick(Duration::from_millis(1), Vec2::ZERO, forces::none());
    let after: Vec<f32> = system.particles().map(Particle::lifespan).collect();
    assert_eq!(after, survivors);
}

#[test]
fn invalid_spawn_rate_disables_emission() {
    let mut system =
        ParticleSystem::seeded(upward(8, 5.0, Interval::fixed(2.0)), 3).expect("valid");
    system.set_spawn_rate(f32::NAN);
    assert_eq!(system.spawn_rate(), 0.0);
    system.set_spawn_rate(-1.0);
    assert_eq!(system.spawn_rate(), 0.0);
}

#[test]
fn zero_dt_changes_nothing() {
    let mut system =
        ParticleSystem::seeded(upward(8, 100.0, Interval::fixed(1.0)), 5).expect("valid");
    let _ = system.burst(3, Vec2::ZERO);
    let before = system.snapshot();

    let stats = system.tick(Duration::ZERO, Vec2::ZERO, forces::none());

    assert_eq!(stats, TickStats::default());
    assert_eq!(system.snapshot(), before);
}

#[test]
fn huge_step_retires_every_particle() {
    let mut system =
        ParticleSystem::seeded(upward(8, 0.0, Interval::new(0.5, 2.0)), 5).expect("valid");
    assert_eq!(system.burst(8, Vec2::ZERO), 8);

    let stats = system.tick(Duration::from_secs(1_000), Vec2::ZERO, forces::none());

    assert_eq!(stats.retired, 8);
    assert_eq!(system.active_count(), 0);
    assert!(system.snapshot().is_empty());
}

#[test]
fn burst_is_limited_by_free_slots() {
    let mut system =
        ParticleSystem::seeded(upward(5, 0.0, Interval::fixed(1.0)), 5).expect("valid");
    assert_eq!(system.burst(3, Vec2::ZERO), 3);
    assert_eq!(system.burst(10, Vec2::ZERO), 2);
    assert_eq!(system.burst(1, Vec2::ZERO), 0);
    assert_eq!(system.totals().spawned, 5);
}

#[test]
fn perturbation_changes_velocity_after_motion() {
    let mut system =
        ParticleSystem::seeded(upward(1, 0.0, Interval::fixed(10.0)), 5).expect("valid");
    let _ = system.burst(1, Vec2::ZERO);

    let step = Duration::from_millis(500);
    let _ = system.tick(step, Vec2::ZERO, forces::gravity(Vec2::new(0.0, -2.0)));
    let particle: &Particle = system.particles().next().expect("one particle");

    assert_eq!(particle.position(), Vec2::new(0.0, 0.5));
    assert_eq!(particle.velocity(), Vec2::ZERO);
}

#[test]
fn opacity_fades_with_age() {
    let config = upward(1, 0.0, Interval::fixed(1.0)).with_peak_opacity(Interval::fixed(0.8));
    let mut system = ParticleSystem::seeded(config, 5).expect("valid");
    let _ = system.burst(1, Vec2::ZERO);

    let mut previous = 0.8;
    for _ in 0..9 {
        let _ = system.tick(FRAME, Vec2::ZERO, forces::none());
        let opacity = system.snapshot().iter().next().expect("alive").opacity;
        assert!(opacity < previous);
        assert!((0.0..=1.0).contains(&opacity));
        previous = opacity;
    }
}

#[test]
fn rejected_configuration_keeps_previous_one() {
    let mut system = ParticleSystem::seeded(presets::rocket_plume(), 5).expect("valid");
    let mut broken = presets::rocket_plume();
    broken.lifespan = Interval::new(1.1, 0.6);

    assert_eq!(
        system.configure(broken),
        Err(ConfigError::InvertedLifespan { min: 1.1, max: 0.6 })
    );
    assert_eq!(system.capacity(), 120);
    assert_eq!(system.config(), &presets::rocket_plume());
}

#[test]
fn construction_rejects_zero_capacity() {
    let result = ParticleSystem::seeded(upward(0, 1.0, Interval::fixed(1.0)), 5);
    assert!(matches!(result, Err(ConfigError::ZeroCapacity)));
}

#[test]
fn shrinking_capacity_drops_trailing_slots() {
    let mut system =
        ParticleSystem::seeded(upward(6, 0.0, Interval::fixed(1.0)), 5).expect("valid");
    let _ = system.burst(6, Vec2::ZERO);

    system
        .configure(upward(4, 0.0, Interval::fixed(1.0)))
        .expect("valid");

    assert_eq!(system.capacity(), 4);
    assert_eq!(system.active_count(), 4);
    let totals = system.totals();
    assert_eq!(totals.retired, 2);
    assert_eq!(totals.spawned - totals.retired, system.active_count());
}

#[test]
fn clear_empties_the_pool() {
    let mut system =
        ParticleSystem::seeded(upward(6, 0.0, Interval::fixed(1.0)), 5).expect("valid");
    let _ = system.burst(6, Vec2::ZERO);
    system.clear();
    assert_eq!(system.active_count(), 0);
    assert_eq!(system.totals().retired, 6);
    assert_eq!(system.burst(6, Vec2::ZERO), 6);
    let totals = system.totals();
    assert_eq!(totals.spawned - totals.retired, system.active_count());
}

#[test]
fn phase_effects_adjust_the_spawn_rate() {
    let mut system = ParticleSystem::seeded(presets::rocket_plume(), 5).expect("valid");

    PhaseEffectSink::adjust_spawn_rate(
        &mut system,
        SpawnRateAdjustment::Absolute(presets::SPACE_PLUME_SPAWN_RATE),
    );
    assert_eq!(system.spawn_rate(), presets::SPACE_PLUME_SPAWN_RATE);

    PhaseEffectSink::adjust_spawn_rate(&mut system, SpawnRateAdjustment::Offset(-10.0));
    assert_eq!(system.spawn_rate(), 0.0);
}

#[test]
fn plume_particles_drift_below_the_nozzle() {
    let nozzle = Vec2::new(0.0, -2.5);
    let mut system = ParticleSystem::seeded(presets::rocket_plume(), 21).expect("valid");
    let _ = system.burst(60, nozzle);

    let _ = system.tick(FRAME, nozzle, forces::none());

    let below = system
        .particles()
        .filter(|particle| particle.position().y < nozzle.y)
        .count();
    assert!(below > 50, "cone points downward, {below} below nozzle");
}
