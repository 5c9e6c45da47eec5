use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use glam::Vec2;
use liftoff_system_particles::{forces::Turbulence, presets, ParticleSystem, TickStats};

#[test]
fn deterministic_replay_is_bit_identical() {
    let first = replay(0x1234_5678);
    let second = replay(0x1234_5678);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn different_seeds_diverge() {
    let first = replay(1);
    let second = replay(2);
    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut plume = ParticleSystem::seeded(presets::rocket_plume(), seed).expect("valid preset");
    let mut turbulence = Turbulence::plume(seed.wrapping_add(1));
    let mut nozzle = Vec2::new(0.0, -2.5);
    let mut stats = Vec::new();

    let _ = plume.burst(presets::IGNITION_BURST, nozzle);
    for frame in 0..180 {
        if frame == 90 {
            plume.set_spawn_rate(presets::SPACE_PLUME_SPAWN_RATE);
        }
        nozzle.y += 0.05;
        stats.push(plume.tick(
            Duration::from_micros(16_667),
            nozzle,
            turbulence.force(),
        ));
    }

    let particles = plume
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|snapshot| ParticleState {
            slot: snapshot.slot,
            x: snapshot.position.x.to_bits(),
            y: snapshot.position.y.to_bits(),
            opacity: snapshot.opacity.to_bits(),
        })
        .collect();

    ReplayOutcome { particles, stats }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    particles: Vec<ParticleState>,
    stats: Vec<TickStats>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ParticleState {
    slot: usize,
    x: u32,
    y: u32,
    opacity: u32,
}
