use std::time::Duration;

use glam::Vec2;
use liftoff_core::{Command, Event, PhaseChangeEvent, Regime};
use liftoff_system_particles::presets;
use liftoff_system_phase::{PhaseEffect, PhaseStage};
use liftoff_world::{self as world, query, World, WorldConfig};

const FRAME: Duration = Duration::from_millis(16);

fn launch() -> World {
    World::new(WorldConfig::default()).expect("default launch is valid")
}

fn run(world: &mut World, frames: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..frames {
        world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    }
    events
}

fn phase_changes(events: &[Event]) -> Vec<PhaseChangeEvent<Regime>> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::PhaseChanged(change) => Some(*change),
            _ => None,
        })
        .collect()
}

#[test]
fn reaching_space_switches_regime_once() {
    let mut world = launch();
    let events = run(&mut world, 420);

    let changes = phase_changes(&events);
    assert_eq!(changes.len(), 1, "unexpected changes: {changes:?}");
    assert_eq!(changes[0].from, Regime::Dense);
    assert_eq!(changes[0].to, Regime::Sparse);
    assert!(changes[0].trigger >= 5.5);

    assert_eq!(query::regime(&world), Regime::Sparse);
    assert_eq!(query::spawn_rate(&world), presets::SPACE_PLUME_SPAWN_RATE);
    let visuals = query::visual_parameters(&world);
    assert_eq!(visuals.get("glow_opacity"), Some(0.12));
    assert_eq!(visuals.get("vehicle_scale"), Some(0.62));
}

#[test]
fn flight_completes_once_at_the_apex() {
    let mut world = launch();
    let events = run(&mut world, 420);

    let completions = events
        .iter()
        .filter(|event| matches!(event, Event::FlightCompleted))
        .count();
    assert_eq!(completions, 1);
    assert!(query::is_complete(&world));
    assert_eq!(query::progress(&world), 1.0);
    assert_eq!(
        query::vehicle(&world).position(),
        query::curve(&world).end()
    );
}

#[test]
fn vehicle_climbs_monotonically_and_points_up() {
    let mut world = launch();
    let mut previous = query::vehicle(&world).position().y;

    for _ in 0..390 {
        let _ = run(&mut world, 1);
        let vehicle = query::vehicle(&world);
        assert!(vehicle.position().y >= previous);
        assert!(vehicle.heading().y > 0.99);
        previous = vehicle.position().y;
    }
}

#[test]
fn every_tick_reports_time_first() {
    let mut world = launch();
    let mut events = Vec::new();
    world::apply(&mut world, Command::Tick { dt: FRAME }, &mut events);
    assert_eq!(events.first(), Some(&Event::TimeAdvanced { dt: FRAME }));
}

#[test]
fn plume_follows_the_nozzle() {
    let mut world = launch();
    let _ = run(&mut world, 120);

    let vehicle = query::vehicle(&world);
    let view = query::particle_view(&world);
    assert!(!view.is_empty());
    for particle in view.iter() {
        assert!(
            particle.position.y < vehicle.position().y,
            "exhaust stays below the vehicle"
        );
    }
}

#[test]
fn disabled_plume_spawns_nothing_in_the_atmosphere() {
    let mut world = launch();
    let mut events = Vec::new();
    world::apply(&mut world, Command::SetSpawnRate { rate: 0.0 }, &mut events);
    events.extend(run(&mut world, 120));

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ParticlesSpawned { .. })));
    assert_eq!(query::active_particles(&world), 0);
}

#[test]
fn single_large_step_catches_up() {
    let mut world = launch();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(30),
        },
        &mut events,
    );

    assert_eq!(phase_changes(&events).len(), 1);
    assert!(events.contains(&Event::FlightCompleted));
    assert_eq!(query::regime(&world), Regime::Sparse);
}

#[test]
fn phase_effect_can_retarget_the_ascent() {
    let target = Vec2::new(3.0, 9.0);
    let config = WorldConfig {
        phases: vec![PhaseStage::new(Regime::Sparse, 0.0)
            .with_effect(PhaseEffect::new().with_curve_target(target))],
        ..WorldConfig::default()
    };
    let mut world = World::new(config).expect("valid");
    let events = run(&mut world, 400);

    assert!(events.contains(&Event::CurveRetargeted { end: target }));
    assert_eq!(query::curve(&world).end(), target);
    assert_eq!(query::vehicle(&world).position(), target);
}

#[test]
fn reset_returns_to_the_pad_and_replays() {
    let mut world = launch();
    let mut events = Vec::new();
    world::apply(&mut world, Command::Ignite { burst: 30 }, &mut events);
    let _ = run(&mut world, 200);
    let first = query::particle_view(&world);

    world::apply(&mut world, Command::Reset, &mut events);
    assert_eq!(query::elapsed(&world), Duration::ZERO);
    assert_eq!(query::regime(&world), Regime::Dense);
    assert_eq!(query::active_particles(&world), 0);

    world::apply(&mut world, Command::Ignite { burst: 30 }, &mut events);
    let _ = run(&mut world, 200);
    assert_eq!(query::particle_view(&world), first);
}

#[test]
fn star_layers_are_available() {
    let mut world = launch();
    let _ = run(&mut world, 10);
    let layers = query::star_views(&world);
    assert_eq!(layers.len(), 3);
    assert!(layers.iter().all(|layer| !layer.is_empty()));
}
