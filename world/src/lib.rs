#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative launch state.
//!
//! The [`World`] owns the ascent curve, the exhaust plume, the ignition
//! cloud, the regime controller and the star layers. Adapters mutate it only
//! through [`apply`] and read it only through [`query`].

mod config;

pub use config::WorldConfig;

use std::time::Duration;

use liftoff_core::{
    Command, ConfigError, Direction, Event, PhaseEffectSink, Position, Regime,
    SpawnRateAdjustment, VisualParameters, DEFAULT_HEADING,
};
use liftoff_system_curve::ParametricCurve;
use liftoff_system_particles::{
    forces::{self, Turbulence},
    ParticleSystem, TickStats,
};
use liftoff_system_phase::PhaseController;
use liftoff_system_starfield::Starfield;

const TURBULENCE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const IGNITION_STREAM: u64 = 0x6a09_e667_f3bc_c908;
const STARFIELD_STREAM: u64 = 0xbb67_ae85_84ca_a73b;
const IGNITION_TURBULENCE_STREAM: u64 = 0x3c6e_f372_fe94_f82b;

/// Position and orientation of the launch vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vehicle {
    position: Position,
    heading: Direction,
}

impl Vehicle {
    /// Centre of the vehicle.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Unit direction of travel.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// Point the plume is emitted from, `offset` behind the centre.
    #[must_use]
    pub fn nozzle(&self, offset: f32) -> Position {
        self.position - self.heading * offset
    }
}

/// Represents the authoritative launch state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    curve: ParametricCurve,
    plume: ParticleSystem,
    ignition: ParticleSystem,
    turbulence: Option<Turbulence>,
    ignition_turbulence: Option<Turbulence>,
    phases: PhaseController<Regime>,
    visuals: VisualParameters,
    stars: Vec<Starfield>,
    vehicle: Vehicle,
    elapsed: Duration,
    completed: bool,
}

impl World {
    /// Builds a world on the launch pad, validating every component.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        if config.flight_duration.is_zero() {
            return Err(ConfigError::ZeroFlightDuration);
        }
        let curve = ParametricCurve::new(config.ascent.clone(), config.ascent_rate)?
            .with_policy(config::ASCENT_POLICY);
        let plume = ParticleSystem::seeded(config.plume.clone(), config.seed)?;
        let ignition =
            ParticleSystem::seeded(config.ignition.clone(), config.seed ^ IGNITION_STREAM)?;
        let turbulence = config
            .turbulence
            .then(|| Turbulence::plume(config.seed ^ TURBULENCE_STREAM));
        let ignition_turbulence = config
            .turbulence
            .then(|| Turbulence::plume(config.seed ^ IGNITION_TURBULENCE_STREAM));
        let phases = PhaseController::new(Regime::Dense, config.phases.clone())?;
        let stars = config
            .starfield
            .iter()
            .enumerate()
            .map(|(layer, stars)| {
                Starfield::seeded(
                    stars.clone(),
                    (config.seed ^ STARFIELD_STREAM).wrapping_add(layer as u64),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let vehicle = Vehicle {
            position: curve.start(),
            heading: DEFAULT_HEADING,
        };
        log::debug!(
            "world built: seed={:#x} duration={:?} stages={} star_layers={}",
            config.seed,
            config.flight_duration,
            phases.stages().len(),
            stars.len()
        );

        Ok(Self {
            visuals: config.visuals.clone(),
            config,
            curve,
            plume,
            ignition,
            turbulence,
            ignition_turbulence,
            phases,
            stars,
            vehicle,
            elapsed: Duration::ZERO,
            completed: false,
        })
    }

    fn progress(&self) -> f32 {
        let progress = self.elapsed.as_secs_f32() / self.config.flight_duration.as_secs_f32();
        progress.clamp(0.0, 1.0)
    }

    fn nozzle(&self) -> Position {
        self.vehicle.nozzle(self.config.nozzle_offset)
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let progress = self.progress();
        match self.curve.evaluate(progress) {
            Ok(position) => self.vehicle.position = position,
            Err(error) => log::warn!("vehicle position unavailable at {progress}: {error}"),
        }
        if let Ok(heading) = self.curve.evaluate_tangent_or(progress, self.vehicle.heading) {
            self.vehicle.heading = heading;
        }

        let mut changes = Vec::new();
        let mut effects = FlightEffects {
            plume: &mut self.plume,
            curve: &mut self.curve,
            visuals: &mut self.visuals,
            retargeted: Vec::new(),
        };
        self.phases
            .update_into(self.vehicle.position.y, &mut effects, &mut changes);
        let retargeted = effects.retargeted;
        for change in changes {
            out_events.push(Event::PhaseChanged(change));
        }
        for end in retargeted {
            out_events.push(Event::CurveRetargeted { end });
        }

        let nozzle = self.nozzle();
        let mut stats = match self.turbulence.as_mut() {
            Some(turbulence) => self.plume.tick(dt, nozzle, turbulence.force()),
            None => self.plume.tick(dt, nozzle, forces::none()),
        };
        stats += match self.ignition_turbulence.as_mut() {
            Some(turbulence) => self.ignition.tick(dt, nozzle, turbulence.force()),
            None => self.ignition.tick(dt, nozzle, forces::none()),
        };
        for layer in &mut self.stars {
            layer.tick(dt);
        }
        push_population_events(stats, out_events);

        if progress >= 1.0 && !self.completed {
            self.completed = true;
            log::info!("flight completed after {:?}", self.elapsed);
            out_events.push(Event::FlightCompleted);
        }
    }

    fn reset(&mut self) {
        match Self::new(self.config.clone()) {
            Ok(fresh) => *self = fresh,
            Err(error) => log::error!("world reset failed: {error}"),
        }
    }
}

fn push_population_events(stats: TickStats, out_events: &mut Vec<Event>) {
    if stats.spawned > 0 {
        out_events.push(Event::ParticlesSpawned {
            count: stats.spawned,
        });
    }
    if stats.retired > 0 {
        out_events.push(Event::ParticlesRetired {
            count: stats.retired,
        });
    }
}

/// Routes phase effects to the world's components.
struct FlightEffects<'a> {
    plume: &'a mut ParticleSystem,
    curve: &'a mut ParametricCurve,
    visuals: &'a mut VisualParameters,
    retargeted: Vec<Position>,
}

impl PhaseEffectSink for FlightEffects<'_> {
    fn adjust_spawn_rate(&mut self, adjustment: SpawnRateAdjustment) {
        self.plume.adjust_spawn_rate(adjustment);
    }

    fn override_curve_target(&mut self, target: Position) {
        match self.curve.retarget(target) {
            Ok(curve) => {
                *self.curve = curve;
                self.retargeted.push(target);
            }
            Err(error) => log::warn!("ignoring curve target {target}: {error}"),
        }
    }

    fn apply_visual_parameters(&mut self, parameters: &VisualParameters) {
        self.visuals.merge(parameters);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::Ignite { burst } => {
            let nozzle = world.nozzle();
            let spawned = world.ignition.burst(burst, nozzle);
            log::info!("ignition: {spawned} particles");
            out_events.push(Event::Ignited { spawned });
        }
        Command::SetSpawnRate { rate } => world.plume.set_spawn_rate(rate),
        Command::Reset => world.reset(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use liftoff_core::{ParticleView, Regime, VisualParameters};
    use liftoff_system_curve::ParametricCurve;

    use super::{Vehicle, World};

    /// Captures the exhaust plume.
    #[must_use]
    pub fn particle_view(world: &World) -> ParticleView {
        world.plume.snapshot()
    }

    /// Captures the ignition cloud.
    #[must_use]
    pub fn ignition_view(world: &World) -> ParticleView {
        world.ignition.snapshot()
    }

    /// Captures every star layer, far to near.
    #[must_use]
    pub fn star_views(world: &World) -> Vec<ParticleView> {
        world.stars.iter().map(|layer| layer.snapshot()).collect()
    }

    /// Number of live plume and ignition particles.
    #[must_use]
    pub fn active_particles(world: &World) -> usize {
        world.plume.active_count() + world.ignition.active_count()
    }

    /// Current spawn rate of the plume.
    #[must_use]
    pub fn spawn_rate(world: &World) -> f32 {
        world.plume.spawn_rate()
    }

    /// Current vehicle state.
    #[must_use]
    pub fn vehicle(world: &World) -> Vehicle {
        world.vehicle
    }

    /// Regime the flight is currently in.
    #[must_use]
    pub fn regime(world: &World) -> Regime {
        world.phases.current()
    }

    /// Renderer parameters accumulated from the initial set and every phase
    /// entered so far.
    #[must_use]
    pub fn visual_parameters(world: &World) -> &VisualParameters {
        &world.visuals
    }

    /// Flight progress in `0.0..=1.0`.
    #[must_use]
    pub fn progress(world: &World) -> f32 {
        world.progress()
    }

    /// Simulated time since the world was built or reset.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Ascent curve, including any retargeting applied by phase effects.
    #[must_use]
    pub fn curve(world: &World) -> &ParametricCurve {
        &world.curve
    }

    /// Reports whether the vehicle reached the end of its path.
    #[must_use]
    pub fn is_complete(world: &World) -> bool {
        world.completed
    }
}
