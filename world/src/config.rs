//! Tuning surface of a launch.

use std::time::Duration;

use glam::Vec2;
use liftoff_core::{Regime, SpawnRateAdjustment, VisualParameters};
use liftoff_system_curve::{CurvePath, DomainPolicy, RateFunction};
use liftoff_system_particles::{presets, EmitterConfig};
use liftoff_system_phase::{PhaseEffect, PhaseStage};
use liftoff_system_starfield::StarfieldConfig;

const LAUNCH_SEED: u64 = 0x4c69_6674_6f66_6621;
const PAD_POSITION: Vec2 = Vec2::new(0.0, -3.2);
const SPACE_ALTITUDE: f32 = 5.5;

/// Everything needed to build a [`crate::World`].
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Seed from which every random stream of the world is derived.
    pub seed: u64,
    /// Time the vehicle takes to traverse the whole ascent path.
    pub flight_duration: Duration,
    /// Geometry of the ascent.
    pub ascent: CurvePath,
    /// Easing applied to flight progress.
    pub ascent_rate: RateFunction,
    /// Distance from the vehicle's centre to its nozzle along the heading.
    pub nozzle_offset: f32,
    /// Continuous exhaust plume.
    pub plume: EmitterConfig,
    /// Cloud thrown out by [`liftoff_core::Command::Ignite`].
    pub ignition: EmitterConfig,
    /// Whether plume and ignition particles receive a random per-tick kick.
    pub turbulence: bool,
    /// Regime stages keyed on vehicle altitude.
    pub phases: Vec<PhaseStage<Regime>>,
    /// Renderer parameters in effect before any phase change.
    pub visuals: VisualParameters,
    /// Background star layers, far to near.
    pub starfield: Vec<StarfieldConfig>,
}

impl WorldConfig {
    /// Overrides the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for WorldConfig {
    /// Vertical launch from the pad that thins its plume once it reaches
    /// space.
    fn default() -> Self {
        let space = PhaseEffect::new()
            .with_spawn_rate(SpawnRateAdjustment::Absolute(
                presets::SPACE_PLUME_SPAWN_RATE,
            ))
            .with_visual("glow_opacity", 0.12)
            .with_visual("cloud_opacity", 0.04)
            .with_visual("trail_width", 1.0)
            .with_visual("vehicle_scale", 0.62)
            .with_visual("flame_opacity", 1.0);

        Self {
            seed: LAUNCH_SEED,
            flight_duration: Duration::from_millis(6_250),
            ascent: CurvePath::Bezier {
                points: vec![
                    PAD_POSITION,
                    PAD_POSITION + Vec2::new(0.0, 3.8),
                    PAD_POSITION + Vec2::new(0.0, 11.8),
                ],
            },
            ascent_rate: RateFunction::Smooth,
            nozzle_offset: 1.15,
            plume: presets::rocket_plume(),
            ignition: presets::ignition_flash(),
            turbulence: true,
            phases: vec![PhaseStage::new(Regime::Sparse, SPACE_ALTITUDE).with_effect(space)],
            visuals: VisualParameters::new()
                .with("glow_opacity", 0.55)
                .with("cloud_opacity", 0.9)
                .with("trail_width", 2.0)
                .with("vehicle_scale", 1.0)
                .with("flame_opacity", 0.9),
            starfield: StarfieldConfig::parallax_layers().to_vec(),
        }
    }
}

/// Domain policy used for the ascent. Flight progress is clamped before
/// evaluation, so the policy only matters for callers of [`crate::query::curve`].
pub(crate) const ASCENT_POLICY: DomainPolicy = DomainPolicy::Clamp;
