//! Scenario files describing a launch.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use liftoff_core::{Regime, VisualParameters};
use liftoff_system_curve::{CurvePath, RateFunction};
use liftoff_system_particles::{presets, EmitterConfig};
use liftoff_system_phase::PhaseStage;
use liftoff_system_starfield::StarfieldConfig;
use liftoff_world::WorldConfig;
use serde::{Deserialize, Serialize};

/// Launch description loaded from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    pub(crate) seed: u64,
    pub(crate) fps: u32,
    pub(crate) frames: u32,
    pub(crate) ignition_burst: usize,
    pub(crate) flight: Flight,
    pub(crate) emitter: EmitterConfig,
    pub(crate) ignition: EmitterConfig,
    pub(crate) phases: Vec<PhaseStage<Regime>>,
    pub(crate) visuals: VisualParameters,
    pub(crate) starfield: Vec<StarfieldConfig>,
}

/// Motion of the vehicle.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Flight {
    pub(crate) duration_secs: f32,
    pub(crate) ascent: CurvePath,
    #[serde(default)]
    pub(crate) rate: RateFunction,
    pub(crate) nozzle_offset: f32,
    #[serde(default = "enabled")]
    pub(crate) turbulence: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Scenario {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            seed: world.seed,
            fps: 60,
            frames: 420,
            ignition_burst: presets::IGNITION_BURST,
            flight: Flight {
                duration_secs: world.flight_duration.as_secs_f32(),
                ascent: world.ascent,
                rate: world.ascent_rate,
                nozzle_offset: world.nozzle_offset,
                turbulence: world.turbulence,
            },
            emitter: world.plume,
            ignition: world.ignition,
            phases: world.phases,
            visuals: world.visuals,
            starfield: world.starfield,
        }
    }
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Parses scenario TOML.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if scenario.fps == 0 {
            bail!("scenario fps must be greater than zero");
        }
        Ok(scenario)
    }

    /// Length of one frame.
    pub(crate) fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Converts the scenario into the world's configuration.
    pub(crate) fn world_config(&self) -> Result<WorldConfig> {
        let flight_duration = Duration::try_from_secs_f32(self.flight.duration_secs)
            .with_context(|| {
                format!(
                    "flight duration {} is not a valid number of seconds",
                    self.flight.duration_secs
                )
            })?;
        Ok(WorldConfig {
            seed: self.seed,
            flight_duration,
            ascent: self.flight.ascent.clone(),
            ascent_rate: self.flight.rate,
            nozzle_offset: self.flight.nozzle_offset,
            plume: self.emitter.clone(),
            ignition: self.ignition.clone(),
            turbulence: self.flight.turbulence,
            phases: self.phases.clone(),
            visuals: self.visuals.clone(),
            starfield: self.starfield.clone(),
        })
    }
}
