//! Emitter configurations for the launch scene.
//!
//! The scene was tuned against per-frame spawn chances at 60 frames per
//! second; the rates below are those chances expressed per second.

use std::f32::consts::PI;

use glam::Vec2;

use crate::{EmitterConfig, Interval, VelocityPolicy};

/// Frame rate the per-frame spawn chances were tuned at.
pub const TUNING_FRAME_RATE: f32 = 60.0;

/// Plume spawn rate while the vehicle is inside the atmosphere.
pub const PLUME_SPAWN_RATE: f32 = 0.08 * TUNING_FRAME_RATE;

/// Plume spawn rate once the vehicle reaches space.
pub const SPACE_PLUME_SPAWN_RATE: f32 = 0.015 * TUNING_FRAME_RATE;

/// Particles placed at once when the engine lights.
pub const IGNITION_BURST: usize = 40;

/// Exhaust plume streaming downward from a nozzle.
#[must_use]
pub fn rocket_plume() -> EmitterConfig {
    EmitterConfig::new(
        120,
        PLUME_SPAWN_RATE,
        Interval::new(0.6, 1.1),
        VelocityPolicy::Cone {
            angle: Interval::new(-0.6 * PI, -0.4 * PI),
            speed: Interval::new(2.6, 5.5),
            scale: 0.45,
        },
    )
    .with_jitter(Vec2::new(0.12, 0.06))
    .with_peak_opacity(Interval::new(0.7, 1.0))
}

/// Wider, faster, longer-lived cloud thrown out at ignition.
///
/// Meant for [`crate::ParticleSystem::burst`]; the spawn rate is zero.
#[must_use]
pub fn ignition_flash() -> EmitterConfig {
    EmitterConfig::new(
        IGNITION_BURST,
        0.0,
        Interval::new(0.8, 1.6),
        VelocityPolicy::Cone {
            angle: Interval::new(-0.75 * PI, -0.25 * PI),
            speed: Interval::new(3.2, 7.8),
            scale: 0.35,
        },
    )
    .with_jitter(Vec2::new(0.12, 0.06))
    .with_peak_opacity(Interval::new(0.7, 1.0))
}

/// Occasional comets crossing a band `half_width` wide on either side of the
/// emitter. Pair with [`crate::forces::gravity`] at `(0, -0.04)` for the sag.
#[must_use]
pub fn comet_trail(half_width: f32) -> EmitterConfig {
    EmitterConfig::new(
        6,
        0.015,
        Interval::new(1.4, 2.6),
        VelocityPolicy::Cone {
            angle: Interval::new(-1.4, -0.2),
            speed: Interval::new(4.0, 7.0),
            scale: 0.26,
        },
    )
    .with_jitter(Vec2::new(half_width.max(0.0), 0.0))
    .with_peak_opacity(Interval::fixed(0.95))
}
