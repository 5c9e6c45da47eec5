//! Per-frame output.

use std::fmt;

use liftoff_core::{Event, ParticleView, Position, Regime};
use liftoff_world::{query, World};
use serde::Serialize;

/// Numeric state of the launch after one frame.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct FrameReport {
    pub(crate) frame: u32,
    pub(crate) progress: f32,
    pub(crate) vehicle: Position,
    pub(crate) heading: Position,
    pub(crate) regime: Regime,
    pub(crate) active_particles: usize,
    pub(crate) particles: ParticleView,
    pub(crate) events: Vec<Event>,
}

impl FrameReport {
    /// Captures the world after `frame` together with the events it produced.
    pub(crate) fn capture(frame: u32, world: &World, events: Vec<Event>) -> Self {
        let vehicle = query::vehicle(world);
        Self {
            frame,
            progress: query::progress(world),
            vehicle: vehicle.position(),
            heading: vehicle.heading(),
            regime: query::regime(world),
            active_particles: query::active_particles(world),
            particles: query::particle_view(world),
            events,
        }
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {:>4}  t={:.3}  pos=({:.2}, {:.2})  regime={:?}  particles={:>3}",
            self.frame,
            self.progress,
            self.vehicle.x,
            self.vehicle.y,
            self.regime,
            self.active_particles
        )?;
        for event in &self.events {
            match event {
                Event::PhaseChanged(change) => {
                    write!(f, "  [{:?} -> {:?}]", change.from, change.to)?;
                }
                Event::Ignited { spawned } => write!(f, "  [ignition {spawned}]")?,
                Event::CurveRetargeted { end } => {
                    write!(f, "  [retarget ({:.2}, {:.2})]", end.x, end.y)?;
                }
                Event::FlightCompleted => write!(f, "  [complete]")?,
                Event::TimeAdvanced { .. }
                | Event::ParticlesSpawned { .. }
                | Event::ParticlesRetired { .. } => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftoff_core::PhaseChangeEvent;
    use liftoff_world::WorldConfig;

    #[test]
    fn text_line_mentions_phase_changes() {
        let world = World::new(WorldConfig::default()).expect("valid");
        let report = FrameReport::capture(
            3,
            &world,
            vec![Event::PhaseChanged(PhaseChangeEvent {
                from: Regime::Dense,
                to: Regime::Sparse,
                trigger: 5.5,
            })],
        );
        let line = report.to_string();
        assert!(line.starts_with("frame    3"));
        assert!(line.contains("[Dense -> Sparse]"));
    }

    #[test]
    fn json_report_has_expected_fields() {
        let world = World::new(WorldConfig::default()).expect("valid");
        let report = FrameReport::capture(0, &world, Vec::new());
        let value = serde_json::to_value(&report).expect("serializable");
        assert_eq!(value["frame"], 0);
        assert_eq!(value["regime"], "Dense");
        assert!(value["particles"]["snapshots"].is_array());
    }
}
