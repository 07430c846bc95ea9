use std::collections::VecDeque;

use meadow_geom::Vec3;
use meadow_scenery::DiscoveryEvent;
use meadow_world::ChunkCoord;

pub enum Event {
    // Host input
    FocalMoved { position: Vec3, heading: Vec3 },

    // Streaming
    ViewCenterChanged { cx: i32, cz: i32 },
    ChunkEvicted { coord: ChunkCoord },
    ChunkLoaded { coord: ChunkCoord },
    CoverageCapReached { coord: ChunkCoord, blades: usize },

    // Interaction
    MowRequested { position: Vec3, heading: Vec3, radius: f32 },
    DiscoveryCheck { position: Vec3, radius: f32 },
    ObjectDiscovered(DiscoveryEvent),
    CoverageReset,
}

pub struct EventEnvelope {
    pub tick: u64,
    pub kind: Event,
}

/// FIFO of pending events stamped with the tick that raised them. Events
/// emitted while handling another event run later in the same tick.
#[derive(Default)]
pub struct EventQueue {
    queue: VecDeque<EventEnvelope>,
    pub now: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_now(&mut self, kind: Event) {
        self.queue.push_back(EventEnvelope {
            tick: self.now,
            kind,
        });
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.queue.pop_front()
    }

    pub fn advance_tick(&mut self) {
        self.now = self.now.wrapping_add(1);
    }
}

pub fn log_event(tick: u64, ev: &Event) {
    use Event as E;
    match ev {
        E::FocalMoved { position, heading } => {
            log::trace!(
                target: "events",
                "[tick {}] FocalMoved pos=({:.1},{:.1}) yaw={:.2}",
                tick,
                position.x,
                position.z,
                heading.yaw()
            );
        }
        E::ViewCenterChanged { cx, cz } => {
            log::debug!(target: "events", "[tick {}] ViewCenterChanged ({}, {})", tick, cx, cz);
        }
        E::ChunkEvicted { coord } => {
            log::debug!(
                target: "events",
                "[tick {}] ChunkEvicted ({}, {})",
                tick,
                coord.cx,
                coord.cz
            );
        }
        E::ChunkLoaded { coord } => {
            log::debug!(
                target: "events",
                "[tick {}] ChunkLoaded ({}, {})",
                tick,
                coord.cx,
                coord.cz
            );
        }
        E::CoverageCapReached { coord, blades } => {
            log::warn!(
                target: "events",
                "[tick {}] CoverageCapReached ({}, {}) blades={}",
                tick,
                coord.cx,
                coord.cz,
                blades
            );
        }
        E::MowRequested { radius, .. } => {
            log::trace!(target: "events", "[tick {}] MowRequested r={:.2}", tick, radius);
        }
        E::DiscoveryCheck { radius, .. } => {
            log::trace!(target: "events", "[tick {}] DiscoveryCheck r={:.2}", tick, radius);
        }
        E::ObjectDiscovered(d) => {
            log::info!(
                target: "events",
                "[tick {}] ObjectDiscovered {} ({})",
                tick,
                d.label,
                d.kind.name()
            );
        }
        E::CoverageReset => {
            log::info!(target: "events", "[tick {}] CoverageReset", tick);
        }
    }
}
