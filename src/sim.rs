use std::collections::VecDeque;
use std::sync::Arc;

use meadow_coverage::{Blade, CoverageGrid, MaterializeOutcome};
use meadow_geom::Vec3;
use meadow_runtime::{ChunkStreamer, StreamStats};
use meadow_scenery::{DiscoveryEvent, SceneryObject, SceneryPlacer};
use meadow_world::{
    ChunkCoord, HeightFieldChunk, HeightSource, ObstacleMap, Terrain, WorldGenParams,
};

use crate::event::{Event, EventQueue, log_event};
use crate::save::SessionRecord;

/// What the physics side hands over each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInput {
    pub position: Vec3,
    /// Planar facing direction; need not be normalized.
    pub heading: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub center_changed: bool,
    pub evicted: Vec<ChunkCoord>,
    pub loaded: Vec<ChunkCoord>,
    pub mowed: u32,
    pub discovery: Option<DiscoveryEvent>,
}

/// Owns every chunk-indexed store and runs them in tick order:
/// stream, release evicted, materialize loaded, mow, discover.
pub struct Simulation {
    seed: i32,
    params: Arc<WorldGenParams>,
    streamer: ChunkStreamer,
    coverage: CoverageGrid,
    scenery: SceneryPlacer,
    obstacles: ObstacleMap,
    events: EventQueue,
    notifications: VecDeque<DiscoveryEvent>,
    tick: u64,
}

impl Simulation {
    pub fn new(seed: i32, params: WorldGenParams) -> Self {
        Self::with_params(seed, Arc::new(params))
    }

    pub fn with_params(seed: i32, params: Arc<WorldGenParams>) -> Self {
        let terrain = Arc::new(Terrain::new(seed, params.clone()));
        log::info!(
            "world seed={} chunk_size={} load_radius={}",
            seed,
            params.chunk_size,
            params.load_radius
        );
        Self {
            seed,
            streamer: ChunkStreamer::new(terrain),
            coverage: CoverageGrid::new(seed, params.clone()),
            scenery: SceneryPlacer::new(seed, params.clone()),
            obstacles: ObstacleMap::new(params.chunk_size),
            events: EventQueue::new(),
            notifications: VecDeque::new(),
            tick: 0,
            params,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn tick(&mut self, input: TickInput) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };
        self.events.emit_now(Event::FocalMoved {
            position: input.position,
            heading: input.heading,
        });
        self.process_events(&mut report);
        self.events.advance_tick();
        self.tick += 1;
        report
    }

    fn process_events(&mut self, report: &mut TickReport) {
        while let Some(env) = self.events.pop_ready() {
            log_event(env.tick, &env.kind);
            self.handle_event(env.kind, report);
        }
    }

    fn handle_event(&mut self, ev: Event, report: &mut TickReport) {
        match ev {
            Event::FocalMoved { position, heading } => {
                let update = self.streamer.update_focal_point(position);
                if update.center_changed {
                    report.center_changed = true;
                    if let Some(c) = self.streamer.center() {
                        self.events
                            .emit_now(Event::ViewCenterChanged { cx: c.cx, cz: c.cz });
                    }
                }
                // Evictions go first so a coordinate is released before it can come back.
                for coord in update.evicted {
                    self.events.emit_now(Event::ChunkEvicted { coord });
                }
                for coord in update.loaded {
                    self.events.emit_now(Event::ChunkLoaded { coord });
                }
                self.events.emit_now(Event::MowRequested {
                    position,
                    heading,
                    radius: self.params.mow_radius,
                });
                self.events.emit_now(Event::DiscoveryCheck {
                    position,
                    radius: self.params.discovery_radius,
                });
            }
            Event::ViewCenterChanged { .. } => {}
            Event::ChunkEvicted { coord } => {
                self.release_chunk(coord);
                report.evicted.push(coord);
            }
            Event::ChunkLoaded { coord } => {
                if let Some(blades) = self.materialize_chunk(coord) {
                    self.events
                        .emit_now(Event::CoverageCapReached { coord, blades });
                }
                report.loaded.push(coord);
            }
            Event::CoverageCapReached { .. } => {}
            Event::MowRequested {
                position,
                heading,
                radius,
            } => {
                report.mowed += self.coverage.mow(position, heading, radius);
            }
            Event::DiscoveryCheck { position, radius } => {
                if let Some(d) = self.scenery.check_discovery(position, radius) {
                    self.events.emit_now(Event::ObjectDiscovered(d));
                }
            }
            Event::ObjectDiscovered(d) => {
                self.notifications.push_back(d.clone());
                report.discovery = Some(d);
            }
            Event::CoverageReset => {
                self.coverage.reset();
            }
        }
    }

    /// Scenery first so blade scatter can see the chunk's footprints.
    /// Returns the blade count when the population cap cut the chunk short.
    fn materialize_chunk(&mut self, coord: ChunkCoord) -> Option<usize> {
        let terrain = self.streamer.terrain().clone();
        let local = terrain.local(coord);
        self.scenery
            .materialize_chunk(coord, &local, &mut self.obstacles);
        match self
            .coverage
            .materialize_chunk(coord, &local, self.obstacles.in_chunk(coord))
        {
            MaterializeOutcome::CapReached { blades } => Some(blades),
            _ => None,
        }
    }

    fn release_chunk(&mut self, coord: ChunkCoord) {
        self.scenery.on_chunk_evicted(coord, &mut self.obstacles);
        self.coverage.release_chunk(coord);
    }

    /// Ground height at `(x, z)`: cached grid when loaded, exact otherwise.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.streamer.height_at(x, z)
    }

    pub fn obstacles(&self) -> &ObstacleMap {
        &self.obstacles
    }

    pub fn is_blocked(&self, x: f32, z: f32, radius: f32) -> bool {
        self.obstacles.blocked(x, z, radius)
    }

    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        self.streamer.loaded_coords()
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = &HeightFieldChunk> {
        self.streamer.loaded_chunks()
    }

    pub fn stream_stats(&self) -> StreamStats {
        self.streamer.stats()
    }

    pub fn blades(&self) -> impl Iterator<Item = (ChunkCoord, &Blade)> {
        self.coverage.blades()
    }

    pub fn coverage(&self) -> &CoverageGrid {
        &self.coverage
    }

    pub fn scenery(&self) -> impl Iterator<Item = &SceneryObject> {
        self.scenery.objects()
    }

    pub fn coverage_percent(&self) -> f32 {
        self.coverage.coverage_percent()
    }

    pub fn area_mowed(&self) -> f32 {
        self.coverage.area_mowed()
    }

    /// Next discovery notification, oldest first.
    pub fn poll_notification(&mut self) -> Option<DiscoveryEvent> {
        self.notifications.pop_front()
    }

    pub fn discovered_labels(&self) -> &[String] {
        self.scenery.tracker().labels()
    }

    /// Every blade back to uncut; the world and discoveries are untouched.
    pub fn reset_coverage(&mut self) {
        self.events.emit_now(Event::CoverageReset);
        let mut report = TickReport::default();
        self.process_events(&mut report);
    }

    /// Starts over in a new world with the same parameters.
    pub fn reset_world(&mut self, seed: i32) {
        log::info!("resetting world to seed {}", seed);
        *self = Self::with_params(seed, self.params.clone());
    }

    pub fn session_record(&self) -> SessionRecord {
        SessionRecord {
            seed: self.seed,
            area_mowed: self.area_mowed(),
            coverage_percent: self.coverage_percent(),
            discovered: self.discovered_labels().to_vec(),
        }
    }
}
