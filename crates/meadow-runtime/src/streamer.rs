use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use meadow_geom::Vec3;
use meadow_world::{ChunkCoord, HeightFieldChunk, HeightSource, MAX_LOAD_RADIUS, Terrain};

/// Per-coordinate lifecycle. Absence from the map is `Unloaded`.
pub enum ChunkState {
    /// Queued for generation; no grid yet.
    Loading,
    Loaded(HeightFieldChunk),
}

impl ChunkState {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, ChunkState::Loaded(_))
    }
}

/// What one focal-point update changed. Evictions are listed first and must be
/// released by dependents before `loaded` is materialized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamUpdate {
    pub center_changed: bool,
    pub evicted: Vec<ChunkCoord>,
    pub loaded: Vec<ChunkCoord>,
}

impl StreamUpdate {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.evicted.is_empty() && self.loaded.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StreamStats {
    pub loaded: usize,
    pub pending: usize,
    pub created_total: u64,
    pub evicted_total: u64,
}

pub struct ChunkStreamer {
    terrain: Arc<Terrain>,
    load_radius: i32,
    max_loads_per_tick: Option<usize>,
    center: Option<ChunkCoord>,
    chunks: HashMap<ChunkCoord, ChunkState>,
    pending: VecDeque<ChunkCoord>,
    created_total: u64,
    evicted_total: u64,
}

impl ChunkStreamer {
    pub fn new(terrain: Arc<Terrain>) -> Self {
        let params = terrain.params();
        let load_radius = params.load_radius.clamp(0, MAX_LOAD_RADIUS);
        let max_loads_per_tick = params.max_loads_per_tick.filter(|n| *n > 0);
        Self {
            terrain,
            load_radius,
            max_loads_per_tick,
            center: None,
            chunks: HashMap::new(),
            pending: VecDeque::new(),
            created_total: 0,
            evicted_total: 0,
        }
    }

    #[inline]
    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    #[inline]
    pub fn load_radius(&self) -> i32 {
        self.load_radius
    }

    /// Chunks beyond this Chebyshev distance from the centre are evicted.
    #[inline]
    pub fn evict_radius(&self) -> i32 {
        self.load_radius + 1
    }

    #[inline]
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn update_focal_point(&mut self, position: Vec3) -> StreamUpdate {
        let center = self.terrain.coord_of(position.x, position.z);
        if self.center == Some(center) && self.pending.is_empty() {
            return StreamUpdate::default();
        }
        let mut update = StreamUpdate::default();
        if self.center != Some(center) {
            self.center = Some(center);
            update.center_changed = true;
            log::debug!("stream centre -> ({}, {})", center.cx, center.cz);
            update.evicted = self.evict_outside(center);
            self.enqueue_within(center);
        }
        update.loaded = self.drain_pending();
        update
    }

    /// Loads `coord` now if it is not already loaded. Returns true when a chunk was created.
    pub fn ensure_loaded(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.get(&coord).is_some_and(ChunkState::is_loaded) {
            return false;
        }
        self.pending.retain(|c| *c != coord);
        self.generate(coord);
        true
    }

    /// Drops `coord`'s grid. Returns false if nothing was there.
    pub fn unload(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.remove(&coord) {
            Some(ChunkState::Loaded(_)) => {
                self.evicted_total += 1;
                true
            }
            Some(ChunkState::Loading) => {
                self.pending.retain(|c| *c != coord);
                false
            }
            None => false,
        }
    }

    pub fn state(&self, coord: ChunkCoord) -> Option<&ChunkState> {
        self.chunks.get(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&HeightFieldChunk> {
        match self.chunks.get(&coord) {
            Some(ChunkState::Loaded(c)) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunk(coord).is_some()
    }

    /// Loaded coordinates, sorted for stable output.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, s)| s.is_loaded())
            .map(|(c, _)| *c)
            .collect();
        out.sort_unstable();
        out
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = &HeightFieldChunk> {
        self.chunks.values().filter_map(|s| match s {
            ChunkState::Loaded(c) => Some(c),
            ChunkState::Loading => None,
        })
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            loaded: self.chunks.values().filter(|s| s.is_loaded()).count(),
            pending: self.pending.len(),
            created_total: self.created_total,
            evicted_total: self.evicted_total,
        }
    }

    fn evict_outside(&mut self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let limit = self.evict_radius();
        let mut victims: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|c| center.chebyshev(*c) > limit)
            .collect();
        victims.sort_unstable();
        let mut evicted = Vec::with_capacity(victims.len());
        for coord in victims {
            if self.unload(coord) {
                log::trace!(target: "events", "evict ({}, {})", coord.cx, coord.cz);
                evicted.push(coord);
            }
        }
        evicted
    }

    fn enqueue_within(&mut self, center: ChunkCoord) {
        // Re-rank what is still queued against the new centre; drop what fell out of range.
        let radius = self.load_radius;
        let mut queue: Vec<ChunkCoord> = Vec::with_capacity(self.pending.len());
        for coord in self.pending.drain(..) {
            if center.chebyshev(coord) <= radius {
                queue.push(coord);
            } else {
                self.chunks.remove(&coord);
            }
        }
        for coord in center.square_around(self.load_radius) {
            if !self.chunks.contains_key(&coord) {
                self.chunks.insert(coord, ChunkState::Loading);
                queue.push(coord);
            }
        }
        queue.sort_by_key(|c| (center.chebyshev(*c), *c));
        self.pending.extend(queue);
    }

    fn drain_pending(&mut self) -> Vec<ChunkCoord> {
        let budget = self.max_loads_per_tick.unwrap_or(usize::MAX);
        let mut loaded = Vec::new();
        while loaded.len() < budget {
            let Some(coord) = self.pending.pop_front() else {
                break;
            };
            self.generate(coord);
            loaded.push(coord);
        }
        if !self.pending.is_empty() {
            log::debug!(
                "stream budget hit: {} chunk(s) still pending",
                self.pending.len()
            );
        }
        loaded
    }

    fn generate(&mut self, coord: ChunkCoord) {
        let chunk = HeightFieldChunk::generate(&self.terrain, coord);
        self.chunks.insert(coord, ChunkState::Loaded(chunk));
        self.created_total += 1;
        log::trace!(target: "events", "load ({}, {})", coord.cx, coord.cz);
    }
}

impl HeightSource for ChunkStreamer {
    /// Cached bilinear lookup when the chunk is loaded, stateless evaluation otherwise.
    fn height_at(&self, x: f32, z: f32) -> f32 {
        match self.chunk(self.terrain.coord_of(x, z)) {
            Some(chunk) => chunk.grid_height_at(x, z),
            None => self.terrain.elevation_at(x, z),
        }
    }
}
