use std::sync::Arc;

use hashbrown::HashMap;
use meadow_geom::Vec3;
use meadow_world::hash::hash01;
use meadow_world::{ChunkCoord, HeightSource, Obstacle, ObstacleMap, WorldGenParams};

use crate::placement::plan_chunk;
use crate::{DiscoveryEvent, DiscoveryTracker, SceneryKind};

const COORD_BITS: u32 = 24;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;

/// Stable object id: 24 bits each of `cx` and `cz`, 16 bits of placement ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn new(coord: ChunkCoord, ordinal: u16) -> Self {
        let cx = coord.cx as u32 as u64 & COORD_MASK;
        let cz = coord.cz as u32 as u64 & COORD_MASK;
        Self((cx << 40) | (cz << 16) | ordinal as u64)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn coord(self) -> ChunkCoord {
        // Shift the 24-bit fields to the top of an i32 and back to sign-extend.
        let unpack = |v: u64| (((v & COORD_MASK) as u32) << 8) as i32 >> 8;
        ChunkCoord::new(unpack(self.0 >> 40), unpack(self.0 >> 16))
    }

    #[inline]
    pub fn ordinal(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneryObject {
    pub id: ObjectId,
    pub kind: SceneryKind,
    pub position: Vec3,
    /// Rotation about +Y in radians.
    pub yaw: f32,
    pub discovered: bool,
}

impl SceneryObject {
    pub fn obstacle(&self) -> Obstacle {
        Obstacle {
            x: self.position.x,
            z: self.position.z,
            radius: self.kind.footprint(),
            owner: self.id.raw(),
        }
    }
}

/// Live scenery for the loaded chunks plus the session's discovery state.
pub struct SceneryPlacer {
    seed: i32,
    params: Arc<WorldGenParams>,
    live: HashMap<ChunkCoord, Vec<SceneryObject>>,
    tracker: DiscoveryTracker,
}

impl SceneryPlacer {
    pub fn new(seed: i32, params: Arc<WorldGenParams>) -> Self {
        Self {
            seed,
            params,
            live: HashMap::new(),
            tracker: DiscoveryTracker::new(seed),
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Uniform `[0, 1)` value keyed on the session seed, chunk and salt.
    #[inline]
    pub fn hash(&self, cx: i32, cz: i32, salt: u32) -> f32 {
        hash01(self.seed as u32, cx, cz, salt)
    }

    pub fn is_live(&self, coord: ChunkCoord) -> bool {
        self.live.contains_key(&coord)
    }

    /// Places the chunk's scenery and registers its footprints. No-op when already live.
    pub fn materialize_chunk(
        &mut self,
        coord: ChunkCoord,
        heights: &impl HeightSource,
        obstacles: &mut ObstacleMap,
    ) -> &[SceneryObject] {
        if !self.live.contains_key(&coord) {
            let mut objects = plan_chunk(&self.params, self.seed, coord, heights);
            for o in &mut objects {
                o.discovered = self.tracker.is_discovered(o.id);
                obstacles.insert(coord, o.obstacle());
            }
            log::debug!(
                target: "scenery",
                "placed {} objects in chunk ({}, {})",
                objects.len(),
                coord.cx,
                coord.cz
            );
            self.live.insert(coord, objects);
        }
        self.chunk_objects(coord)
    }

    /// Drops the chunk's objects and footprints. Returns how many objects were live.
    pub fn on_chunk_evicted(&mut self, coord: ChunkCoord, obstacles: &mut ObstacleMap) -> usize {
        obstacles.remove_chunk(coord);
        self.live.remove(&coord).map(|v| v.len()).unwrap_or(0)
    }

    pub fn chunk_objects(&self, coord: ChunkCoord) -> &[SceneryObject] {
        self.live.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneryObject> {
        self.live.values().flatten()
    }

    pub fn live_count(&self) -> usize {
        self.live.values().map(Vec::len).sum()
    }

    /// Discovers at most one object: the closest undiscovered one strictly within `radius`.
    pub fn check_discovery(&mut self, focal: Vec3, radius: f32) -> Option<DiscoveryEvent> {
        self.tracker
            .check(focal, radius, self.live.values_mut().flatten())
    }

    pub fn tracker(&self) -> &DiscoveryTracker {
        &self.tracker
    }
}
