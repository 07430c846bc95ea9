use hashbrown::HashMap;

use crate::ChunkCoord;

/// Circular collision footprint on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    /// Id of the placed object that owns this footprint.
    pub owner: u64,
}

impl Obstacle {
    #[inline]
    pub fn overlaps(&self, x: f32, z: f32, radius: f32) -> bool {
        let dx = x - self.x;
        let dz = z - self.z;
        let r = self.radius + radius;
        dx * dx + dz * dz < r * r
    }
}

/// Footprints grouped by the chunk that placed them.
pub struct ObstacleMap {
    chunk_size: f32,
    by_chunk: HashMap<ChunkCoord, Vec<Obstacle>>,
}

impl ObstacleMap {
    pub fn new(chunk_size: f32) -> Self {
        Self {
            chunk_size,
            by_chunk: HashMap::new(),
        }
    }

    pub fn insert(&mut self, coord: ChunkCoord, obstacle: Obstacle) {
        self.by_chunk.entry(coord).or_default().push(obstacle);
    }

    /// Drops every footprint placed by `coord`; returns how many were removed.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> usize {
        self.by_chunk.remove(&coord).map(|v| v.len()).unwrap_or(0)
    }

    pub fn in_chunk(&self, coord: ChunkCoord) -> &[Obstacle] {
        self.by_chunk.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.by_chunk.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_chunk.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chunk.values().all(Vec::is_empty)
    }

    /// True when a circle at `(x, z)` overlaps any footprint in the surrounding 3x3 chunks.
    pub fn blocked(&self, x: f32, z: f32, radius: f32) -> bool {
        let home = ChunkCoord::from_world(x, z, self.chunk_size);
        home.neighborhood()
            .iter()
            .any(|c| self.in_chunk(*c).iter().any(|o| o.overlaps(x, z, radius)))
    }
}
