use std::sync::Arc;

use crate::depression::{Depression, depressions_for_chunk};
use crate::{ChunkCoord, NoiseField, WorldGenParams};

/// Anything that can answer "ground height at (x, z)".
pub trait HeightSource {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

// Per-octave sample offsets keep octaves from lining up at the origin.
const OCTAVE_OFFSETS: [(f32, f32); 4] = [
    (0.0, 0.0),
    (131.7, -71.3),
    (-263.1, 193.9),
    (417.3, 359.5),
];

/// The stateless elevation function. Every cached height is an approximation of this.
pub struct Terrain {
    seed: i32,
    params: Arc<WorldGenParams>,
    noise: NoiseField,
}

impl Terrain {
    pub fn new(seed: i32, params: Arc<WorldGenParams>) -> Self {
        Self {
            seed,
            params,
            noise: NoiseField::new(seed),
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
    pub fn params_arc(&self) -> Arc<WorldGenParams> {
        Arc::clone(&self.params)
    }

    #[inline]
    pub fn chunk_size(&self) -> f32 {
        self.params.chunk_size
    }

    #[inline]
    pub fn coord_of(&self, x: f32, z: f32) -> ChunkCoord {
        ChunkCoord::from_world(x, z, self.params.chunk_size)
    }

    #[inline]
    pub fn is_walkable(&self, height: f32) -> bool {
        self.params.is_walkable(height)
    }

    /// Shaped multi-octave noise, before any depression is carved.
    pub fn base_elevation(&self, x: f32, z: f32) -> f32 {
        let p = &*self.params;
        let mut freq = p.height_frequency;
        let mut amp = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut norm = 0.0_f32;
        for (ox, oz) in OCTAVE_OFFSETS.iter().take(p.octaves as usize) {
            sum += amp * self.noise.sample(x * freq + ox, z * freq + oz);
            norm += amp;
            amp *= p.persistence;
            freq *= p.lacunarity;
        }
        let n = if norm > 0.0 { sum / norm } else { 0.0 };
        let unit = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
        p.base_height + p.amplitude * unit.powf(p.shape_exponent)
    }

    /// Depressions owned by `coord`.
    pub fn depressions(&self, coord: ChunkCoord) -> Vec<Depression> {
        depressions_for_chunk(&self.params, self.seed, coord)
    }

    /// Depressions of `coord` and its 8 neighbours; everything that can reach into `coord`.
    pub fn depressions_around(&self, coord: ChunkCoord) -> Vec<Depression> {
        coord
            .neighborhood()
            .iter()
            .flat_map(|c| self.depressions(*c))
            .collect()
    }

    /// Elevation with an already-gathered depression list.
    #[inline]
    pub fn elevation_with(&self, x: f32, z: f32, depressions: &[Depression]) -> f32 {
        let base = self.base_elevation(x, z);
        depressions
            .iter()
            .fold(base, |h, d| h.min(d.carve(x, z, base)))
    }

    pub fn elevation_at(&self, x: f32, z: f32) -> f32 {
        let around = self.depressions_around(self.coord_of(x, z));
        self.elevation_with(x, z, &around)
    }
}

impl Terrain {
    /// Stateless elevation with `coord`'s depression neighbourhood gathered once.
    /// Exact for points inside `coord`; use it for batch work within one chunk.
    pub fn local(&self, coord: ChunkCoord) -> LocalElevation<'_> {
        LocalElevation {
            terrain: self,
            coord,
            depressions: self.depressions_around(coord),
        }
    }
}

pub struct LocalElevation<'t> {
    terrain: &'t Terrain,
    coord: ChunkCoord,
    depressions: Vec<Depression>,
}

impl LocalElevation<'_> {
    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }
}

impl HeightSource for LocalElevation<'_> {
    #[inline]
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.terrain.elevation_with(x, z, &self.depressions)
    }
}

impl HeightSource for Terrain {
    #[inline]
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.elevation_at(x, z)
    }
}
