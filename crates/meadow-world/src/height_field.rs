use meadow_geom::Rect;
use rayon::prelude::*;

use crate::depression::Depression;
use crate::{ChunkCoord, Terrain};

/// Cached elevation grid for one chunk.
///
/// Samples sit at `origin + i * spacing` for `i in 0..=cells` on both axes, so
/// the far edge is shared with the neighbouring chunk and interpolation never
/// has to reach outside.
#[derive(Clone, Debug)]
pub struct HeightFieldChunk {
    coord: ChunkCoord,
    origin_x: f32,
    origin_z: f32,
    spacing: f32,
    cells: usize,
    heights: Vec<f32>,
    depressions: Vec<Depression>,
}

impl HeightFieldChunk {
    pub fn generate(terrain: &Terrain, coord: ChunkCoord) -> Self {
        let params = terrain.params();
        let cells = params.grid_cells.max(1);
        let spacing = params.grid_spacing();
        let (origin_x, origin_z) = coord.origin(params.chunk_size);
        let around = terrain.depressions_around(coord);
        let side = cells + 1;
        // Read-only sampling; the finished vector is handed back to the caller's thread.
        let heights: Vec<f32> = (0..side * side)
            .into_par_iter()
            .map(|i| {
                let ix = i % side;
                let iz = i / side;
                let x = origin_x + ix as f32 * spacing;
                let z = origin_z + iz as f32 * spacing;
                terrain.elevation_with(x, z, &around)
            })
            .collect();
        Self {
            coord,
            origin_x,
            origin_z,
            spacing,
            cells,
            heights,
            depressions: terrain.depressions(coord),
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.cells
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[inline]
    pub fn depressions(&self) -> &[Depression] {
        &self.depressions
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        let size = self.spacing * self.cells as f32;
        Rect::new(
            self.origin_x,
            self.origin_z,
            self.origin_x + size,
            self.origin_z + size,
        )
    }

    /// World position of sample `(ix, iz)`.
    #[inline]
    pub fn sample_position(&self, ix: usize, iz: usize) -> (f32, f32) {
        (
            self.origin_x + ix as f32 * self.spacing,
            self.origin_z + iz as f32 * self.spacing,
        )
    }

    /// Stored sample, clamped to the grid.
    #[inline]
    pub fn sample(&self, ix: usize, iz: usize) -> f32 {
        let ix = ix.min(self.cells);
        let iz = iz.min(self.cells);
        self.heights[iz * (self.cells + 1) + ix]
    }

    /// Bilinear interpolation of the four samples around `(x, z)`.
    /// Positions off the grid are clamped to the nearest edge cell.
    pub fn grid_height_at(&self, x: f32, z: f32) -> f32 {
        let (ix, fx) = self.locate(x - self.origin_x);
        let (iz, fz) = self.locate(z - self.origin_z);
        let h00 = self.sample(ix, iz);
        let h10 = self.sample(ix + 1, iz);
        let h01 = self.sample(ix, iz + 1);
        let h11 = self.sample(ix + 1, iz + 1);
        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }

    /// Cell index and fractional offset along one axis.
    #[inline]
    fn locate(&self, local: f32) -> (usize, f32) {
        let max = self.cells as f32;
        let mut f = local / self.spacing;
        if !f.is_finite() {
            f = 0.0;
        }
        let f = f.clamp(0.0, max);
        let i = (f.floor() as usize).min(self.cells - 1);
        (i, f - i as f32)
    }
}
