//! Carved low areas (ponds, moats) and their smooth falloff.

use crate::hash::ChunkHash;
use crate::{ChunkCoord, WorldGenParams};

const SALT_COUNT: u32 = 0xD3_0000;
const SALT_BASE: u32 = 0xD3_1000;

/// Influence reaches this multiple of the radius before fading to nothing.
pub const FALLOFF_SCALE: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Depression {
    pub center_x: f32,
    pub center_z: f32,
    pub radius: f32,
    pub depth: f32,
}

impl Depression {
    #[inline]
    pub fn influence_radius(&self) -> f32 {
        self.radius * FALLOFF_SCALE
    }

    /// Lowers `base` linearly from full `depth` at the centre to zero at the influence edge.
    #[inline]
    pub fn carve(&self, x: f32, z: f32, base: f32) -> f32 {
        let reach = self.influence_radius();
        if reach <= 0.0 {
            return base;
        }
        let dx = x - self.center_x;
        let dz = z - self.center_z;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist >= reach {
            return base;
        }
        base - self.depth * (1.0 - dist / reach)
    }
}

/// The depressions owned by `coord`. Pure in `(seed, coord)`.
pub fn depressions_for_chunk(
    params: &WorldGenParams,
    seed: i32,
    coord: ChunkCoord,
) -> Vec<Depression> {
    let h = ChunkHash::new(seed, coord);
    let (x0, z0) = coord.origin(params.chunk_size);
    let mut out = Vec::new();
    for i in 0..params.depressions_max {
        let salt = SALT_BASE + i * 8;
        if !h.chance(SALT_COUNT + i, params.depression_probability) {
            continue;
        }
        out.push(Depression {
            center_x: x0 + h.unit(salt) * params.chunk_size,
            center_z: z0 + h.unit(salt + 1) * params.chunk_size,
            radius: h.range(
                salt + 2,
                params.depression_radius_min,
                params.depression_radius_max,
            ),
            depth: h.range(
                salt + 3,
                params.depression_depth_min,
                params.depression_depth_max,
            ),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pond() -> Depression {
        Depression {
            center_x: 10.0,
            center_z: -4.0,
            radius: 4.0,
            depth: 2.0,
        }
    }

    #[test]
    fn full_depth_at_centre_and_none_at_reach() {
        let d = pond();
        assert!((d.carve(10.0, -4.0, 3.0) - 1.0).abs() < 1e-6);
        assert_eq!(d.carve(16.0, -4.0, 3.0), 3.0);
        assert_eq!(d.carve(30.0, 30.0, 3.0), 3.0);
    }

    #[test]
    fn falloff_is_linear() {
        let d = pond();
        // halfway to the 6.0 reach
        assert!((d.carve(13.0, -4.0, 0.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn chunk_depressions_are_deterministic_and_inside() {
        let mut params = WorldGenParams::default();
        params.depression_probability = 1.0;
        params.depressions_max = 3;
        let coord = ChunkCoord::new(-2, 7);
        let a = depressions_for_chunk(&params, 99, coord);
        let b = depressions_for_chunk(&params, 99, coord);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        let bounds = coord.bounds(params.chunk_size);
        for d in &a {
            assert!(bounds.contains(d.center_x, d.center_z));
            assert!(d.influence_radius() <= params.chunk_size + 1e-4);
        }
    }

    #[test]
    fn zero_probability_carves_nothing() {
        let mut params = WorldGenParams::default();
        params.depression_probability = 0.0;
        params.depressions_max = 4;
        assert!(depressions_for_chunk(&params, 5, ChunkCoord::new(0, 0)).is_empty());
    }
}
