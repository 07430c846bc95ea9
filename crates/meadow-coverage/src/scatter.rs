use std::f32::consts::TAU;

use meadow_geom::Vec3;
use meadow_world::{ChunkCoord, ChunkHash, HeightSource, Obstacle, WorldGenParams};

use crate::Blade;

const SALT_BLADE: u32 = 0xB1_0000;
// Attempts per requested blade before giving up on a crowded chunk.
const ATTEMPTS_PER_BLADE: u32 = 3;

/// Deterministic blade placement for `coord`, at most `limit` blades.
///
/// Candidates are uniform in the chunk; those off the walkable band or inside one
/// of `obstacles` are rejected. The output depends only on the inputs, so the
/// first `k` blades of a chunk are always the same `k` blades.
pub fn scatter_blades(
    params: &WorldGenParams,
    seed: i32,
    coord: ChunkCoord,
    heights: &impl HeightSource,
    obstacles: &[Obstacle],
    limit: u32,
) -> Vec<Blade> {
    let hash = ChunkHash::new(seed, coord);
    let (x0, z0) = coord.origin(params.chunk_size);
    let wanted = limit.min(params.blades_per_chunk);
    let attempts = params.blades_per_chunk.saturating_mul(ATTEMPTS_PER_BLADE);
    let mut out = Vec::with_capacity(wanted as usize);
    for attempt in 0..attempts {
        if out.len() as u32 >= wanted {
            break;
        }
        let salt = SALT_BLADE.wrapping_add(attempt.wrapping_mul(4));
        let x = x0 + hash.unit(salt) * params.chunk_size;
        let z = z0 + hash.unit(salt + 1) * params.chunk_size;
        if obstacles.iter().any(|o| o.overlaps(x, z, 0.0)) {
            continue;
        }
        let y = heights.height_at(x, z);
        if !params.is_walkable(y) {
            continue;
        }
        let yaw = hash.unit(salt + 2) * TAU;
        let scale = hash.range(salt + 3, params.blade_scale_min, params.blade_scale_max);
        out.push(Blade::new(Vec3::new(x, y, z), yaw, scale));
    }
    out
}
