use std::sync::Arc;

use meadow_world::{ChunkCoord, HeightFieldChunk, HeightSource, Terrain, WorldGenParams};
use proptest::prelude::*;

fn pond_heavy_params() -> WorldGenParams {
    let mut p = WorldGenParams::default();
    p.depression_probability = 0.9;
    p.depressions_max = 2;
    p.depression_radius_min = 10.0;
    p.depression_radius_max = p.chunk_size / 1.5;
    p
}

fn coord() -> impl Strategy<Value = i32> {
    -200i32..=200
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Approaching a shared x-edge from both sides converges to the same height.
    #[test]
    fn seams_are_continuous_across_x(seed in any::<i32>(), cx in coord(), cz in coord(), t in 0.0f32..1.0) {
        let terrain = Terrain::new(seed, Arc::new(pond_heavy_params()));
        let size = terrain.chunk_size();
        let edge_x = (cx + 1) as f32 * size;
        let z = cz as f32 * size + t * size;
        let eps = 1e-3;
        let left = terrain.elevation_at(edge_x - eps, z);
        let right = terrain.elevation_at(edge_x + eps, z);
        prop_assert!((left - right).abs() < 0.01, "left={} right={}", left, right);
    }

    #[test]
    fn seams_are_continuous_across_z(seed in any::<i32>(), cx in coord(), cz in coord(), t in 0.0f32..1.0) {
        let terrain = Terrain::new(seed, Arc::new(pond_heavy_params()));
        let size = terrain.chunk_size();
        let edge_z = (cz + 1) as f32 * size;
        let x = cx as f32 * size + t * size;
        let eps = 1e-3;
        let below = terrain.elevation_at(x, edge_z - eps);
        let above = terrain.elevation_at(x, edge_z + eps);
        prop_assert!((below - above).abs() < 0.01, "below={} above={}", below, above);
    }

    // Neighbouring cached grids agree on their shared edge samples.
    #[test]
    fn neighbouring_grids_share_edges(seed in any::<i32>(), cx in -50i32..50, cz in -50i32..50) {
        let terrain = Terrain::new(seed, Arc::new(pond_heavy_params()));
        let a = HeightFieldChunk::generate(&terrain, ChunkCoord::new(cx, cz));
        let b = HeightFieldChunk::generate(&terrain, ChunkCoord::new(cx + 1, cz));
        let n = a.cells();
        for iz in 0..=n {
            let ha = a.sample(n, iz);
            let hb = b.sample(0, iz);
            prop_assert!((ha - hb).abs() < 1e-3, "iz={} a={} b={}", iz, ha, hb);
        }
    }

    #[test]
    fn elevation_is_deterministic(seed in any::<i32>(), x in -1e4f32..1e4, z in -1e4f32..1e4) {
        let params = Arc::new(pond_heavy_params());
        let a = Terrain::new(seed, Arc::clone(&params));
        let b = Terrain::new(seed, params);
        prop_assert_eq!(a.height_at(x, z), b.height_at(x, z));
    }

    // Bilinear lookups never leave the grid, whatever the query.
    #[test]
    fn grid_queries_never_panic(x in -1e6f32..1e6, z in -1e6f32..1e6) {
        let terrain = Terrain::new(7, Arc::new(WorldGenParams::default()));
        let chunk = HeightFieldChunk::generate(&terrain, ChunkCoord::new(0, 0));
        prop_assert!(chunk.grid_height_at(x, z).is_finite());
    }
}

#[test]
fn grid_approximates_stateless_between_samples() {
    let terrain = Terrain::new(11, Arc::new(WorldGenParams::default()));
    let chunk = HeightFieldChunk::generate(&terrain, ChunkCoord::new(2, -1));
    let b = chunk.bounds();
    let mut worst = 0.0_f32;
    for i in 0..200 {
        let x = b.min_x + (i as f32 * 0.37) % b.width();
        let z = b.min_z + (i as f32 * 0.91) % b.depth();
        worst = worst.max((chunk.grid_height_at(x, z) - terrain.elevation_at(x, z)).abs());
    }
    // Spacing is 2 units on gentle terrain; interpolation error stays small.
    assert!(worst < 0.5, "worst={worst}");
}
