use std::sync::Arc;

use meadow_geom::Vec3;
use meadow_runtime::{ChunkState, ChunkStreamer};
use meadow_world::{ChunkCoord, HeightSource, Terrain, WorldGenParams};
use proptest::prelude::*;

fn streamer_with(radius: i32, budget: usize) -> ChunkStreamer {
    let mut params = WorldGenParams::default();
    params.chunk_size = 50.0;
    params.load_radius = radius;
    params.max_loads_per_tick = if budget == 0 { None } else { Some(budget) };
    // Small grids keep the tests quick.
    params.grid_cells = 5;
    ChunkStreamer::new(Arc::new(Terrain::new(17, Arc::new(params))))
}

#[test]
fn origin_loads_five_by_five() {
    let mut s = streamer_with(2, 0);
    let up = s.update_focal_point(Vec3::new(0.0, 0.0, 0.0));
    assert!(up.center_changed);
    assert_eq!(up.loaded.len(), 25);
    assert!(up.evicted.is_empty());
    for cz in -2..=2 {
        for cx in -2..=2 {
            assert!(s.is_loaded(ChunkCoord::new(cx, cz)));
        }
    }
}

#[test]
fn moving_east_evicts_far_column_and_loads_new_ones() {
    let mut s = streamer_with(2, 0);
    s.update_focal_point(Vec3::new(0.0, 0.0, 0.0));
    let up = s.update_focal_point(Vec3::new(130.0, 0.0, 0.0));
    assert_eq!(s.center(), Some(ChunkCoord::new(2, 0)));

    let mut evicted = up.evicted.clone();
    evicted.sort();
    let expected_evicted: Vec<ChunkCoord> = (-2..=2).map(|cz| ChunkCoord::new(-2, cz)).collect();
    assert_eq!(evicted, expected_evicted);

    assert_eq!(up.loaded.len(), 10);
    assert!(up.loaded.iter().all(|c| c.cx == 3 || c.cx == 4));
    assert!(s.is_loaded(ChunkCoord::new(4, 2)));
    // Hysteresis keeps the column at distance 3.
    assert!(s.is_loaded(ChunkCoord::new(-1, 0)));
    assert_eq!(s.loaded_coords().len(), 30);
}

#[test]
fn far_focal_points_stream_without_overflow() {
    let mut s = streamer_with(2, 0);
    let up = s.update_focal_point(Vec3::new(2.0e11, 0.0, 0.0));
    assert_eq!(up.loaded.len(), 25);
    let far = s.center().unwrap();
    assert!(far.cx > 0 && far.cz == 0);
    assert!(s.height_at(2.0e11, 0.0).is_finite());

    let up = s.update_focal_point(Vec3::new(-2.0e11, 0.0, -2.0e11));
    assert_eq!(up.evicted.len(), 25);
    assert_eq!(up.loaded.len(), 25);

    let up = s.update_focal_point(Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(up.evicted.len(), 25);
    assert_eq!(s.loaded_coords().len(), 25);
}

#[test]
fn same_focal_chunk_is_a_no_op() {
    let mut s = streamer_with(2, 0);
    s.update_focal_point(Vec3::new(10.0, 0.0, 10.0));
    let before = s.stats();
    let up = s.update_focal_point(Vec3::new(40.0, 3.0, 49.0));
    assert!(up.is_empty());
    assert!(!up.center_changed);
    let after = s.stats();
    assert_eq!(before.created_total, after.created_total);
    assert_eq!(before.evicted_total, after.evicted_total);
}

#[test]
fn ensure_loaded_is_idempotent() {
    let mut s = streamer_with(1, 0);
    let c = ChunkCoord::new(40, -40);
    assert!(s.ensure_loaded(c));
    assert!(!s.ensure_loaded(c));
    assert_eq!(s.stats().created_total, 1);
    assert!(s.unload(c));
    assert!(!s.unload(c));
    assert!(s.ensure_loaded(c));
}

#[test]
fn budget_amortizes_loading_nearest_first() {
    let mut s = streamer_with(2, 4);
    let up = s.update_focal_point(Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(up.loaded.len(), 4);
    assert_eq!(up.loaded[0], ChunkCoord::new(0, 0));
    assert!(matches!(
        s.state(ChunkCoord::new(2, 2)),
        Some(ChunkState::Loading)
    ));

    let mut total = up.loaded.len();
    let mut ticks = 0;
    while s.stats().pending > 0 {
        // Same focal chunk: still drains the queue.
        let up = s.update_focal_point(Vec3::new(1.0, 0.0, 1.0));
        assert!(up.loaded.len() <= 4);
        total += up.loaded.len();
        ticks += 1;
        assert!(ticks < 20);
    }
    assert_eq!(total, 25);
    assert!(s.update_focal_point(Vec3::new(1.0, 0.0, 1.0)).is_empty());
}

#[test]
fn height_source_falls_back_when_unloaded() {
    let mut s = streamer_with(0, 0);
    let terrain = Arc::clone(s.terrain());
    let far = (10_000.0, -7_000.0);
    assert_eq!(s.height_at(far.0, far.1), terrain.elevation_at(far.0, far.1));

    s.update_focal_point(Vec3::new(0.0, 0.0, 0.0));
    let chunk = s.chunk(ChunkCoord::new(0, 0)).unwrap();
    let (x, z) = chunk.sample_position(2, 3);
    assert!((s.height_at(x, z) - terrain.elevation_at(x, z)).abs() < 1e-3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // After any walk the load square is fully loaded and nothing beyond the evict ring survives.
    #[test]
    fn loaded_set_tracks_centre(steps in proptest::collection::vec((-120.0f32..120.0, -120.0f32..120.0), 1..12)) {
        let mut s = streamer_with(1, 0);
        let mut pos = Vec3::ZERO;
        for (dx, dz) in steps {
            pos += Vec3::new(dx, 0.0, dz);
            s.update_focal_point(pos);
            let center = s.center().unwrap();
            for c in center.square_around(1) {
                prop_assert!(s.is_loaded(c));
            }
            for c in s.loaded_coords() {
                prop_assert!(center.chebyshev(c) <= 2);
            }
        }
    }
}
