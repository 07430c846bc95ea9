use std::sync::Arc;

use meadow_coverage::{Blade, CoverageGrid, CutState, MaterializeOutcome};
use meadow_geom::Vec3;
use meadow_world::{ChunkCoord, HeightSource, MowPolicy, Obstacle, WorldGenParams};
use proptest::prelude::*;

struct Flat;

impl HeightSource for Flat {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        1.0
    }
}

fn params(blades_per_chunk: u32, cap: usize) -> Arc<WorldGenParams> {
    let mut p = WorldGenParams::default();
    p.blades_per_chunk = blades_per_chunk;
    p.population_cap = cap;
    Arc::new(p)
}

fn blade_at(x: f32, z: f32) -> Blade {
    Blade::new(Vec3::new(x, 0.0, z), 0.0, 1.0)
}

/// Three blades at 0.5, 0.8 and 1.0 east of the mower at (10, 0, 10).
fn three_blade_fixture() -> (CoverageGrid, Vec3) {
    let focal = Vec3::new(10.0, 0.0, 10.0);
    let mut grid = CoverageGrid::new(1, params(0, 1000));
    let blades = vec![
        blade_at(focal.x + 0.5, focal.z),
        blade_at(focal.x + 0.8, focal.z),
        blade_at(focal.x + 1.0, focal.z),
    ];
    assert!(grid.insert_chunk_blades(ChunkCoord::new(0, 0), blades));
    (grid, focal)
}

fn cut_flags(grid: &CoverageGrid) -> Vec<bool> {
    grid.chunk_blades(ChunkCoord::new(0, 0))
        .iter()
        .map(Blade::is_cut)
        .collect()
}

#[test]
fn mow_boundary_is_exclusive() {
    let (mut grid, focal) = three_blade_fixture();
    // Radius equal to the middle blade's own offset: that blade must stay standing.
    let boundary = grid.chunk_blades(ChunkCoord::new(0, 0))[1].position.x - focal.x;
    assert_eq!(grid.mow(focal, Vec3::FORWARD, boundary), 1);
    assert_eq!(cut_flags(&grid), vec![true, false, false]);
}

#[test]
fn nominal_radius_cuts_only_the_nearest() {
    let (mut grid, focal) = three_blade_fixture();
    assert_eq!(grid.mow(focal, Vec3::FORWARD, 0.8), 1);
    assert_eq!(cut_flags(&grid), vec![true, false, false]);
}

#[test]
fn radius_just_past_boundary_takes_the_second() {
    let (mut grid, focal) = three_blade_fixture();
    let boundary = grid.chunk_blades(ChunkCoord::new(0, 0))[1].position.x - focal.x;
    assert_eq!(grid.mow(focal, Vec3::FORWARD, boundary + 1e-4), 2);
    assert_eq!(cut_flags(&grid), vec![true, true, false]);
    // Already-cut blades are not counted twice.
    assert_eq!(grid.mow(focal, Vec3::FORWARD, 1.5), 1);
    assert_eq!(grid.cut_count(), 3);
}

#[test]
fn zero_radius_and_empty_world_are_no_ops() {
    let mut empty = CoverageGrid::new(1, params(100, 1000));
    assert_eq!(empty.mow(Vec3::ZERO, Vec3::FORWARD, 5.0), 0);
    assert_eq!(empty.coverage_percent(), 0.0);

    let (mut grid, focal) = three_blade_fixture();
    assert_eq!(grid.mow(focal, Vec3::FORWARD, 0.0), 0);
    assert_eq!(grid.mow(focal, Vec3::FORWARD, f32::NAN), 0);
    assert_eq!(grid.cut_count(), 0);
}

#[test]
fn forward_arc_spares_blades_behind() {
    let (mut grid, focal) = three_blade_fixture();
    grid.set_policy(MowPolicy::ForwardArc {
        half_angle: 60f32.to_radians(),
    });
    // Facing west, all blades are behind.
    assert_eq!(grid.mow(focal, Vec3::new(-1.0, 0.0, 0.0), 2.0), 0);
    // Facing east, all are ahead.
    assert_eq!(grid.mow(focal, Vec3::new(1.0, 0.0, 0.0), 2.0), 3);
}

#[test]
fn coverage_percent_and_reset() {
    let (mut grid, focal) = three_blade_fixture();
    grid.mow(focal, Vec3::FORWARD, 0.9);
    assert!((grid.coverage_percent() - 200.0 / 3.0).abs() < 1e-3);
    grid.reset();
    assert_eq!(grid.cut_count(), 0);
    assert_eq!(grid.coverage_percent(), 0.0);
    assert_eq!(grid.total_count(), 3);
    assert!(cut_flags(&grid).iter().all(|c| !c));
    assert_eq!(grid.chunk_blades(ChunkCoord::new(0, 0))[0].position.x, 10.5);
}

#[test]
fn release_and_restore_keeps_cut_state() {
    let mut grid = CoverageGrid::new(77, params(400, 100_000));
    let c = ChunkCoord::new(0, 0);
    assert_eq!(
        grid.materialize_chunk(c, &Flat, &[]),
        MaterializeOutcome::Generated { blades: 400 }
    );
    assert_eq!(
        grid.materialize_chunk(c, &Flat, &[]),
        MaterializeOutcome::AlreadyLive
    );
    let cut = grid.mow(Vec3::new(25.0, 0.0, 25.0), Vec3::FORWARD, 10.0);
    assert!(cut > 0);
    let before: Vec<Blade> = grid.chunk_blades(c).to_vec();
    let pct = grid.coverage_percent();

    assert!(grid.release_chunk(c));
    assert_eq!(grid.live_blades(), 0);
    assert_eq!(grid.coverage_percent(), pct);
    assert_eq!(grid.mow(Vec3::new(25.0, 0.0, 25.0), Vec3::FORWARD, 10.0), 0);

    assert_eq!(
        grid.materialize_chunk(c, &Flat, &[]),
        MaterializeOutcome::Restored { blades: 400 }
    );
    assert_eq!(grid.chunk_blades(c), &before[..]);
    assert_eq!(grid.total_count(), 400);
    // Re-mowing the same patch finds nothing new.
    assert_eq!(grid.mow(Vec3::new(25.0, 0.0, 25.0), Vec3::FORWARD, 10.0), 0);
}

#[test]
fn population_cap_bounds_live_blades() {
    let mut grid = CoverageGrid::new(3, params(300, 500));
    let a = ChunkCoord::new(0, 0);
    let b = ChunkCoord::new(1, 0);
    let c = ChunkCoord::new(2, 0);
    assert_eq!(
        grid.materialize_chunk(a, &Flat, &[]),
        MaterializeOutcome::Generated { blades: 300 }
    );
    assert_eq!(
        grid.materialize_chunk(b, &Flat, &[]),
        MaterializeOutcome::CapReached { blades: 200 }
    );
    assert_eq!(
        grid.materialize_chunk(c, &Flat, &[]),
        MaterializeOutcome::CapReached { blades: 0 }
    );
    assert_eq!(grid.live_blades(), 500);
    assert_eq!(grid.total_count(), 500);

    // Freeing room lets the bare chunk grow on its next visit.
    grid.release_chunk(a);
    assert_eq!(
        grid.materialize_chunk(c, &Flat, &[]),
        MaterializeOutcome::Generated { blades: 300 }
    );
    assert_eq!(grid.total_count(), 800);
    assert_eq!(grid.stats().ledger_chunks, 1);
}

#[test]
fn capped_restore_keeps_tail_flags() {
    let mut grid = CoverageGrid::new(5, params(300, 10_000));
    let a = ChunkCoord::new(0, 0);
    grid.materialize_chunk(a, &Flat, &[]);
    // Cut the whole chunk.
    grid.mow(Vec3::new(25.0, 0.0, 25.0), Vec3::FORWARD, 80.0);
    assert_eq!(grid.cut_count(), 300);
    grid.release_chunk(a);

    grid.set_population_cap(100);
    assert_eq!(
        grid.materialize_chunk(a, &Flat, &[]),
        MaterializeOutcome::CapReached { blades: 100 }
    );
    assert_eq!(grid.stats().cut_blades, 300);
    grid.release_chunk(a);
    grid.set_population_cap(10_000);
    assert_eq!(
        grid.materialize_chunk(a, &Flat, &[]),
        MaterializeOutcome::Restored { blades: 300 }
    );
    assert!(grid.chunk_blades(a).iter().all(|b| b.state == CutState::Cut));
}

#[test]
fn untouched_chunks_leave_no_flag_storage() {
    let mut grid = CoverageGrid::new(9, params(1500, 10_000_000));
    for cx in 0..200 {
        let c = ChunkCoord::new(cx, 0);
        grid.materialize_chunk(c, &Flat, &[]);
        assert!(grid.release_chunk(c));
    }
    let stats = grid.stats();
    assert_eq!(stats.ledger_chunks, 200);
    assert_eq!(stats.ledger_flag_words, 0);
    assert_eq!(stats.live_chunks, 0);

    // A chunk that was actually mowed keeps one bit per blade.
    let c = ChunkCoord::new(0, 0);
    grid.materialize_chunk(c, &Flat, &[]);
    assert!(grid.mow(Vec3::new(25.0, 0.0, 25.0), Vec3::FORWARD, 5.0) > 0);
    grid.release_chunk(c);
    assert_eq!(grid.stats().ledger_flag_words, 1500usize.div_ceil(64));

    grid.reset();
    assert_eq!(grid.stats().ledger_flag_words, 0);
}

#[test]
fn inserted_blades_survive_release() {
    let (mut grid, focal) = three_blade_fixture();
    let c = ChunkCoord::new(0, 0);
    assert_eq!(grid.mow(focal, Vec3::FORWARD, 0.6), 1);
    let before = grid.chunk_blades(c).to_vec();
    assert!(grid.release_chunk(c));
    assert_eq!(grid.cut_count(), 1);

    // Scatter density is zero here, so anything live came from the ledger.
    assert_eq!(
        grid.materialize_chunk(c, &Flat, &[]),
        MaterializeOutcome::Restored { blades: 3 }
    );
    assert_eq!(grid.chunk_blades(c), &before[..]);
    assert_eq!(grid.live_blades(), 3);
    assert_eq!(grid.total_count(), 3);
    assert_eq!(grid.cut_count(), 1);
    assert_eq!(grid.mow(focal, Vec3::FORWARD, 0.9), 1);
}

#[test]
fn obstacles_shape_the_lawn() {
    let mut grid = CoverageGrid::new(8, params(500, 10_000));
    let shed = Obstacle {
        x: 10.0,
        z: 10.0,
        radius: 6.0,
        owner: 1,
    };
    grid.materialize_chunk(ChunkCoord::new(0, 0), &Flat, &[shed]);
    assert_eq!(grid.mow(Vec3::new(10.0, 0.0, 10.0), Vec3::FORWARD, 5.9), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Cut count equals the number of distinct blades ever inside a swept circle, and
    // nothing is ever uncut along the way.
    #[test]
    fn coverage_is_conserved_and_monotonic(
        seed in any::<i32>(),
        passes in proptest::collection::vec((0.0f32..100.0, 0.0f32..50.0, 0.0f32..6.0), 1..25),
    ) {
        let mut grid = CoverageGrid::new(seed, params(300, 100_000));
        grid.materialize_chunk(ChunkCoord::new(0, 0), &Flat, &[]);
        grid.materialize_chunk(ChunkCoord::new(1, 0), &Flat, &[]);
        let snapshot: Vec<Vec3> = grid.blades().map(|(_, b)| b.position).collect();
        let mut expected = vec![false; snapshot.len()];
        let mut prev_cut = 0;
        for (x, z, r) in passes {
            let focal = Vec3::new(x, 0.0, z);
            grid.mow(focal, Vec3::FORWARD, r);
            for (i, p) in snapshot.iter().enumerate() {
                if p.planar_distance_sq(focal) < r * r {
                    expected[i] = true;
                }
            }
            prop_assert!(grid.cut_count() >= prev_cut);
            prev_cut = grid.cut_count();
        }
        let want = expected.iter().filter(|e| **e).count() as u64;
        prop_assert_eq!(grid.cut_count(), want);
        let live_cut = grid.blades().filter(|(_, b)| b.is_cut()).count() as u64;
        prop_assert_eq!(live_cut, want);
    }
}
