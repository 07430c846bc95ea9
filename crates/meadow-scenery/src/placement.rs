//! Pure per-chunk scenery layout.
//!
//! The hash calls below run in a fixed order with fixed salts. Reordering them
//! or changing a salt changes every world generated from an existing seed.

use std::f32::consts::{FRAC_PI_2, TAU};

use meadow_geom::{Rect, Vec3};
use meadow_world::{ChunkCoord, ChunkHash, HeightSource, MAX_REPEATED_OBJECTS, WorldGenParams};

use crate::{ObjectId, SceneryKind, SceneryObject};

const SALT_STRUCTURE: u32 = 0x5C_0000;
const SALT_PADDOCK: u32 = 0x5C_1000;
const SALT_TREE: u32 = 0x5C_2000;
const SALT_FENCE: u32 = 0x5C_3000;
const SALT_OUTBUILDING: u32 = 0x5C_4000;
const SALT_MAILBOX: u32 = 0x5C_5000;
const SALT_BENCH: u32 = 0x5C_6000;

// Gap left between a structure and its paddock or mailbox.
const STRUCTURE_CLEARANCE: f32 = 1.0;

struct Planner<'a, H: HeightSource> {
    params: &'a WorldGenParams,
    heights: &'a H,
    coord: ChunkCoord,
    bounds: Rect,
    inner: Rect,
    placed: Vec<SceneryObject>,
}

impl<H: HeightSource> Planner<'_, H> {
    fn overlaps_placed(&self, x: f32, z: f32, r: f32) -> bool {
        self.placed.iter().any(|o| {
            let dx = o.position.x - x;
            let dz = o.position.z - z;
            let rr = o.kind.footprint() + r;
            dx * dx + dz * dz < rr * rr
        })
    }

    /// Accepts the candidate if it is inside the chunk, on walkable ground
    /// and clear of earlier footprints. Returns the index of the new object.
    fn place(&mut self, kind: SceneryKind, x: f32, z: f32, yaw: f32) -> Option<usize> {
        let r = kind.footprint();
        if !self.bounds.contains_circle(x, z, r) {
            return None;
        }
        let y = self.heights.height_at(x, z);
        if !self.params.is_walkable(y) {
            return None;
        }
        if self.overlaps_placed(x, z, r) {
            return None;
        }
        let ordinal = u16::try_from(self.placed.len()).ok()?;
        self.placed.push(SceneryObject {
            id: ObjectId::new(self.coord, ordinal),
            kind,
            position: Vec3::new(x, y, z),
            yaw,
            discovered: false,
        });
        Some(self.placed.len() - 1)
    }

    fn point_in_inner(&self, h: &ChunkHash, salt: u32) -> (f32, f32) {
        (
            h.range(salt, self.inner.min_x, self.inner.max_x),
            h.range(salt + 1, self.inner.min_z, self.inner.max_z),
        )
    }
}

/// Lays out the scenery of one chunk. Same inputs, same objects, same order.
pub fn plan_chunk(
    params: &WorldGenParams,
    seed: i32,
    coord: ChunkCoord,
    heights: &impl HeightSource,
) -> Vec<SceneryObject> {
    let h = ChunkHash::new(seed, coord);
    let bounds = coord.bounds(params.chunk_size);
    let margin = params.edge_margin.min(params.chunk_size * 0.5);
    let inner = Rect::new(
        bounds.min_x + margin,
        bounds.min_z + margin,
        bounds.max_x - margin,
        bounds.max_z - margin,
    );
    let mut p = Planner {
        params,
        heights,
        coord,
        bounds,
        inner,
        placed: Vec::new(),
    };

    // (a) structure, then a paddock on its local +x side and a mailbox out front.
    let mut structure = None;
    if h.chance(SALT_STRUCTURE, params.structure_probability) {
        let (x, z) = p.point_in_inner(&h, SALT_STRUCTURE + 1);
        let yaw = h.range_u32(SALT_STRUCTURE + 3, 0, 3) as f32 * FRAC_PI_2;
        structure = p.place(SceneryKind::Structure, x, z, yaw).map(|i| p.placed[i]);
    }
    if let Some(s) = structure {
        if h.chance(SALT_PADDOCK, params.enclosure_probability) {
            let side = Vec3::from_yaw(s.yaw + FRAC_PI_2);
            let d = SceneryKind::Structure.footprint()
                + SceneryKind::Enclosure.footprint()
                + STRUCTURE_CLEARANCE;
            let at = s.position + side * d;
            p.place(SceneryKind::Enclosure, at.x, at.z, s.yaw);
        }
    }

    // (b) trees
    let trees = h
        .range_u32(SALT_TREE, 0, params.tree_max)
        .min(MAX_REPEATED_OBJECTS);
    for i in 0..trees {
        let salt = SALT_TREE + 1 + i * 4;
        let (x, z) = p.point_in_inner(&h, salt);
        let yaw = h.range(salt + 2, 0.0, TAU);
        p.place(SceneryKind::Tree, x, z, yaw);
    }

    // (c) a straight fence run that stops at the first rejected segment
    if h.chance(SALT_FENCE, params.fence_probability) {
        let (sx, sz) = p.point_in_inner(&h, SALT_FENCE + 1);
        let yaw = h.range(SALT_FENCE + 3, 0.0, TAU);
        let dir = Vec3::from_yaw(yaw);
        let count = h
            .range_u32(
                SALT_FENCE + 4,
                params.fence_segments_min,
                params.fence_segments_max,
            )
            .min(MAX_REPEATED_OBJECTS);
        for k in 0..count {
            let step = dir * (k as f32 * params.fence_segment_length);
            if p
                .place(SceneryKind::EnclosureSegment, sx + step.x, sz + step.z, yaw)
                .is_none()
            {
                break;
            }
        }
    }

    if h.chance(SALT_OUTBUILDING, params.outbuilding_probability) {
        let (x, z) = p.point_in_inner(&h, SALT_OUTBUILDING + 1);
        let yaw = h.range_u32(SALT_OUTBUILDING + 3, 0, 3) as f32 * FRAC_PI_2;
        p.place(SceneryKind::OutbuildingSmall, x, z, yaw);
    }

    if h.chance(SALT_MAILBOX, params.mailbox_probability) {
        let (x, z) = match structure {
            Some(s) => {
                let front = Vec3::from_yaw(s.yaw);
                let d = SceneryKind::Structure.footprint()
                    + SceneryKind::Mailbox.footprint()
                    + STRUCTURE_CLEARANCE;
                let at = s.position + front * d;
                (at.x, at.z)
            }
            None => p.point_in_inner(&h, SALT_MAILBOX + 1),
        };
        p.place(SceneryKind::Mailbox, x, z, h.range(SALT_MAILBOX + 3, 0.0, TAU));
    }

    if h.chance(SALT_BENCH, params.bench_probability) {
        let (x, z) = p.point_in_inner(&h, SALT_BENCH + 1);
        p.place(SceneryKind::Bench, x, z, h.range(SALT_BENCH + 3, 0.0, TAU));
    }

    p.placed
}
