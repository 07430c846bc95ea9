use meadow_geom::Rect;
use serde::{Deserialize, Serialize};

/// Largest chunk index `from_world` yields on either axis. Keeps neighbour
/// arithmetic and 24-bit packed chunk ids clear of overflow.
pub const MAX_CHUNK_INDEX: i32 = (1 << 23) - 128;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk containing world position `(x, z)`; `floor` semantics on both axes.
    /// Positions beyond `MAX_CHUNK_INDEX` chunks pin to the edge; NaN maps to 0.
    #[inline]
    pub fn from_world(x: f32, z: f32, chunk_size: f32) -> Self {
        let index = |v: f32| {
            ((v / chunk_size).floor() as i32).clamp(-MAX_CHUNK_INDEX, MAX_CHUNK_INDEX)
        };
        Self {
            cx: index(x),
            cz: index(z),
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx.saturating_add(dx),
            cz: self.cz.saturating_add(dz),
        }
    }

    /// Square ("king move") distance used by the streaming radius.
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        let d = self.cx.abs_diff(other.cx).max(self.cz.abs_diff(other.cz));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    #[inline]
    pub fn origin(self, chunk_size: f32) -> (f32, f32) {
        (self.cx as f32 * chunk_size, self.cz as f32 * chunk_size)
    }

    #[inline]
    pub fn bounds(self, chunk_size: f32) -> Rect {
        let (x0, z0) = self.origin(chunk_size);
        Rect::new(x0, z0, x0 + chunk_size, z0 + chunk_size)
    }

    /// This chunk and its 8 neighbours, row-major from `(-1, -1)`.
    pub fn neighborhood(self) -> [ChunkCoord; 9] {
        let mut out = [self; 9];
        let mut i = 0;
        for dz in -1..=1 {
            for dx in -1..=1 {
                out[i] = self.offset(dx, dz);
                i += 1;
            }
        }
        out
    }

    /// All coordinates within Chebyshev distance `radius` (inclusive), nearest rings first.
    pub fn square_around(self, radius: i32) -> Vec<ChunkCoord> {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;
        let mut out = Vec::with_capacity(side * side);
        out.push(self);
        for ring in 1..=radius {
            for dz in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dz.abs()) == ring {
                        out.push(self.offset(dx, dz));
                    }
                }
            }
        }
        out
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}
