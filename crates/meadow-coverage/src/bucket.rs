use meadow_geom::{Rect, Vec3};
use meadow_world::ChunkCoord;

use crate::ledger::{ChunkLedger, CutBits};
use crate::{Blade, CutState};

/// Live blades of one chunk plus a uniform cell index over them.
///
/// Blades stay in generation order (their ordinal is their index); `cell_items`
/// lists blade indices grouped by cell, `cell_start[c]..cell_start[c + 1]` is
/// the slice for cell `c`.
pub(crate) struct BladeBucket {
    pub(crate) blades: Vec<Blade>,
    /// Blades the chunk owns in total; may exceed `blades.len()` when the cap
    /// kept some from being restored.
    pub(crate) generated: u32,
    /// Ledger bits carried over from the last release. Only ordinals
    /// `blades.len()..generated` are read; live blades hold their own state.
    tail: Option<CutBits>,
    /// Installed by the host rather than scattered.
    explicit: bool,
    bounds: Rect,
    cell_size: f32,
    cells_per_side: usize,
    cell_start: Vec<u32>,
    cell_items: Vec<u32>,
}

impl BladeBucket {
    pub(crate) fn new(
        coord: ChunkCoord,
        chunk_size: f32,
        cell_size: f32,
        blades: Vec<Blade>,
        generated: u32,
        tail: Option<CutBits>,
        explicit: bool,
    ) -> Self {
        let bounds = coord.bounds(chunk_size);
        let cells_per_side = ((chunk_size / cell_size).ceil() as usize).max(1);
        let mut bucket = Self {
            blades,
            generated,
            tail,
            explicit,
            bounds,
            cell_size,
            cells_per_side,
            cell_start: Vec::new(),
            cell_items: Vec::new(),
        };
        bucket.index();
        debug_assert!(bucket.blades.len() <= bucket.generated as usize);
        bucket
    }

    fn cell_of(&self, x: f32, z: f32) -> (usize, usize) {
        let max = self.cells_per_side - 1;
        let cx = ((x - self.bounds.min_x) / self.cell_size).floor().max(0.0) as usize;
        let cz = ((z - self.bounds.min_z) / self.cell_size).floor().max(0.0) as usize;
        (cx.min(max), cz.min(max))
    }

    // Counting sort of blade indices by cell.
    fn index(&mut self) {
        let n = self.cells_per_side;
        let cells: Vec<usize> = self
            .blades
            .iter()
            .map(|b| {
                let (cx, cz) = self.cell_of(b.position.x, b.position.z);
                cz * n + cx
            })
            .collect();
        let mut start = vec![0u32; n * n + 1];
        for c in &cells {
            start[c + 1] += 1;
        }
        for i in 0..n * n {
            start[i + 1] += start[i];
        }
        let mut cursor = start.clone();
        let mut items = vec![0u32; self.blades.len()];
        for (i, c) in cells.iter().enumerate() {
            items[cursor[*c] as usize] = i as u32;
            cursor[*c] += 1;
        }
        self.cell_start = start;
        self.cell_items = items;
    }

    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.blades.len()
    }

    pub(crate) fn cut_count(&self) -> usize {
        let live = self.blades.iter().filter(|b| b.is_cut()).count();
        live + self.tail.as_ref().map_or(0, |t| t.count_from(self.blades.len()))
    }

    /// Cuts every uncut blade inside the circle that `admit` accepts.
    pub(crate) fn mow(
        &mut self,
        focal: Vec3,
        radius: f32,
        mut admit: impl FnMut(Vec3) -> bool,
    ) -> u32 {
        if !self.bounds.intersects_circle(focal.x, focal.z, radius) {
            return 0;
        }
        let r2 = radius * radius;
        let n = self.cells_per_side;
        let (x_lo, z_lo) = self.cell_of(focal.x - radius, focal.z - radius);
        let (x_hi, z_hi) = self.cell_of(focal.x + radius, focal.z + radius);
        let mut cut = 0;
        for cz in z_lo..=z_hi {
            for cx in x_lo..=x_hi {
                let cell = cz * n + cx;
                let lo = self.cell_start[cell] as usize;
                let hi = self.cell_start[cell + 1] as usize;
                for &i in &self.cell_items[lo..hi] {
                    let blade = &mut self.blades[i as usize];
                    if blade.is_cut() {
                        continue;
                    }
                    // Boundary is exclusive: a blade exactly `radius` away stays standing.
                    if blade.position.planar_distance_sq(focal) < r2 && admit(blade.position) {
                        blade.state = CutState::Cut;
                        cut += 1;
                    }
                }
            }
        }
        cut
    }

    pub(crate) fn reset(&mut self) {
        for b in &mut self.blades {
            b.state = CutState::Uncut;
        }
        self.tail = None;
    }

    /// Cut state of ordinal `i`, live or not.
    pub(crate) fn is_cut(&self, i: usize) -> bool {
        match self.blades.get(i) {
            Some(b) => b.is_cut(),
            None => self.tail.as_ref().is_some_and(|t| t.get(i)),
        }
    }

    /// Shrinks the chunk to what must survive eviction.
    pub(crate) fn into_ledger(self) -> ChunkLedger {
        if self.explicit {
            return ChunkLedger::Explicit {
                blades: self.blades,
            };
        }
        let cut = CutBits::from_flags(self.generated as usize, |i| self.is_cut(i));
        ChunkLedger::Scattered {
            generated: self.generated,
            cut,
        }
    }
}
