use std::sync::Arc;

use hashbrown::HashMap;
use meadow_geom::Vec3;
use meadow_world::{ChunkCoord, HeightSource, MowPolicy, Obstacle, WorldGenParams};

use crate::bucket::BladeBucket;
use crate::ledger::{ChunkLedger, CutBits};
use crate::{Blade, CutState, scatter_blades};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterializeOutcome {
    AlreadyLive,
    /// First visit; `blades` new blades joined the totals.
    Generated { blades: usize },
    /// Revisit; blades rebuilt from the ledger with their cut state.
    Restored { blades: usize },
    /// The population cap stopped the batch short (possibly at zero).
    CapReached { blades: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoverageStats {
    pub live_blades: usize,
    pub total_blades: u64,
    pub cut_blades: u64,
    pub live_chunks: usize,
    pub ledger_chunks: usize,
    /// 64-bit words of packed cut flags held for evicted chunks.
    pub ledger_flag_words: usize,
}

pub struct CoverageGrid {
    params: Arc<WorldGenParams>,
    seed: i32,
    policy: MowPolicy,
    population_cap: usize,
    live: HashMap<ChunkCoord, BladeBucket>,
    ledgers: HashMap<ChunkCoord, ChunkLedger>,
    live_blades: usize,
    total_blades: u64,
    cut_blades: u64,
}

impl CoverageGrid {
    pub fn new(seed: i32, params: Arc<WorldGenParams>) -> Self {
        let policy = params.mow_policy;
        let population_cap = params.population_cap;
        Self {
            params,
            seed,
            policy,
            population_cap,
            live: HashMap::new(),
            ledgers: HashMap::new(),
            live_blades: 0,
            total_blades: 0,
            cut_blades: 0,
        }
    }

    #[inline]
    pub fn policy(&self) -> MowPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MowPolicy) {
        self.policy = policy;
    }

    pub fn set_population_cap(&mut self, cap: usize) {
        self.population_cap = cap;
    }

    #[inline]
    pub fn is_live(&self, coord: ChunkCoord) -> bool {
        self.live.contains_key(&coord)
    }

    /// Scatters (or restores) the blades of `coord`.
    ///
    /// `obstacles` are the footprints placed in this chunk; `heights` must be
    /// exact for points inside it.
    pub fn materialize_chunk(
        &mut self,
        coord: ChunkCoord,
        heights: &impl HeightSource,
        obstacles: &[Obstacle],
    ) -> MaterializeOutcome {
        if self.live.contains_key(&coord) {
            return MaterializeOutcome::AlreadyLive;
        }
        let room = self.population_cap.saturating_sub(self.live_blades);
        let room = u32::try_from(room).unwrap_or(u32::MAX);

        match self.ledgers.remove(&coord) {
            Some(ChunkLedger::Scattered { generated, cut }) => {
                let mut blades = scatter_blades(
                    &self.params,
                    self.seed,
                    coord,
                    heights,
                    obstacles,
                    generated.min(room),
                );
                if let Some(bits) = &cut {
                    for (i, blade) in blades.iter_mut().enumerate() {
                        if bits.get(i) {
                            blade.state = CutState::Cut;
                        }
                    }
                }
                let restored = blades.len();
                self.install(coord, blades, generated, cut, false);
                if (restored as u32) < generated {
                    log::warn!(
                        "blade cap {} reached restoring ({}, {}): {}/{} live",
                        self.population_cap,
                        coord.cx,
                        coord.cz,
                        restored,
                        generated
                    );
                    return MaterializeOutcome::CapReached { blades: restored };
                }
                return MaterializeOutcome::Restored { blades: restored };
            }
            // Host-supplied sets come back whole; like insertion they ignore the cap.
            Some(ChunkLedger::Explicit { blades }) => {
                let n = blades.len();
                self.install(coord, blades, n as u32, None, true);
                return MaterializeOutcome::Restored { blades: n };
            }
            None => {}
        }

        if room == 0 {
            log::warn!(
                "blade cap {} reached; ({}, {}) left bare",
                self.population_cap,
                coord.cx,
                coord.cz
            );
            return MaterializeOutcome::CapReached { blades: 0 };
        }
        let capped = room < self.params.blades_per_chunk;
        let blades = scatter_blades(&self.params, self.seed, coord, heights, obstacles, room);
        let n = blades.len();
        self.total_blades += n as u64;
        self.install(coord, blades, n as u32, None, false);
        if capped {
            log::warn!(
                "blade cap {} reached in ({}, {}): {} blade(s)",
                self.population_cap,
                coord.cx,
                coord.cz,
                n
            );
            MaterializeOutcome::CapReached { blades: n }
        } else {
            log::debug!("grass ({}, {}): {} blade(s)", coord.cx, coord.cz, n);
            MaterializeOutcome::Generated { blades: n }
        }
    }

    /// Installs an explicit blade set for `coord` as a first visit. The set
    /// bypasses the population cap and survives release unchanged.
    /// Returns false if the chunk is already live or ledgered.
    pub fn insert_chunk_blades(&mut self, coord: ChunkCoord, blades: Vec<Blade>) -> bool {
        if self.live.contains_key(&coord) || self.ledgers.contains_key(&coord) {
            return false;
        }
        let n = blades.len();
        self.total_blades += n as u64;
        self.cut_blades += blades.iter().filter(|b| b.is_cut()).count() as u64;
        self.install(coord, blades, n as u32, None, true);
        true
    }

    fn install(
        &mut self,
        coord: ChunkCoord,
        blades: Vec<Blade>,
        generated: u32,
        tail: Option<CutBits>,
        explicit: bool,
    ) {
        self.live_blades += blades.len();
        let bucket = BladeBucket::new(
            coord,
            self.params.chunk_size,
            self.params.blade_cell_size,
            blades,
            generated,
            tail,
            explicit,
        );
        self.live.insert(coord, bucket);
    }

    /// Drops the live blades of `coord`. Scattered chunks keep only their
    /// blade count and packed cut bits (nothing when uncut); explicit sets are kept whole.
    pub fn release_chunk(&mut self, coord: ChunkCoord) -> bool {
        let Some(bucket) = self.live.remove(&coord) else {
            return false;
        };
        self.live_blades -= bucket.live();
        self.ledgers.insert(coord, bucket.into_ledger());
        true
    }

    /// Cuts blades strictly within `radius` of `focal` (planar) that the policy
    /// admits. Returns how many were newly cut.
    pub fn mow(&mut self, focal: Vec3, heading: Vec3, radius: f32) -> u32 {
        if radius.is_nan() || radius <= 0.0 || self.live_blades == 0 {
            return 0;
        }
        let size = self.params.chunk_size;
        let lo = ChunkCoord::from_world(focal.x - radius, focal.z - radius, size);
        let hi = ChunkCoord::from_world(focal.x + radius, focal.z + radius, size);
        let policy = self.policy;
        let forward = heading.planar().normalized();
        let mut cut = 0;
        for cz in lo.cz..=hi.cz {
            for cx in lo.cx..=hi.cx {
                if let Some(bucket) = self.live.get_mut(&ChunkCoord::new(cx, cz)) {
                    cut += bucket.mow(focal, radius, |p| admits(policy, focal, forward, p));
                }
            }
        }
        self.cut_blades += u64::from(cut);
        cut
    }

    /// Cut count over total blades ever generated, as a percentage.
    pub fn coverage_percent(&self) -> f32 {
        if self.total_blades == 0 {
            return 0.0;
        }
        (self.cut_blades as f64 / self.total_blades as f64 * 100.0) as f32
    }

    #[inline]
    pub fn cut_count(&self) -> u64 {
        self.cut_blades
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_blades
    }

    #[inline]
    pub fn live_blades(&self) -> usize {
        self.live_blades
    }

    pub fn area_mowed(&self) -> f32 {
        self.cut_blades as f32 * self.params.area_per_blade()
    }

    /// Every blade back to uncut, live or ledgered. Positions are untouched.
    pub fn reset(&mut self) {
        for bucket in self.live.values_mut() {
            bucket.reset();
        }
        for ledger in self.ledgers.values_mut() {
            ledger.reset();
        }
        self.cut_blades = 0;
    }

    pub fn blades(&self) -> impl Iterator<Item = (ChunkCoord, &Blade)> {
        self.live
            .iter()
            .flat_map(|(c, b)| b.blades.iter().map(move |blade| (*c, blade)))
    }

    pub fn chunk_blades(&self, coord: ChunkCoord) -> &[Blade] {
        self.live
            .get(&coord)
            .map(|b| b.blades.as_slice())
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> CoverageStats {
        debug_assert_eq!(
            self.cut_blades as usize,
            self.live.values().map(BladeBucket::cut_count).sum::<usize>()
                + self.ledgers.values().map(ChunkLedger::cut_count).sum::<usize>()
        );
        debug_assert!(self.live.values().all(|b| b.generated as usize >= b.live()));
        CoverageStats {
            live_blades: self.live_blades,
            total_blades: self.total_blades,
            cut_blades: self.cut_blades,
            live_chunks: self.live.len(),
            ledger_chunks: self.ledgers.len(),
            ledger_flag_words: self.ledgers.values().map(ChunkLedger::flag_words).sum(),
        }
    }
}

fn admits(policy: MowPolicy, focal: Vec3, forward: Vec3, p: Vec3) -> bool {
    match policy {
        MowPolicy::Omnidirectional => true,
        MowPolicy::ForwardArc { half_angle } => {
            if half_angle >= std::f32::consts::PI || forward == Vec3::ZERO {
                return true;
            }
            let d = (p - focal).planar();
            let len = d.length();
            if len == 0.0 {
                return true;
            }
            d.dot(forward) / len >= half_angle.cos()
        }
    }
}
