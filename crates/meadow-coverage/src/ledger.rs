use crate::{Blade, CutState};

/// Cut flags packed one bit per blade ordinal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CutBits {
    words: Vec<u64>,
}

impl CutBits {
    /// Packs `flag(0..len)`. `None` when no flag is set, so untouched chunks cost nothing.
    pub(crate) fn from_flags(len: usize, mut flag: impl FnMut(usize) -> bool) -> Option<Self> {
        let mut words: Vec<u64> = Vec::new();
        for i in 0..len {
            if flag(i) {
                if words.is_empty() {
                    words = vec![0; len.div_ceil(64)];
                }
                words[i / 64] |= 1 << (i % 64);
            }
        }
        (!words.is_empty()).then_some(Self { words })
    }

    #[inline]
    pub(crate) fn get(&self, i: usize) -> bool {
        self.words
            .get(i / 64)
            .is_some_and(|w| (w >> (i % 64)) & 1 == 1)
    }

    /// Set bits at ordinals `start..`.
    pub(crate) fn count_from(&self, start: usize) -> usize {
        let first = start / 64;
        let Some(head) = self.words.get(first) else {
            return 0;
        };
        let head = (head & (u64::MAX << (start % 64))).count_ones() as usize;
        head + self.words[first + 1..]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum::<usize>()
    }

    #[inline]
    pub(crate) fn words(&self) -> usize {
        self.words.len()
    }
}

/// What a chunk leaves behind when its blades stop being live.
pub(crate) enum ChunkLedger {
    /// Hash-scattered blades: regeneration is deterministic, so ordinal `i`
    /// always names the same blade and only the count and cut bits are kept.
    Scattered { generated: u32, cut: Option<CutBits> },
    /// Blades handed in by the host. They cannot be regenerated, so they are kept whole.
    Explicit { blades: Vec<Blade> },
}

impl ChunkLedger {
    pub(crate) fn cut_count(&self) -> usize {
        match self {
            ChunkLedger::Scattered { cut, .. } => cut.as_ref().map_or(0, |c| c.count_from(0)),
            ChunkLedger::Explicit { blades } => blades.iter().filter(|b| b.is_cut()).count(),
        }
    }

    pub(crate) fn flag_words(&self) -> usize {
        match self {
            ChunkLedger::Scattered { cut, .. } => cut.as_ref().map_or(0, CutBits::words),
            ChunkLedger::Explicit { .. } => 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            ChunkLedger::Scattered { cut, .. } => *cut = None,
            ChunkLedger::Explicit { blades } => {
                blades.iter_mut().for_each(|b| b.state = CutState::Uncut);
            }
        }
    }
}
