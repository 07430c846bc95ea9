//! Stateless spatial hashing for per-chunk decisions.
//!
//! Everything here is a pure function of `(seed, cx, cz, salt)`, so a chunk's
//! content can be re-derived at any time without storing it.

use crate::ChunkCoord;

#[inline]
fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

#[inline]
pub fn hash3(seed: u32, cx: i32, cz: i32, salt: u32) -> u32 {
    let mut h = mix(seed.wrapping_add(0x9E37_79B9));
    h = mix(h ^ (cx as u32).wrapping_mul(0x85eb_ca6b));
    h = mix(h ^ (cz as u32).wrapping_mul(0xc2b2_ae35));
    mix(h ^ salt.wrapping_mul(0x27d4_eb2d))
}

/// Uniform value in `[0, 1)`.
#[inline]
pub fn hash01(seed: u32, cx: i32, cz: i32, salt: u32) -> f32 {
    ((hash3(seed, cx, cz, salt) >> 8) as f32) / 16_777_216.0
}

/// Hash bound to one chunk; saves threading `(seed, cx, cz)` through placement code.
#[derive(Clone, Copy, Debug)]
pub struct ChunkHash {
    seed: u32,
    coord: ChunkCoord,
}

impl ChunkHash {
    #[inline]
    pub fn new(seed: i32, coord: ChunkCoord) -> Self {
        Self {
            seed: seed as u32,
            coord,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn bits(&self, salt: u32) -> u32 {
        hash3(self.seed, self.coord.cx, self.coord.cz, salt)
    }

    #[inline]
    pub fn unit(&self, salt: u32) -> f32 {
        hash01(self.seed, self.coord.cx, self.coord.cz, salt)
    }

    #[inline]
    pub fn chance(&self, salt: u32, probability: f32) -> bool {
        self.unit(salt) < probability
    }

    #[inline]
    pub fn range(&self, salt: u32, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit(salt)
    }

    /// Integer in `lo..=hi`.
    #[inline]
    pub fn range_u32(&self, salt: u32, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        lo + (u64::from(self.bits(salt)) % span) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_values_are_in_range_and_stable() {
        let h = ChunkHash::new(42, ChunkCoord::new(-3, 9));
        for salt in 0..1000 {
            let v = h.unit(salt);
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, h.unit(salt));
        }
    }

    #[test]
    fn inputs_all_matter() {
        let base = hash3(7, 1, 2, 3);
        assert_ne!(base, hash3(8, 1, 2, 3));
        assert_ne!(base, hash3(7, 2, 2, 3));
        assert_ne!(base, hash3(7, 1, 3, 3));
        assert_ne!(base, hash3(7, 1, 2, 4));
        assert_ne!(hash3(7, 1, 2, 3), hash3(7, 2, 1, 3));
    }

    #[test]
    fn unit_is_roughly_uniform() {
        let h = ChunkHash::new(9, ChunkCoord::new(0, 0));
        let mut buckets = [0u32; 10];
        for salt in 0..10_000 {
            buckets[(h.unit(salt) * 10.0) as usize] += 1;
        }
        for b in buckets {
            assert!((800..1200).contains(&b), "bucket {b}");
        }
    }

    #[test]
    fn range_u32_is_inclusive() {
        let h = ChunkHash::new(1, ChunkCoord::new(5, 5));
        let mut seen = [false; 4];
        for salt in 0..200 {
            let v = h.range_u32(salt, 3, 6);
            assert!((3..=6).contains(&v));
            seen[(v - 3) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(h.range_u32(0, 4, 4), 4);
    }

    #[test]
    fn range_u32_accepts_the_full_domain() {
        let h = ChunkHash::new(3, ChunkCoord::new(-8, 2));
        for salt in 0..100 {
            assert_eq!(h.range_u32(salt, 0, u32::MAX), h.bits(salt));
            assert!(h.range_u32(salt, 10, u32::MAX) >= 10);
        }
    }
}
