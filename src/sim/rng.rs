//! Seeded random source
//!
//! Every draw in the simulation goes through a `Prng` that was handed an
//! explicit seed. Gameplay owns one stream; chunk generation builds a fresh
//! stream per call from the chunk coordinate, so generated content never
//! depends on how many gameplay draws happened before it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::chunk::ChunkCoord;

/// Large odd multiplier separating neighbouring chunk seeds
pub const CHUNK_SEED_MULTIPLIER: i64 = 1_000_003;

/// Deterministic PRNG (PCG32, a permuted linear congruential generator)
#[derive(Debug, Clone)]
pub struct Prng {
    inner: Pcg32,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Stream local to a single chunk generation call
    pub fn for_chunk(world_seed: u64, coord: ChunkCoord) -> Self {
        Self::new(chunk_seed(world_seed, coord))
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform in [lo, hi); returns `lo` for an empty range
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform in [lo, hi] inclusive
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..=hi)
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "index into empty collection");
        self.inner.random_range(0..len)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Weighted pick from `(item, weight)` entries.
    ///
    /// Panics on an empty table or all-zero weights; those are table bugs.
    pub fn weighted<'a, T>(&mut self, table: &'a [(T, u32)]) -> &'a T {
        let total: u32 = table.iter().map(|(_, w)| *w).sum();
        assert!(total > 0, "weighted table has no weight");
        let mut roll = self.inner.random_range(0..total);
        for (item, weight) in table {
            if roll < *weight {
                return item;
            }
            roll -= weight;
        }
        unreachable!("roll below total weight always lands in the table")
    }
}

/// Per-chunk seed: `cx * K + cy + world_seed`, wrapping
pub fn chunk_seed(world_seed: u64, coord: ChunkCoord) -> u64 {
    (coord.x as i64)
        .wrapping_mul(CHUNK_SEED_MULTIPLIER)
        .wrapping_add(coord.y as i64)
        .wrapping_add(world_seed as i64) as u64
}
