// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled with zero external RNG dependencies so that output is identical
// across platforms, compiler versions and reimplementations in other
// languages.
//
// This crate is the single source of pseudo-randomness for Spellwright: the
// glyph, ritual and verse generators in `spellwright_core` each own a
// `SpellRng` seeded from their own sub-seed. The draw order of every
// generator is part of the determinism contract, so the helpers here never
// consume a variable number of values except where documented (rejection
// sampling in `range_u64`).
//
// **Critical constraint: determinism.** Every method must produce identical
// output given the same prior state. No floating point anywhere in this
// module, no stdlib hashing, no OS entropy.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG. The sole source of pseudo-randomness in Spellwright.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRng {
    s: [u64; 4],
}

impl SpellRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    /// Two `SpellRng` instances created with the same seed will produce
    /// identical output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Generate a uniform random `usize` in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Generate a uniform random `usize` in `[low, high]` (inclusive on both ends).
    ///
    /// Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "range_usize_inclusive: low must be <= high");
        self.range_u64(low as u64, high as u64 + 1) as usize
    }

    /// Pick a uniformly random index into a non-empty collection of `len`
    /// items. One draw.
    ///
    /// Panics if `len == 0`.
    pub fn index(&mut self, len: usize) -> usize {
        self.range_usize(0, len)
    }

    /// Sample `count` distinct indices from `0..len` without replacement.
    ///
    /// Partial Fisher–Yates: for output position `i` the draw is
    /// `range_usize(i, len)` and the chosen element is swapped into place.
    /// Exactly `count` draws are made. The returned order is the sampling
    /// order.
    ///
    /// Panics if `count > len`.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        assert!(
            count <= len,
            "sample_indices: cannot take {count} distinct items from {len}"
        );
        let mut pool: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = self.range_usize(i, len);
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool
    }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
