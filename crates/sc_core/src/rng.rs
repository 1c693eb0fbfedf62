// crates/sc_core/src/rng.rs
//
// Seeded RNG for every random draw in the engine (no OS entropy).
//
// • The only source of randomness is an explicit 64-bit seed supplied by the
//   caller; identical seeds give identical electorates on every platform.
// • ChaCha20 stream, seeded from `seed.to_le_bytes()` in the first 8 bytes of
//   the 32-byte key; the remaining 24 bytes are zero.
// • Every 32- or 64-bit word drawn is counted, so a run can report how much of
//   the stream it consumed.
// • `SimRng` implements `rand_core::RngCore`, so `rand` and `statrs`
//   distributions sample from it directly.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Deterministic RNG for simulation draws.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

impl SimRng {
    /// Construct from a 64-bit seed.
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            words_consumed: 0,
        }
    }

    /// Total number of words drawn so far (saturating). A draw counter, not a
    /// byte counter; `fill_bytes` counts one word per 8 bytes requested.
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    #[inline]
    fn bump(&mut self, words: u128) {
        self.words_consumed = self.words_consumed.saturating_add(words);
    }

    /// Unbiased integer in [0, n) using the threshold rejection trick.
    /// Returns `None` if `n == 0`.
    #[inline]
    pub fn gen_index(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n; // == (2^64 % n)
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Uniform `f64` in [0, 1) built from the top 53 bits of one word.
    #[inline]
    pub fn unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Deterministic in-place Fisher–Yates shuffle.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        if len <= 1 {
            return;
        }
        for i in (1..len).rev() {
            if let Some(j) = self.gen_index(i as u64 + 1) {
                slice.swap(i, j as usize);
            }
        }
    }
}

impl RngCore for SimRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.bump(1);
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.bump(1);
        self.rng.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bump(dest.len().div_ceil(8) as u128);
        self.rng.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_seed_u64(0)
    }
}
