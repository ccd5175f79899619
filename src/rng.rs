//! Small non-cryptographic PRNG (SplitMix64).
//!
//! Used for the idle-timer jitter, the sleep-or-fidget coin flip and the
//! degraded CPU fallback.  Seeded explicitly so every consumer is
//! reproducible under test.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub const fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the process's hash-map randomness.
    pub fn from_entropy() -> Self {
        let seed = RandomState::new().build_hasher().finish();
        Self::from_seed(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        // 53 high bits -> exact f64 mantissa
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `min..=max`.  Returns `min` if the range is inverted.
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (self.next_u64() % span) as u32
    }

    pub fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}
