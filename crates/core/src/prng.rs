//! Seedable Xorshift64 random source for particle generation.
//!
//! Every draw the Initializer makes (positions, velocities, radii, opacities)
//! goes through [`Xorshift64`], so a fixed seed reproduces a generation
//! exactly. Hosts that want variety pick the seed from their own entropy
//! (the browser binding uses `Math.random`).

use serde::{Deserialize, Serialize};

/// Xorshift64 (shifts 13, 7, 17). Same seed, same sequence, on every platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replaces a zero seed, which is a fixed point of xorshift.
    const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a generator from `seed`. Zero is replaced by a fixed nonzero seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in `[0, 1)` from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[min, max)`. Returns `min` when the range is empty.
    ///
    /// Redraws on the rare rounding case where `min + f * span` lands on `max`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        loop {
            let v = min + self.next_f64() * (max - min);
            if v < max {
                return v;
            }
        }
    }

    /// Uniform in the closed interval `[-half_width, half_width]`.
    ///
    /// Uses 53-bit inclusive scaling so both endpoints are reachable.
    pub fn symmetric(&mut self, half_width: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / ((1u64 << 53) - 1) as f64;
        (unit * 2.0 - 1.0) * half_width
    }
}
