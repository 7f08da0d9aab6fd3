//! Rewindable session RNG
//!
//! Uses xorshift64 so the whole generator state is a single integer seed.
//! Capturing that seed alongside the rest of the session is what lets a
//! rewind also rewind luck.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Largest integer an `f64` holds exactly; seeds stay below it so they
/// survive the text codec unchanged.
const SEED_MASK: u64 = (1 << 53) - 1;

/// A deterministic random number generator whose state is its seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRng {
    seed: u64,
}

impl SessionRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed: normalize(seed),
        }
    }

    /// Create an RNG seeded from the wall clock
    ///
    /// Used once per new session, or after a load that carried no seed.
    pub fn fresh() -> Self {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| chrono::Utc::now().timestamp_micros());
        Self::new(nanos as u64)
    }

    /// Current seed (the full generator state)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Overwrite the generator state
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = normalize(seed);
    }

    /// Generate the next raw value, advancing the seed
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.seed;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.seed = normalize(x);
        x
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a random i64 in range [min, max]
    ///
    /// Returns `min` when `max <= min`.
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        // the span of the full i64 range wraps to zero
        let span = (max.wrapping_sub(min) as u64).wrapping_add(1);
        if span == 0 {
            return self.next_u64() as i64;
        }
        min.wrapping_add((self.next_u64() % span) as i64)
    }

    /// Generate a random bool with given probability of true
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Capture the seed as a structured value
    pub fn to_value(&self) -> Value {
        Value::Number(self.seed as f64)
    }

    /// Rebuild from a captured seed
    ///
    /// Returns `None` when the value is not a whole non-negative number,
    /// e.g. when a save predates seed capture.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value.as_i64() {
            Some(seed) if seed >= 0 => Some(Self::new(seed as u64)),
            _ => None,
        }
    }

    /// Rebuild from a captured seed, minting a fresh one if it is missing
    pub fn from_value_or_fresh(value: &Value) -> Self {
        Self::from_value(value).unwrap_or_else(Self::fresh)
    }
}

fn normalize(seed: u64) -> u64 {
    // xorshift requires a non-zero state
    match seed & SEED_MASK {
        0 => 1,
        s => s,
    }
}

impl Default for SessionRng {
    fn default() -> Self {
        Self::new(12345)
    }
}
