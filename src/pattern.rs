//! Pattern type for Reverie.
//!
//! A pattern is a fixed-length bit vector (values 0/1), the canonical
//! encoding of one training example. The recall dynamics operate on spins
//! in {-1, +1}; bit `1` maps to spin `+1` and bit `0` to spin `-1`
//! everywhere the two domains interconvert.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An immutable bit vector of fixed length.
///
/// Internally stored as `u8` for memory efficiency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Pattern {
    /// The actual bit data (each element is 0 or 1)
    bits: Vec<u8>,
}

impl Pattern {
    /// Create a pattern from raw bits.
    pub fn from_bits(bits: Vec<u8>) -> Self {
        debug_assert!(bits.iter().all(|&b| b <= 1), "bits must be 0 or 1");
        Self { bits }
    }

    /// Create a pattern from a spin vector, mapping +1 → 1 and -1 → 0.
    pub fn from_spins(spins: &[i8]) -> Self {
        let bits = spins.iter().map(|&s| if s > 0 { 1 } else { 0 }).collect();
        Self { bits }
    }

    /// Project the pattern into the spin domain: 1 → +1, 0 → -1.
    pub fn to_spins(&self) -> Vec<i8> {
        self.bits.iter().map(|&b| if b > 0 { 1 } else { -1 }).collect()
    }

    /// Get the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Get the raw bits as a slice.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Number of set bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b > 0).count()
    }

    /// Normalized Hamming distance to another pattern, in [0, 1].
    ///
    /// 0 means identical, 1 means complementary.
    pub fn distance(&self, other: &Pattern) -> f64 {
        assert_eq!(
            self.len(),
            other.len(),
            "length mismatch in hamming distance"
        );

        let differing = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(&a, &b)| a != b)
            .count();

        differing as f64 / self.len() as f64
    }
}

impl Index<usize> for Pattern {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bits[index]
    }
}
