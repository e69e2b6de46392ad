#![warn(missing_docs)]

//! Identifiers on the Chord ring.
//!
//! Nodes and keys share one identifier space, the cyclic group of integers
//! modulo `2^m`. Ordering between two ids only makes sense relative to a
//! reference point, so every placement and routing decision goes through the
//! circular interval predicates [between] and [between_exclusive].

use serde::Deserialize;
use serde::Serialize;

/// Identifier of a node or of a key, an integer in `[0, 2^m)`.
pub type Did = u64;

/// The identifier space `Z / 2^m`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdSpace {
    bits: u32,
}

impl IdSpace {
    /// Identifier space of `bits` bits. `bits` is validated by the config.
    pub fn new(bits: u32) -> Self {
        Self { bits }
    }

    /// Bit width `m`, which is also the finger table length.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// `2^m`.
    pub fn modulus(&self) -> u64 {
        1u64 << self.bits
    }

    /// Test `did` is a member of the space.
    pub fn contains(&self, did: Did) -> bool {
        did < self.modulus()
    }

    /// `(a + b) mod 2^m`.
    pub fn add(&self, a: Did, b: Did) -> Did {
        (a % self.modulus() + b % self.modulus()) % self.modulus()
    }

    /// Start of the k-th finger interval of `did`, `(did + 2^k) mod 2^m`.
    pub fn finger_start(&self, did: Did, k: usize) -> Did {
        self.add(did, 1u64 << k)
    }
}

/// Test `x <- (a, b]` on the ring.
/// When `a == b` the arc covers the whole circle and the test always holds.
pub fn between(a: Did, b: Did, x: Did) -> bool {
    if a == b {
        return true;
    }
    if a < b {
        x > a && x <= b
    } else {
        // the arc wraps over zero
        x > a || x <= b
    }
}

/// Test `x <- (a, b)` on the ring.
/// When `a == b` the arc covers the whole circle and the test always holds.
pub fn between_exclusive(a: Did, b: Did, x: Did) -> bool {
    if a == b {
        return true;
    }
    if a < b {
        x > a && x < b
    } else {
        x > a || x < b
    }
}
