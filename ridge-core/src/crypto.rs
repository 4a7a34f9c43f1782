//! Hashing primitives for ridge.
//!
//! All tree hashing is domain separated: leaf hashes are computed over a
//! `0x00`-prefixed message and internal node hashes over a `0x01`-prefixed
//! message. The prefixes prevent an internal node from being presented as a
//! leaf (or vice versa) in a second-preimage attack, and must never be
//! transposed.
//!
//! The default hash family is BLAKE2b-256 via [`Blake2b256`]; the
//! [`TreeHasher`] trait lets tests (or embedders with their own wire format)
//! swap the underlying hash while keeping the 32-byte width and the domain
//! tags fixed.

use std::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as _};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Domain tag for leaf hashes.
const LEAF_PREFIX: [u8; 1] = [0x00];
/// Domain tag for internal node hashes.
const NODE_PREFIX: [u8; 1] = [0x01];

/// A 32-byte digest.
///
/// The all-zero digest is reserved as the root of an empty tree; it is not
/// the hash of any input.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// The zero digest (root of an empty tree).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a digest from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(Error::InvalidDigest(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check if this is the zero digest.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Hash family used for leaf and node sums.
///
/// Implementations fix a 256-bit hash; the domain tags and the combining
/// rule are supplied by the trait contract and are identical for every
/// hasher. Swapping the hasher changes the wire format.
pub trait TreeHasher {
    /// Hash a raw segment into a leaf digest: `H(0x00 || segment)`.
    fn leaf_sum(segment: &[u8]) -> Digest;

    /// Combine two child digests into a parent: `H(0x01 || left || right)`.
    fn node_sum(left: Digest, right: Digest) -> Digest;
}

/// The default hasher: BLAKE2b with a 256-bit output.
///
/// This hasher defines the reference wire format; proofs and roots produced
/// with any other [`TreeHasher`] are incompatible with it.
pub struct Blake2b256;

type Blake2bState = Blake2b<U32>;

fn finish(state: Blake2bState) -> Digest {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&state.finalize());
    Digest(bytes)
}

impl TreeHasher for Blake2b256 {
    fn leaf_sum(segment: &[u8]) -> Digest {
        let mut state = Blake2bState::new();
        state.update(LEAF_PREFIX);
        state.update(segment);
        finish(state)
    }

    fn node_sum(left: Digest, right: Digest) -> Digest {
        let mut state = Blake2bState::new();
        state.update(NODE_PREFIX);
        state.update(left.as_bytes());
        state.update(right.as_bytes());
        finish(state)
    }
}

/// Hash a segment into a leaf digest using the default BLAKE2b-256 hasher.
pub fn leaf_sum(segment: &[u8]) -> Digest {
    Blake2b256::leaf_sum(segment)
}

/// Combine two child digests using the default BLAKE2b-256 hasher.
pub fn node_sum(left: Digest, right: Digest) -> Digest {
    Blake2b256::node_sum(left, right)
}
