//! Ridge core: digests, domain-separated hashing, and proof verification.
//!
//! This crate provides the shared vocabulary of the ridge workspace:
//!
//! - [`crypto`] - the 32-byte [`Digest`], the [`TreeHasher`] trait, and the
//!   default BLAKE2b-256 leaf/node sums
//! - [`error`] - the [`Error`] enum and [`Result`] alias
//! - [`proof`] - the [`Proof`] type and the stateless verifier
//!
//! The streaming tree builder that produces roots and proofs lives in the
//! `ridge-tree` crate; verification requires only this crate.
//!
//! # Example
//!
//! ```rust
//! use ridge_core::{leaf_sum, node_sum, verify_proof};
//!
//! let left = leaf_sum(b"alpha");
//! let right = leaf_sum(b"beta");
//! let root = node_sum(left, right);
//!
//! // Prove that "alpha" is leaf 0 of the two-leaf tree.
//! assert!(verify_proof(root, &[left, right], 0, 2));
//! assert!(!verify_proof(root, &[left, right], 1, 2));
//! ```

pub mod crypto;
pub mod error;
pub mod proof;

// Re-exports for convenience
pub use crypto::{leaf_sum, node_sum, Blake2b256, Digest, TreeHasher};
pub use error::{Error, Result};
pub use proof::{verify_batch, verify_proof, verify_proof_with, Proof};
