//! Streaming Merkle trees with single-leaf inclusion proofs.
//!
//! A [`Tree`] consumes an ordered sequence of byte segments and keeps only
//! O(log n) state: one digest per perfect subtree, coalesced like a binary
//! counter as segments arrive. Leaves and internal nodes are domain
//! separated (`0x00` / `0x01` prefixes) under BLAKE2b-256, and trees with a
//! non-power-of-two leaf count finalize left-leaning, without padding.
//!
//! To obtain an inclusion proof, commit the target index before the first
//! push; the tree captures exactly the sibling digests that authenticate
//! that leaf as it grows. Verification is stateless and lives in
//! [`ridge_core`].
//!
//! # Example
//!
//! ```rust
//! use ridge_core::verify_proof;
//! use ridge_tree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.set_proof_index(1).unwrap();
//! for segment in [b"alpha".as_slice(), b"beta", b"gamma"] {
//!     tree.push(segment);
//! }
//!
//! let root = tree.root();
//! let proof = tree.prove();
//! assert_eq!(proof.root, root);
//! assert!(verify_proof(root, &proof.siblings, proof.index, proof.leaf_count));
//! ```

mod stack;
mod tree;

#[cfg(test)]
mod proptest;

pub use tree::Tree;
