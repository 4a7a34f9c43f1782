//! Inclusion proofs and stateless verification.
//!
//! A [`Proof`] authenticates a single leaf of a streaming Merkle tree. The
//! sibling list starts with the leaf digest itself, followed by the sibling
//! digests in ascending order along the path from the leaf toward the root,
//! skipping levels where the tree has no sibling to offer (the left-leaning
//! construction elevates incomplete right-hand subtrees instead of padding
//! them).
//!
//! Verification is a pure function of `(root, siblings, index, leaf_count)`
//! and mirrors the builder's finalization fold exactly.

use serde::{Deserialize, Serialize};

use crate::crypto::{Blake2b256, Digest, TreeHasher};

/// Batches below this size are verified sequentially.
const PARALLEL_THRESHOLD: usize = 16;

/// An inclusion proof for a single leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Root of the tree the proof was generated against.
    pub root: Digest,
    /// Digest of the proven leaf; always equal to `siblings[0]` when a
    /// proof was produced, and `None` otherwise.
    pub leaf: Option<Digest>,
    /// The leaf digest followed by the sibling digests from leaf to root.
    /// Empty when no proof could be produced.
    pub siblings: Vec<Digest>,
    /// Index of the proven leaf.
    pub index: u64,
    /// Total number of leaves in the tree when the proof was generated.
    pub leaf_count: u64,
}

impl Proof {
    /// Verify this proof against its own root using the default
    /// BLAKE2b-256 hasher.
    ///
    /// Proofs produced with a non-default [`TreeHasher`] must go through
    /// [`verify_proof_with`] instead.
    pub fn verify(&self) -> bool {
        verify_proof(self.root, &self.siblings, self.index, self.leaf_count)
    }
}

/// Verify an inclusion proof using the default BLAKE2b-256 hasher.
///
/// `siblings[0]` is the claimed leaf digest (not the raw segment). Returns
/// `false` (never an error) for any malformed input: a zero `leaf_count`,
/// an empty sibling list, an index at or beyond `leaf_count`, or a sibling
/// list of the wrong length.
pub fn verify_proof(root: Digest, siblings: &[Digest], index: u64, leaf_count: u64) -> bool {
    verify_proof_with::<Blake2b256>(root, siblings, index, leaf_count)
}

/// Verify an inclusion proof using a caller-chosen hasher.
///
/// The reconstruction mirrors the builder's combining decisions,
/// parameterized only by `index` and `leaf_count`:
///
/// 1. Climb while the `2^h`-aligned subtree around `index` is complete,
///    consuming one sibling per level; the index's offset within the
///    subtree decides which side the sibling attaches to.
/// 2. If the last complete subtree stops short of the final leaf, the
///    remaining right-hand leaves were elevated into a single subtree:
///    consume one sibling as a right child.
/// 3. Every remaining element is an ancestor attached as a left child.
///
/// All elements must be consumed. A short list fails step 1 or 2; surplus
/// elements fold into the sum in step 3 and change the recomputed root.
pub fn verify_proof_with<H: TreeHasher>(
    root: Digest,
    siblings: &[Digest],
    index: u64,
    leaf_count: u64,
) -> bool {
    if leaf_count == 0 || siblings.is_empty() || index >= leaf_count {
        return false;
    }

    let mut sum = siblings[0];
    let mut consumed = 1;
    let mut height = 1u32;
    // Ending index of the last complete subtree around the target.
    let mut stable_end = index;
    loop {
        let span = match 1u64.checked_shl(height) {
            Some(span) => span,
            None => break,
        };
        let subtree_start = (index / span) * span;
        let subtree_end = match subtree_start.checked_add(span) {
            Some(end) => end - 1,
            None => break,
        };
        if subtree_end >= leaf_count {
            break;
        }
        stable_end = subtree_end;

        let Some(&sibling) = siblings.get(consumed) else {
            return false;
        };
        if index - subtree_start < span / 2 {
            sum = H::node_sum(sum, sibling);
        } else {
            sum = H::node_sum(sibling, sum);
        }
        consumed += 1;
        height += 1;
    }

    // Leaves to the right of the last complete subtree collapse into a
    // single elevated sibling.
    if stable_end != leaf_count - 1 {
        let Some(&sibling) = siblings.get(consumed) else {
            return false;
        };
        sum = H::node_sum(sum, sibling);
        consumed += 1;
    }

    for &sibling in &siblings[consumed..] {
        sum = H::node_sum(sibling, sum);
    }

    sum == root
}

/// Verify a batch of independent proofs.
///
/// Returns `true` only if every proof verifies. Larger batches are checked
/// in parallel; small ones sequentially, where the thread overhead would
/// dominate.
pub fn verify_batch(proofs: &[Proof]) -> bool {
    use rayon::prelude::*;

    if proofs.len() < PARALLEL_THRESHOLD {
        return proofs.iter().all(Proof::verify);
    }
    proofs.par_iter().all(Proof::verify)
}
