//! The streaming Merkle tree builder.
//!
//! A [`Tree`] consumes an ordered sequence of byte segments (or pre-hashed
//! perfect subtrees) and maintains only the compact subtree stack, so memory
//! stays O(log n) no matter how many segments pass through. Finalization is
//! left-leaning: for a non-power-of-two leaf count the leftmost, largest
//! perfect subtree dominates and the smaller right-hand subtrees attach one
//! by one, with no zero padding:
//!
//! ```text
//!                root               5 leaves: the height-2 subtree over
//!               /    \              leaves 0-3 is joined with the lone
//!           h=2        l4           elevated leaf 4. The root of leaves
//!          /   \                    0..4 appears verbatim inside every
//!       h=1     h=1                 larger tree, which is what makes
//!      /   \   /   \                push_subtree possible.
//!     l0   l1 l2   l3
//! ```
//!
//! Proofs for a single committed leaf index are accumulated on the fly:
//! whenever the target's subtree is combined with a neighbor, the neighbor's
//! digest is captured as the next proof sibling.

use std::marker::PhantomData;

use ridge_core::{Blake2b256, Digest, Error, Proof, Result, TreeHasher};

use crate::stack::{SubtreeEntry, SubtreeStack};

/// A streaming Merkle tree over byte segments.
///
/// Push segments (or pre-hashed subtrees) in order, then read the root with
/// [`Tree::root`] or extract an inclusion proof with [`Tree::prove`]. To get
/// a proof, commit the target leaf index with [`Tree::set_proof_index`]
/// before the first push.
///
/// `push` and `push_subtree` cost amortized O(1) hashes (worst case
/// O(log n)); `root` and `prove` cost O(log n) and never mutate the tree.
/// The tree is a plain value: not thread-safe, owned and mutated by one
/// caller at a time.
pub struct Tree<H: TreeHasher = Blake2b256> {
    stack: SubtreeStack,
    leaf_count: u64,
    proof_target: Option<u64>,
    proof_siblings: Vec<Digest>,
    marker: PhantomData<H>,
}

impl Tree<Blake2b256> {
    /// Create an empty tree using the default BLAKE2b-256 hasher.
    pub fn new() -> Self {
        Self::with_hasher()
    }
}

impl<H: TreeHasher> Default for Tree<H> {
    fn default() -> Self {
        Self::with_hasher()
    }
}

impl<H: TreeHasher> Tree<H> {
    /// Create an empty tree using hasher `H`.
    pub fn with_hasher() -> Self {
        Self {
            stack: SubtreeStack::new(),
            leaf_count: 0,
            proof_target: None,
            proof_siblings: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Number of leaves absorbed so far. A pushed subtree counts for its
    /// full `2^height` span.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Returns `true` if nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of perfect subtrees currently retained: one per set bit of
    /// [`Tree::leaf_count`].
    pub fn subtree_count(&self) -> usize {
        self.stack.len()
    }

    /// Commit to the leaf index that [`Tree::prove`] will authenticate.
    ///
    /// Fails with [`Error::AlreadyStarted`] once any data has entered the
    /// tree. No bound is imposed against the eventual leaf count: the index
    /// may point past the data that ends up being pushed, in which case
    /// `prove` reports no proof.
    pub fn set_proof_index(&mut self, index: u64) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::AlreadyStarted);
        }
        self.proof_target = Some(index);
        Ok(())
    }

    /// Hash `segment` into a leaf and absorb it.
    ///
    /// Never fails; segments of any length, including empty, are legal.
    pub fn push(&mut self, segment: &[u8]) {
        let digest = H::leaf_sum(segment);
        self.absorb(SubtreeEntry { height: 0, digest });
    }

    /// Absorb a pre-hashed perfect subtree covering `2^height` leaves.
    ///
    /// The subtree occupies the next `2^height` leaf positions. It must not
    /// be taller than the smallest subtree already in the tree
    /// ([`Error::HeightTooLarge`]), and, unless it is a single leaf, it
    /// must not cover the committed proof index
    /// ([`Error::ContainsProofIndex`]): the subtree is opaque, so the
    /// sibling digests inside it can never be produced.
    pub fn push_subtree(&mut self, height: u32, digest: Digest) -> Result<()> {
        let span = 1u64
            .checked_shl(height)
            .ok_or(Error::InvalidHeight { height })?;
        if let Some(top) = self.stack.top_height() {
            if height > top {
                return Err(Error::HeightTooLarge { height, top });
            }
        }
        if let Some(index) = self.proof_target {
            let start = self.leaf_count;
            let end = start.saturating_add(span);
            if height > 0 && index >= start && index < end {
                return Err(Error::ContainsProofIndex { start, end, index });
            }
        }
        self.absorb(SubtreeEntry { height, digest });
        Ok(())
    }

    /// Current Merkle root. Does not mutate the tree; the all-zero digest
    /// is returned for an empty tree.
    pub fn root(&self) -> Digest {
        self.stack.collapse::<H>().unwrap_or(Digest::ZERO)
    }

    /// Produce the inclusion proof for the committed index.
    ///
    /// Idempotent: the tree is not mutated and repeated calls return
    /// identical proofs; pushing more data and proving again yields the
    /// proof for the grown tree. When the tree is empty, no index was
    /// committed, or the index lies at or beyond [`Tree::leaf_count`], the
    /// returned proof carries no siblings.
    pub fn prove(&self) -> Proof {
        let leaf_count = self.leaf_count;
        let index = self.proof_target.unwrap_or(0);
        let active = self.proof_target.is_some() && leaf_count > 0 && index < leaf_count;
        if !active {
            return Proof {
                root: self.root(),
                leaf: None,
                siblings: Vec::new(),
                index,
                leaf_count,
            };
        }

        // Finish the proof by simulating the final collapse: every fold on
        // the path from the target's residual subtree up to the root
        // contributes one more sibling.
        let mut siblings = self.proof_siblings.clone();
        let entries = self.stack.entries();
        let (top, lower) = entries.split_last().expect("active tree is non-empty");
        let mut sum = top.digest;
        let mut upper_start = leaf_count - top.leaves();
        for entry in lower.iter().rev() {
            let entry_start = upper_start - entry.leaves();
            if index >= upper_start {
                siblings.push(entry.digest);
            } else if index >= entry_start {
                siblings.push(sum);
            }
            sum = H::node_sum(entry.digest, sum);
            upper_start = entry_start;
        }

        Proof {
            root: sum,
            leaf: siblings.first().copied(),
            siblings,
            index,
            leaf_count,
        }
    }

    /// Absorb an entry at the next leaf position, capturing proof siblings
    /// along the way.
    fn absorb(&mut self, entry: SubtreeEntry) {
        let span = entry.leaves();
        let start = self.leaf_count;

        // The proof always begins with the target's own leaf digest.
        if let Some(index) = self.proof_target {
            if entry.height == 0 && index == start {
                self.proof_siblings.push(entry.digest);
            }
        }

        // Track the carried entry's left edge through the coalescing chain;
        // at each combination the operand on the far side of the target is
        // the next proof sibling.
        let target = self.proof_target;
        let siblings = &mut self.proof_siblings;
        let stack = &mut self.stack;
        let mut right_start = start;
        stack.absorb::<H, _>(entry, |left, right| {
            let width = left.leaves();
            let left_start = right_start - width;
            if let Some(index) = target {
                if index >= left_start && index < right_start {
                    siblings.push(right.digest);
                } else if index >= right_start && index < right_start + width {
                    siblings.push(left.digest);
                }
            }
            right_start = left_start;
        });

        self.leaf_count = start + span;
    }
}
