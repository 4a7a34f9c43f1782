//! Property-based tests for the streaming tree.
//!
//! Exercises the invariants of the tree under arbitrary segment sequences:
//! deterministic roots, proof soundness at the committed index and nowhere
//! else, idempotent proving, and equivalence of raw pushes with subtree
//! pushes.

use proptest::prelude::*;

use ridge_core::{leaf_sum, node_sum, verify_proof, Digest};

use crate::Tree;

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary byte segments of varied lengths (including empty).
fn arb_segments(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..max_count)
}

/// Segment sequences with at least one element.
fn arb_nonempty_segments(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..max_count)
}

fn build(segments: &[Vec<u8>]) -> Tree {
    let mut tree = Tree::new();
    for segment in segments {
        tree.push(segment);
    }
    tree
}

/// Distinct leaves, so cross-index verification must always fail.
fn distinct_segments(count: u64) -> Vec<Vec<u8>> {
    (0..count).map(|i| i.to_le_bytes().to_vec()).collect()
}

// ============================================================================
// Property Tests: Roots
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The root is a deterministic function of the segment sequence.
    #[test]
    fn prop_root_deterministic(segments in arb_segments(64)) {
        prop_assert_eq!(build(&segments).root(), build(&segments).root());
    }

    /// Every push advances the leaf count by exactly one.
    #[test]
    fn prop_leaf_count(segments in arb_segments(64)) {
        let tree = build(&segments);
        prop_assert_eq!(tree.leaf_count(), segments.len() as u64);
        prop_assert_eq!(tree.is_empty(), segments.is_empty());
    }

    /// The retained state is one digest per set bit of the leaf count.
    #[test]
    fn prop_stack_tracks_popcount(segments in arb_segments(200)) {
        let tree = build(&segments);
        prop_assert_eq!(
            tree.subtree_count(),
            (segments.len() as u64).count_ones() as usize
        );
    }

    /// The root changes whenever another segment is absorbed.
    #[test]
    fn prop_root_changes_on_push(segments in arb_nonempty_segments(32)) {
        let mut tree = Tree::new();
        let mut previous = tree.root();
        for segment in &segments {
            tree.push(segment);
            let root = tree.root();
            prop_assert_ne!(previous, root);
            previous = root;
        }
    }
}

// ============================================================================
// Property Tests: Proofs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// A proof for any committed index verifies against the final root, and
    /// fails against a different index.
    #[test]
    fn prop_proof_sound_and_unique(count in 1u64..48, salt in any::<u64>()) {
        let segments = distinct_segments(count);
        let index = salt % count;

        let mut tree = Tree::new();
        tree.set_proof_index(index).unwrap();
        for segment in &segments {
            tree.push(segment);
        }

        let proof = tree.prove();
        prop_assert_eq!(proof.leaf, Some(leaf_sum(&segments[index as usize])));
        prop_assert!(proof.verify());

        if count > 1 {
            let wrong = (index + 1 + salt % (count - 1)) % count;
            prop_assert_ne!(wrong, index);
            prop_assert!(!verify_proof(proof.root, &proof.siblings, wrong, count));
        }
    }

    /// Two successive prove calls return identical proofs.
    #[test]
    fn prop_prove_is_idempotent(count in 1u64..48, salt in any::<u64>()) {
        let mut tree = Tree::new();
        tree.set_proof_index(salt % count).unwrap();
        for segment in distinct_segments(count) {
            tree.push(&segment);
        }
        prop_assert_eq!(tree.prove(), tree.prove());
    }

    /// Dropping any element of a valid multi-element proof breaks it.
    #[test]
    fn prop_truncated_proof_rejected(count in 2u64..48, salt in any::<u64>()) {
        let mut tree = Tree::new();
        tree.set_proof_index(salt % count).unwrap();
        for segment in distinct_segments(count) {
            tree.push(&segment);
        }

        let proof = tree.prove();
        prop_assert!(proof.siblings.len() >= 2);
        for drop_at in 0..proof.siblings.len() {
            let mut truncated = proof.siblings.clone();
            truncated.remove(drop_at);
            prop_assert!(
                !verify_proof(proof.root, &truncated, proof.index, count),
                "dropping element {} left the proof valid",
                drop_at
            );
        }
    }

    /// Proofs stay logarithmic in the leaf count.
    #[test]
    fn prop_proof_size_logarithmic(count in 1u64..512, salt in any::<u64>()) {
        let mut tree = Tree::new();
        tree.set_proof_index(salt % count).unwrap();
        for segment in distinct_segments(count) {
            tree.push(&segment);
        }

        let ceil_log2 = (64 - (count - 1).leading_zeros()) as usize;
        prop_assert!(tree.prove().siblings.len() <= ceil_log2 + 2);
    }
}

// ============================================================================
// Property Tests: Subtree Pushes
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Pushing `2^k` segments is equivalent to pushing them as pre-hashed
    /// subtrees of any intermediate height.
    #[test]
    fn prop_subtree_push_equivalence(height in 0u32..5, seed in any::<u64>()) {
        let count = 1u64 << height;
        let segments: Vec<Vec<u8>> = (0..count)
            .map(|i| (seed ^ i).to_le_bytes().to_vec())
            .collect();
        let expected = build(&segments).root();

        // One pre-hashed subtree per 2^chunk_height segments.
        for chunk_height in 0..=height {
            let chunk = 1usize << chunk_height;
            let mut tree = Tree::new();
            for group in segments.chunks(chunk) {
                let mut level: Vec<Digest> = group.iter().map(|s| leaf_sum(s)).collect();
                while level.len() > 1 {
                    level = level
                        .chunks(2)
                        .map(|pair| node_sum(pair[0], pair[1]))
                        .collect();
                }
                tree.push_subtree(chunk_height, level[0]).unwrap();
            }
            prop_assert_eq!(tree.root(), expected, "chunk height {}", chunk_height);
        }
    }

    /// A tree assembled from a subtree prefix proves its later leaves just
    /// like a tree built from scratch.
    #[test]
    fn prop_subtree_prefix_preserves_proofs(prefix_height in 1u32..4, extra in 1u64..6) {
        let prefix_count = 1u64 << prefix_height;
        let segments = distinct_segments(prefix_count + extra);

        let reference = build(&segments).root();
        let index = prefix_count + extra - 1;

        let mut level: Vec<Digest> = segments[..prefix_count as usize]
            .iter()
            .map(|s| leaf_sum(s))
            .collect();
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| node_sum(pair[0], pair[1]))
                .collect();
        }

        let mut tree = Tree::new();
        tree.set_proof_index(index).unwrap();
        tree.push_subtree(prefix_height, level[0]).unwrap();
        for segment in &segments[prefix_count as usize..] {
            tree.push(segment);
        }

        let proof = tree.prove();
        prop_assert_eq!(proof.root, reference);
        prop_assert!(proof.verify());
    }
}
