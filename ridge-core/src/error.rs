//! Error types for ridge.

use thiserror::Error;

/// Result type for ridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a tree or handling digests.
///
/// All errors are returned to the caller; nothing is retried internally.
/// Proof verification never errors; malformed proofs simply fail to
/// verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The proof index cannot change once data has entered the tree.
    #[error("proof index cannot be set after data has been pushed")]
    AlreadyStarted,

    /// A pushed subtree was taller than the smallest subtree already in the
    /// tree, which would leave a gap that can never be filled.
    #[error("subtree height {height} exceeds the current top height {top}")]
    HeightTooLarge { height: u32, top: u32 },

    /// A pushed subtree would swallow the committed proof index. The
    /// subtree is opaque, so the sibling digests inside it can never be
    /// recovered.
    #[error("subtree spanning leaves {start}..{end} contains proof index {index}")]
    ContainsProofIndex { start: u64, end: u64, index: u64 },

    /// A subtree height whose leaf span does not fit in a `u64`.
    #[error("subtree height {height} is out of range")]
    InvalidHeight { height: u32 },

    /// A digest could not be parsed.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidDigest(e.to_string())
    }
}
