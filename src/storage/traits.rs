//! Collaborator traits consumed by the POVA engine.
//!
//! The engine never owns chain data. Header lookup and state commitment are
//! supplied by the host node through these traits.

use crate::primitives::Header;
use alloy_primitives::B256;

/// Error type for state commitment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Commit was requested for a height that is not the next one.
    #[error("non-sequential commit: last committed {last}, requested {requested}")]
    NonSequentialCommit {
        /// Last committed height
        last: u64,
        /// Requested height
        requested: u64,
    },

    /// Backend failure.
    #[error("state backend error: {0}")]
    Backend(String),
}

/// Read access to chain headers.
pub trait ChainHeaderReader: Send + Sync {
    /// Get header by hash and number.
    fn get_header(&self, hash: B256, number: u64) -> Option<Header>;

    /// Get header by number.
    fn get_header_by_number(&self, number: u64) -> Option<Header>;

    /// Get the current chain head.
    fn current_header(&self) -> Option<Header>;
}

/// Account-state commitment.
///
/// `finalize_and_assemble` calls [`commit`](StateCommitter::commit) and then
/// [`intermediate_root`](StateCommitter::intermediate_root), in that order.
pub trait StateCommitter {
    /// Commit pending state changes for the block at `number`.
    fn commit(&mut self, number: u64) -> Result<(), StateError>;

    /// Root of the committed state.
    fn intermediate_root(&self) -> B256;
}
