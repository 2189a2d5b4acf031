//! POVA consensus errors.

use crate::storage::StateError;
use alloy_primitives::Address;
use thiserror::Error;

/// Errors surfaced by the POVA engine.
///
/// Nothing here is retried internally; the host decides what to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PovaError {
    /// Declared producer is not the one the rotation assigns to the height.
    #[error("unauthorized block proposer at block {number}: got {producer}, expected {expected}")]
    Unauthorized {
        /// Header height.
        number: u64,
        /// Declared producer.
        producer: Address,
        /// Producer assigned by the rotation.
        expected: Address,
    },

    /// The stop signal fired while waiting or delivering.
    #[error("sealing stopped")]
    SealingStopped,

    /// The result sink was dropped before the block could be delivered.
    #[error("seal result channel closed")]
    ResultsClosed,

    /// Genesis has no producer and cannot be prepared or sealed.
    #[error("genesis block cannot be produced")]
    GenesisNotProducible,

    /// Extra-data does not carry a 65 byte seal.
    #[error("extra-data 65 byte signature suffix missing")]
    MissingSignature,

    /// Public key recovery from the seal failed.
    #[error("signature recovery failed: {message}")]
    SignatureRecoveryFailed {
        /// Underlying error.
        message: String,
    },

    /// Recovered signer differs from the declared producer.
    #[error("invalid block signature: signed by {signer}, declared {producer}")]
    InvalidSignature {
        /// Recovered signer.
        signer: Address,
        /// Declared producer.
        producer: Address,
    },

    /// State commitment failed during assembly.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Engine construction errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rotation needs at least one validator.
    #[error("validator set is empty")]
    EmptyValidatorSet,

    /// Genesis document could not be parsed.
    #[error("invalid genesis: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type PovaResult<T> = Result<T, PovaError>;
