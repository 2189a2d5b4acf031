//! POVA Consensus Engine
//!
//! A round-robin authority rotation engine for an Ethereum-style chain: a
//! fixed validator list takes turns producing blocks at a configured period.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Host node                                  │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐                      ┌─────────────────┐       │
//! │  │   Pova engine   │─────── reads ───────▶│    Storage      │       │
//! │  │                 │                      │                 │       │
//! │  └────────┬────────┘                      │  HeaderReader   │       │
//! │           │                               │  StateCommitter │       │
//! │  ┌────────┼─────────────┐                 └─────────────────┘       │
//! │  │        │             │                                           │
//! │  ▼        ▼             ▼                                           │
//! │ Schedule  Authorizer   Miner                                        │
//! │ Pacer     Pipeline     (Assembler, Sealer)                          │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`consensus`]: Configuration, rotation, verification and the engine
//! - [`miner`]: Block assembly and sealing
//! - [`primitives`]: Header, block and receipt types
//! - [`storage`]: Collaborator traits and in-memory implementations

#![warn(unused_crate_dependencies)]
// Dependencies used by binaries
use eyre as _;
use tracing_subscriber as _;

pub mod consensus;
pub mod miner;
pub mod primitives;
pub mod storage;

// Re-export configuration
pub use consensus::{
    ChainConfig, Clock, Genesis, ManualClock, PovaConfig, SystemClock, DEFAULT_MAX_SEAL_WAIT,
    DEFAULT_PERIOD,
};

// Re-export the engine and its building blocks
pub use consensus::pova::{
    stop_channel, AbortHandle, ApiDescriptor, ConfigError, HeaderAuthorizer, Pacer, Pova,
    PovaError, PovaResult, RotationSchedule, StopHandle, StopSignal, VerificationPipeline,
    VerifyResults, EXTRA_SEAL, POVA_DIFFICULTY,
};

// Re-export block production
pub use miner::{BlockAssembler, DefaultBlockAssembler, SealOutcome, Sealer};

// Re-export primitives
pub use primitives::{ordered_root, Block, Header, Receipt};

// Re-export storage types
pub use storage::{
    ChainHeaderReader, InMemoryHeaderStore, InMemoryState, StateCommitter, StateError,
};
