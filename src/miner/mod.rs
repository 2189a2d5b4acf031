//! POVA Block Production Module
//!
//! This module turns a prepared header into a delivered block: the assembler
//! commits to the block body and the sealer holds the block until its slot.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Pova engine                                │
//! │  - prepare: coinbase, difficulty, time      │
//! │  - finalize_and_assemble: state root        │
//! └──────────────────┬──────────────────────────┘
//!                    │ calls
//!                    ↓
//! ┌─────────────────────────────────────────────┐
//! │  Miner                                      │
//! │  - BlockAssembler (body commitments)        │
//! │  - Sealer (pacing, stop, delivery)          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`assembler`]: Block assembly from header and body parts
//! - [`sealer`]: Slot pacing and delivery to the result sink

mod assembler;
pub use assembler::{BlockAssembler, DefaultBlockAssembler};

mod sealer;
pub use sealer::{SealOutcome, Sealer};
