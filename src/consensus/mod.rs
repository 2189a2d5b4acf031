//! POVA (Proof of Validator Authority) consensus.
//!
//! This module implements a fixed round-robin authority rotation:
//!
//! # Algorithm
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    POVA Round-Robin                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Validators: [V0, V1, V2]                                   │
//! │  Period: 15 seconds                                         │
//! │                                                             │
//! │  Block 0 → genesis (no producer)                            │
//! │  Block 1 → V0                                               │
//! │  Block 2 → V1                                               │
//! │  Block 3 → V2                                               │
//! │  Block 4 → V0                                               │
//! │  ...                                                        │
//! │                                                             │
//! │  Every block has difficulty 1. Only the in-turn validator   │
//! │  may produce; there is no out-of-turn fallback.             │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`ChainConfig`] / [`Genesis`]: Configuration (period, patience, validators)
//! - [`pova::RotationSchedule`]: Who produces which height
//! - [`pova::Pacer`]: When a block is due
//! - [`pova::Pova`]: The engine surface used by the host node
//! - [`Clock`]: Wall-clock source, swappable in tests

mod clock;
mod config;
pub mod pova;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ChainConfig, Genesis, PovaConfig};

/// Default block period in seconds.
pub const DEFAULT_PERIOD: u64 = 15;

/// Default seconds a producer waits for its slot before sealing anyway.
pub const DEFAULT_MAX_SEAL_WAIT: u64 = 30;
