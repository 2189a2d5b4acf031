//! External collaborators of the consensus engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Host node                            │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────────┐   │
//! │  │ ChainHeaderReader   │  │   StateCommitter        │   │
//! │  │                     │  │                         │   │
//! │  │  - get_header       │  │  - commit(number)       │   │
//! │  │  - current_header   │  │  - intermediate_root()  │   │
//! │  └──────────┬──────────┘  └────────────┬────────────┘   │
//! │             └──────────┬───────────────┘                │
//! │                        ▼                                │
//! │               ┌─────────────────┐                       │
//! │               │   Pova engine   │                       │
//! │               └─────────────────┘                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Implementations
//!
//! - [`InMemoryHeaderStore`]: header lookup for tests and the demo
//! - [`InMemoryState`]: staged key/value state with a commit log

mod memory;
mod traits;

pub use memory::{InMemoryHeaderStore, InMemoryState};
pub use traits::{ChainHeaderReader, StateCommitter, StateError};
