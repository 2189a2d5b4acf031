//! POVA round-robin authority rotation engine.
//!
//! A fixed, ordered validator list takes turns producing blocks. Height `n`
//! (for `n >= 1`) belongs to `validators[(n - 1) % len]`; genesis has no
//! producer. Blocks are paced to at least `period` seconds after their parent.
//! Verification checks the declared `coinbase` against the rotation, with an
//! optional secp256k1 seal check on top.

mod authorizer;
mod engine;
mod error;
mod pacer;
mod pipeline;
mod schedule;
pub mod seal;
mod signal;

pub use authorizer::HeaderAuthorizer;
pub use engine::{ApiDescriptor, Pova};
pub use error::{ConfigError, PovaError, PovaResult};
pub use pacer::{Pacer, POVA_DIFFICULTY};
pub use pipeline::{VerificationPipeline, VerifyResults};
pub use schedule::RotationSchedule;
pub use signal::{stop_channel, AbortHandle, StopHandle, StopSignal};

/// Fixed number of extra-data suffix bytes reserved for the producer seal (65 bytes signature).
pub const EXTRA_SEAL: usize = 65;
