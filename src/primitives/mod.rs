//! Chain primitives.
//!
//! - [`Header`]: execution header carrying the declared producer and timestamp
//! - [`Block`]: header plus body, the unit handed to the sealer
//! - [`Receipt`]: per-transaction receipt committed to by the block

mod header;

pub use header::{ordered_root, Block, Header, Receipt};
