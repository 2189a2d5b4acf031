//! Block pacing.
//!
//! A block is due `period` seconds after its parent. Prepared headers are
//! never stamped earlier than that, but follow the wall clock once it has
//! passed the target so a slow predecessor does not push every later block
//! into the past.
//!
//! ```text
//! parent.time = T, period = 15
//!
//! now = T+5   → stamp T+15, seal after 10s
//! now = T+20  → stamp T+20, seal immediately
//! no parent   → stamp now,  seal immediately
//! ```

use std::time::Duration;

/// Difficulty reported for every POVA block.
pub const POVA_DIFFICULTY: u64 = 1;

/// Computes target timestamps and seal delays for a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    period: u64,
}

impl Pacer {
    /// Create a pacer with `period` seconds between blocks.
    pub const fn new(period: u64) -> Self {
        Self { period }
    }

    /// Configured period in seconds.
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// Earliest timestamp for a child of a block stamped `parent_time`.
    pub const fn expected_timestamp(&self, parent_time: u64) -> u64 {
        parent_time.saturating_add(self.period)
    }

    /// Timestamp for a new header.
    pub fn stamp(&self, parent_time: Option<u64>, now: u64) -> u64 {
        match parent_time {
            Some(parent_time) => self.expected_timestamp(parent_time).max(now),
            None => now,
        }
    }

    /// How long a producer should hold a block before sealing it.
    pub fn seal_delay(&self, parent_time: Option<u64>, now: u64) -> Duration {
        let Some(parent_time) = parent_time else {
            return Duration::ZERO;
        };
        let expected = self.expected_timestamp(parent_time);
        Duration::from_secs(expected.saturating_sub(now))
    }
}
