//! Block Sealing Module
//!
//! This module paces the local producer: a finished block is held until the
//! parent's timestamp plus the period, then handed to the result sink.
//!
//! # Seal Flow
//!
//! ```text
//!            ┌──────┐
//!            │ Idle │
//!            └──┬───┘
//!               │ parent found, now < parent.time + period
//!               ▼
//!          ┌─────────┐  stop   ┌─────────┐
//!          │ Waiting │────────▶│ Aborted │  Err(SealingStopped)
//!          └────┬────┘         └─────────┘
//!               │ min(delay, max_seal_wait) elapsed
//!               ▼                  ▲
//!          ┌──────────┐   stop     │
//!          │ Delivery │────────────┘
//!          └────┬─────┘
//!               │ slot reserved on results
//!               ▼
//!          ┌───────────┐
//!          │ Delivered │  Ok(SealOutcome)
//!          └───────────┘
//! ```
//!
//! When the patience window runs out before the slot is due, the producer
//! logs that it is skipping its slot and delivers anyway; it never retries.
//! A stop signal that is already raised wins over a wait or delivery that
//! could complete immediately, so a block is delivered at most once.

use crate::{
    consensus::{
        pova::{Pacer, PovaError, PovaResult, StopSignal},
        Clock,
    },
    primitives::Block,
    storage::ChainHeaderReader,
};
use alloy_primitives::B256;
use std::time::Duration;
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info, warn};

/// Result of a successful seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealOutcome {
    /// Height of the delivered block.
    pub number: u64,
    /// Hash of the delivered block.
    pub hash: B256,
    /// Time spent waiting for the slot.
    pub waited: Duration,
    /// Whether the patience window ended the wait before the slot was due.
    pub patience_exceeded: bool,
}

/// Paces and delivers locally produced blocks.
#[derive(Debug, Clone)]
pub struct Sealer<C> {
    pacer: Pacer,
    max_seal_wait: Duration,
    clock: C,
}

impl<C: Clock> Sealer<C> {
    /// Create a sealer.
    pub fn new(pacer: Pacer, max_seal_wait: Duration, clock: C) -> Self {
        Self {
            pacer,
            max_seal_wait,
            clock,
        }
    }

    /// Patience window.
    pub fn max_seal_wait(&self) -> Duration {
        self.max_seal_wait
    }

    /// Time to hold `block` before delivery, before applying the patience cap.
    pub fn seal_delay<R>(&self, chain: &R, block: &Block) -> Duration
    where
        R: ChainHeaderReader + ?Sized,
    {
        let parent_time = block
            .number()
            .checked_sub(1)
            .and_then(|number| chain.get_header(block.parent_hash(), number))
            .map(|parent| parent.time);
        self.pacer.seal_delay(parent_time, self.clock.now())
    }

    /// Wait for the block's slot, then deliver it on `results`.
    ///
    /// Returns [`PovaError::SealingStopped`] without delivering if `stop`
    /// fires first, and [`PovaError::ResultsClosed`] if the sink is gone.
    pub async fn seal<R>(
        &self,
        chain: &R,
        block: Block,
        results: &mpsc::Sender<Block>,
        mut stop: StopSignal,
    ) -> PovaResult<SealOutcome>
    where
        R: ChainHeaderReader + ?Sized,
    {
        let number = block.number();
        let delay = self.seal_delay(chain, &block);
        let started = Instant::now();
        let mut patience_exceeded = false;

        if !delay.is_zero() {
            let wait = delay.min(self.max_seal_wait);
            debug!(
                target: "pova::sealer",
                number,
                delay_secs = delay.as_secs(),
                wait_secs = wait.as_secs(),
                "Waiting for slot"
            );

            tokio::select! {
                biased;

                _ = stop.stopped() => {
                    debug!(target: "pova::sealer", number, "Sealing stopped while waiting");
                    return Err(PovaError::SealingStopped);
                }

                _ = tokio::time::sleep(wait) => {}
            }

            if delay > self.max_seal_wait {
                patience_exceeded = true;
                warn!(
                    target: "pova::sealer",
                    number,
                    validator = %block.coinbase(),
                    max_wait_secs = self.max_seal_wait.as_secs(),
                    "Validator timeout, skipping block"
                );
            }
        }

        let permit = tokio::select! {
            biased;

            _ = stop.stopped() => {
                debug!(target: "pova::sealer", number, "Sealing stopped before delivery");
                return Err(PovaError::SealingStopped);
            }

            permit = results.reserve() => permit.map_err(|_| PovaError::ResultsClosed)?,
        };

        let hash = block.hash();
        permit.send(block);

        let waited = started.elapsed();
        info!(
            target: "pova::sealer",
            number,
            %hash,
            waited_ms = waited.as_millis() as u64,
            patience_exceeded,
            "Sealed block"
        );

        Ok(SealOutcome {
            number,
            hash,
            waited,
            patience_exceeded,
        })
    }
}
