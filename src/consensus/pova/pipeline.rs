//! Batch header verification.
//!
//! ```text
//! caller                      worker task
//!   │ verify_batch(headers)      │
//!   │──────── spawn ────────────▶│ for header in headers:
//!   │◀── (abort, results) ───────│   if aborted → return
//!   │                            │   results.send(verify(header))
//!   │ results.recv() ◀───────────│
//! ```
//!
//! Results arrive in input order, one per header. Aborting stops the worker
//! before its next send; the receiver then simply yields fewer results than
//! headers submitted. No sentinel is sent.
//!
//! Inside a tokio runtime the worker is a task on that runtime. Without one it
//! runs on a dedicated thread driving its own current-thread runtime.

use super::{AbortHandle, HeaderAuthorizer, PovaError, StopSignal};
use crate::primitives::Header;
use std::{future::Future, thread};
use tokio::{
    runtime::{self, Handle},
    sync::mpsc,
};
use tracing::{debug, error, trace};

/// Receiving end of a batch verification.
pub type VerifyResults = mpsc::Receiver<Result<(), PovaError>>;

/// Runs a [`HeaderAuthorizer`] over header batches on a background task.
#[derive(Debug, Clone)]
pub struct VerificationPipeline {
    authorizer: HeaderAuthorizer,
}

impl VerificationPipeline {
    /// Create a pipeline around `authorizer`.
    pub fn new(authorizer: HeaderAuthorizer) -> Self {
        Self { authorizer }
    }

    /// Verify `headers` concurrently with the caller.
    ///
    /// The result channel holds the whole batch, so the worker never waits on
    /// a slow consumer. If no worker can be started the channel closes without
    /// yielding any result.
    pub fn verify_batch(&self, headers: Vec<Header>) -> (AbortHandle, VerifyResults) {
        let (abort, signal) = AbortHandle::new();
        let (results_tx, results_rx) = mpsc::channel(headers.len().max(1));

        let worker = run_batch(self.authorizer.clone(), headers, signal, results_tx);
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(worker);
            }
            Err(_) => {
                let spawned = thread::Builder::new()
                    .name("pova-verify".to_string())
                    .spawn(move || block_on_worker(worker));
                if let Err(err) = spawned {
                    error!(target: "pova::verify", %err, "Failed to spawn verification thread");
                }
            }
        }

        (abort, results_rx)
    }
}

/// Drive `worker` to completion on a fresh current-thread runtime.
fn block_on_worker(worker: impl Future<Output = ()>) {
    match runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt.block_on(worker),
        Err(err) => {
            error!(target: "pova::verify", %err, "Failed to build verification runtime");
        }
    }
}

async fn run_batch(
    authorizer: HeaderAuthorizer,
    headers: Vec<Header>,
    abort: StopSignal,
    results: mpsc::Sender<Result<(), PovaError>>,
) {
    let total = headers.len();
    trace!(target: "pova::verify", total, "Verifying header batch");

    for (index, header) in headers.iter().enumerate() {
        let result = authorizer.verify(header);

        if abort.is_stopped() {
            debug!(target: "pova::verify", delivered = index, total, "Header verification aborted");
            return;
        }

        if results.send(result).await.is_err() {
            debug!(target: "pova::verify", delivered = index, total, "Result receiver dropped");
            return;
        }

        // Let the consumer run between results
        tokio::task::yield_now().await;
    }
}
