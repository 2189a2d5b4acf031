//! One-shot cancellation signals.
//!
//! Both the sealer's stop signal and the verification pipeline's abort handle
//! are a `watch` channel carrying a single `bool` that only ever flips to
//! `true`. Raising it twice is harmless and every clone of the signal sees it.

use tokio::sync::watch;

/// Create a connected stop handle and signal.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Raising side of a stop signal.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Raise the signal. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal has been raised.
    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Another observer of this signal.
    pub fn subscribe(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observing side of a stop signal.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        Self { rx }
    }

    /// Whether the signal has been raised.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal is raised.
    ///
    /// Pends forever if every handle is dropped without stopping.
    pub async fn stopped(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                if *self.rx.borrow() {
                    return;
                }
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Abort handle returned by `verify_headers`.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    inner: StopHandle,
}

impl AbortHandle {
    /// Create a handle and the signal the worker observes.
    pub(crate) fn new() -> (Self, StopSignal) {
        let (inner, signal) = stop_channel();
        (Self { inner }, signal)
    }

    /// Stop the verification worker before its next result.
    pub fn abort(&self) {
        self.inner.stop();
    }

    /// Whether abort has been requested.
    pub fn is_aborted(&self) -> bool {
        self.inner.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stop_is_observed() {
        let (handle, mut signal) = stop_channel();
        assert!(!signal.is_stopped());

        let waiter = tokio::spawn(async move {
            signal.stopped().await;
        });

        handle.stop();
        handle.stop(); // idempotent
        assert!(handle.is_stopped());

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("stop not observed")
            .unwrap();
    }

    #[tokio::test]
    async fn test_already_stopped_resolves_immediately() {
        let (handle, mut signal) = stop_channel();
        handle.stop();

        tokio::time::timeout(Duration::from_millis(100), signal.stopped())
            .await
            .expect("should resolve at once");
    }

    #[tokio::test]
    async fn test_stop_then_drop_still_observed() {
        let (handle, mut signal) = stop_channel();
        handle.stop();
        drop(handle);

        tokio::time::timeout(Duration::from_millis(100), signal.stopped())
            .await
            .expect("should resolve at once");
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_signal_pends() {
        let mut signal = StopSignal::never();
        let result = tokio::time::timeout(Duration::from_secs(3600), signal.stopped()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_subscribers_share_state() {
        let (handle, signal) = stop_channel();
        let other = handle.subscribe();
        handle.stop();

        assert!(signal.is_stopped());
        assert!(other.is_stopped());
    }

    #[test]
    fn test_abort_handle() {
        let (handle, signal) = AbortHandle::new();
        assert!(!handle.is_aborted());
        handle.abort();
        assert!(handle.is_aborted());
        assert!(signal.is_stopped());
    }
}
