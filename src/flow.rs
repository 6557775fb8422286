//! Pause/resume gate for the read loop.
//!
//! Shared between the engine handle and the spawned read loop. The loop
//! checks the gate once per iteration, before requesting the next
//! segment: pausing never cancels a pull already in flight, it only
//! keeps the next one from being issued. Resuming wakes a parked loop
//! immediately.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Open/closed gate consulted before each source pull.
#[derive(Debug, Default)]
pub(crate) struct FlowGate {
    closed: AtomicBool,
    reopened: Notify,
}

impl FlowGate {
    /// Create a gate in the open state.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Close the gate.
    ///
    /// The read loop finishes folding in any segment already in flight,
    /// then parks before issuing the next pull.
    pub(crate) fn pause(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Reopen the gate and wake a parked loop.
    pub(crate) fn resume(&self) {
        self.closed.store(false, Ordering::Release);
        self.reopened.notify_waiters();
    }

    /// Check whether the gate is open.
    #[inline]
    pub(crate) fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Wait until the gate is open, returning immediately when it
    /// already is.
    ///
    /// The notified future is created before the flag is re-checked so a
    /// resume racing with the park cannot be missed.
    pub(crate) async fn wait_until_open(&self) {
        loop {
            if self.is_open() {
                return;
            }

            let reopened = self.reopened.notified();
            if self.is_open() {
                return;
            }
            reopened.await;
        }
    }
}
