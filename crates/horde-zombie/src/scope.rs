//! Broadcast cancellation for everything a room owns.
//!
//! One [`CancelScope`] per room; every zombie gets a [`CancelToken`] from
//! it when summoned. Cancelling the scope stops them all. There is no
//! per-zombie cancellation: killing a single zombie is a local flag.

use std::sync::Arc;

use tokio::sync::watch;

/// The owning side of a cancellation scope. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelScope {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelScope {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Hands out a token that observes this scope.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Cancels every token. Calling it again does nothing.
    pub fn cancel(&self) {
        self.tx.send_if_modified(|cancelled| {
            let changed = !*cancelled;
            *cancelled = true;
            changed
        });
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// The observing side of a [`CancelScope`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the scope is cancelled, or once every scope handle
    /// has been dropped (nobody is left to cancel, so nobody is left to
    /// run for).
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }
}
