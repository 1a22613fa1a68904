//! Shutdown coordination.

use tokio::sync::watch;

/// Trigger side of graceful shutdown.
///
/// Any number of [`ShutdownSignal`]s can observe it; a signal created after
/// the trigger fires resolves immediately.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Obtain a signal for one long-running task.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the shutdown signal.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Observing side of graceful shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered or the [`Shutdown`] is dropped.
    pub async fn recv(mut self) {
        // Err means the sender is gone, which counts as shutdown.
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
