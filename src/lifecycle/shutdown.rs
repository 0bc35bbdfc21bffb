//! Shutdown coordination for the proxy.

use std::future::Future;

use tokio::sync::broadcast;

/// Broadcasts a single "stop accepting and drain" event to the server.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the event. A no-op when nothing is listening.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners");
        }
    }

    /// Fire the event once `signal` resolves.
    pub async fn trigger_after<F>(self, signal: F)
    where
        F: Future<Output = ()>,
    {
        signal.await;
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
