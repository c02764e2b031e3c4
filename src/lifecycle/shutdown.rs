//! Process-wide stop signal for background servers.

use std::future::Future;

use tokio::sync::broadcast;

/// One-shot stop signal shared by every background server.
///
/// Checkers have their own per-endpoint channels (see `monitor::supervisor`);
/// this covers whatever else runs until the process exits.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future that resolves once [`Shutdown::trigger`] runs or the
    /// coordinator is dropped.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Fire the signal. Returns how many waiters were notified.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
