//! Ownership of the running checker tasks.
//!
//! Every endpoint gets its own task plus a `watch` channel used to cancel
//! that task alone. `stop_all` is what shutdown uses; `stop` lets a caller
//! drop one endpoint without touching the others.

use std::collections::HashMap;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::monitor::checker::Checker;

/// Per-endpoint task state.
struct CheckerSlot {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl CheckerSlot {
    async fn stop(self, url: &str) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(url = %url, error = %e, "Checker task ended abnormally");
        }
    }
}

/// Registry of running checkers, keyed by URL.
#[derive(Default)]
pub struct Monitor {
    checkers: Mutex<HashMap<String, CheckerSlot>>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `checker` on the runtime. A checker already running for the
    /// same URL is cancelled first.
    pub async fn spawn(&self, checker: Checker) {
        let url = checker.record().url().to_string();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(checker.run(shutdown_rx));

        let previous = self.checkers.lock().await.insert(
            url.clone(),
            CheckerSlot {
                handle,
                shutdown_tx,
            },
        );
        if let Some(old) = previous {
            old.stop(&url).await;
        }

        tracing::debug!(url = %url, "Checker spawned");
    }

    /// Cancel the checker for `url`. Returns false if none was running.
    pub async fn stop(&self, url: &str) -> bool {
        let slot = self.checkers.lock().await.remove(url);
        match slot {
            Some(slot) => {
                slot.stop(url).await;
                tracing::info!(url = %url, "Checker stopped");
                true
            }
            None => false,
        }
    }

    /// Cancel every checker and wait for the tasks to finish.
    pub async fn stop_all(&self) {
        let slots: Vec<(String, CheckerSlot)> = self.checkers.lock().await.drain().collect();
        let count = slots.len();
        for (url, slot) in slots {
            slot.stop(&url).await;
        }
        tracing::debug!(count, "All checkers stopped");
    }

    /// URLs with a running checker.
    pub async fn active(&self) -> Vec<String> {
        self.checkers.lock().await.keys().cloned().collect()
    }
}
