//! Startup orchestration.
//!
//! # Responsibilities
//! - Register every configured endpoint in the store
//! - Spawn one checker per endpoint, then the dashboard if enabled
//! - Tear everything down in reverse order on shutdown

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::MonitorConfig;
use crate::lifecycle::{ProcessClock, Shutdown};
use crate::monitor::cert::{CertError, CertInspector};
use crate::monitor::checker::{build_client, Checker, Verbosity};
use crate::monitor::{Monitor, StatsStore};
use crate::platform::alert;
use crate::report::{render_summary, AppState, DashboardServer};

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to build TLS client: {0}")]
    Tls(#[from] CertError),
}

/// Everything running after a successful start.
pub struct Running {
    pub store: Arc<StatsStore>,
    pub clock: ProcessClock,
    monitor: Monitor,
    shutdown: Shutdown,
    dashboard: Option<JoinHandle<()>>,
}

/// Register endpoints, spawn checkers and the optional dashboard.
pub async fn start(config: &MonitorConfig, clock: ProcessClock) -> Result<Running, StartupError> {
    let store = Arc::new(StatsStore::new());
    let monitor = Monitor::new();
    let shutdown = Shutdown::new();

    let client = build_client(config.timeouts.request())?;
    let inspector = CertInspector::new()?.with_timeout(config.timeouts.handshake());
    let alerter = alert::from_flag(config.reporting.sound_alert);
    let verbosity = Verbosity {
        show_ok: config.reporting.show_ok,
        show_response_time: config.reporting.show_response_time,
    };

    if config.endpoints.is_empty() {
        tracing::warn!("No endpoints configured");
    }

    for endpoint in &config.endpoints {
        let record = match store.register(endpoint.url.as_str(), endpoint.expected_code.as_str()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping endpoint");
                continue;
            }
        };
        let checker = Checker::new(record, client.clone(), config.interval(), alerter.clone())
            .with_verbosity(verbosity)
            .with_cert_inspector(inspector.clone());
        monitor.spawn(checker).await;
    }

    tracing::info!(
        endpoints = store.len(),
        interval_secs = config.interval_secs,
        "Checkers started"
    );

    let dashboard = config.dashboard.bind_address().map(|addr| {
        let state = AppState {
            store: store.clone(),
            clock,
        };
        DashboardServer::new(addr, state).spawn(shutdown.signalled())
    });

    Ok(Running {
        store,
        clock,
        monitor,
        shutdown,
        dashboard,
    })
}

impl Running {
    /// Stop the dashboard and all checkers, then render the shutdown summary
    /// (ANSI-colored when `ansi` is set).
    pub async fn stop(self, ansi: bool) -> String {
        let notified = self.shutdown.trigger();
        tracing::debug!(notified, "Shutdown triggered");
        if let Some(handle) = self.dashboard {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Dashboard task ended abnormally");
            }
        }
        self.monitor.stop_all().await;

        render_summary(&self.store, self.clock.uptime(), ansi)
    }
}
