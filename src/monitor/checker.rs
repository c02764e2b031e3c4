//! Per-endpoint check loop.
//!
//! # Responsibilities
//! - Inspect the TLS certificate once, before the first check
//! - Probe the endpoint with a GET and compare the status code
//! - Record every outcome in the endpoint's record
//! - Decide the next sleep through the backoff policy
//!
//! # State machine
//! ```text
//! Probing → Success → sleep(normal)      → Probing
//! Probing → Failure → sleep(backoff)     → Probing
//! any sleep/probe   → cancelled          → exit
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::watch;

use crate::monitor::backoff::Backoff;
use crate::monitor::cert::{CertInspector, CertVerdict};
use crate::monitor::store::RecordHandle;
use crate::platform::Alerter;

/// Client-wide deadline for a single check.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by every checker.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("uptimer/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Which optional log lines a checker emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbosity {
    /// Log successful checks and healthy certificates.
    pub show_ok: bool,
    /// Append the response time to check log lines.
    pub show_response_time: bool,
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Status matched the expected code.
    Up { status: String },
    /// A response arrived with a different status.
    Mismatch { status: String, failures: u64 },
    /// No response: DNS, connect, TLS or timeout failure.
    Unreachable { error: String, failures: u64 },
}

impl CheckOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, CheckOutcome::Up { .. })
    }
}

/// Drives the probe/record/sleep loop for one endpoint.
pub struct Checker {
    record: RecordHandle,
    client: Client,
    backoff: Backoff,
    alerter: Arc<dyn Alerter>,
    verbosity: Verbosity,
    cert_inspector: Option<CertInspector>,
}

impl Checker {
    /// Create a checker that sleeps `interval` between healthy checks.
    pub fn new(
        record: RecordHandle,
        client: Client,
        interval: Duration,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        Self {
            record,
            client,
            backoff: Backoff::new(interval),
            alerter,
            verbosity: Verbosity::default(),
            cert_inspector: None,
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enable the startup certificate check for `https` endpoints.
    pub fn with_cert_inspector(mut self, inspector: CertInspector) -> Self {
        self.cert_inspector = Some(inspector);
        self
    }

    pub fn record(&self) -> &RecordHandle {
        &self.record
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run until `shutdown` flips to true or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let url = self.record.url().to_string();
        tracing::debug!(url = %url, interval = ?self.backoff.normal(), "Checker starting");

        tokio::select! {
            _ = self.inspect_certificate() => {}
            _ = cancelled(&mut shutdown) => {
                tracing::debug!(url = %url, "Checker cancelled during certificate check");
                return;
            }
        }

        loop {
            let delay = tokio::select! {
                (_, delay) = self.check_once() => delay,
                _ = cancelled(&mut shutdown) => break,
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancelled(&mut shutdown) => break,
            }
        }

        tracing::debug!(url = %url, "Checker stopped");
    }

    /// One-shot certificate check. No-op for plain `http` endpoints or when
    /// no inspector is configured.
    ///
    /// Returns the verdict when the handshake succeeded.
    pub async fn inspect_certificate(&self) -> Option<CertVerdict> {
        let inspector = self.cert_inspector.as_ref()?;
        let url = self.record.url();
        if !url.starts_with("https") {
            return None;
        }

        let expiry = match inspector.inspect(url).await {
            Ok(expiry) => expiry,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "SSL cert check failed");
                return None;
            }
        };
        self.record.set_cert_expiry(expiry);

        let verdict = CertVerdict::evaluate(expiry, Utc::now());
        match verdict {
            CertVerdict::Expiring { days_left } => {
                self.alerter.alert();
                tracing::warn!(
                    url = %url,
                    days_left,
                    expiry = %expiry.format("%Y-%m-%d"),
                    "SSL cert expires in {} days",
                    days_left
                );
            }
            CertVerdict::Valid { days_left } if self.verbosity.show_ok => {
                tracing::info!(url = %url, days_left, "SSL cert valid for {} days", days_left);
            }
            CertVerdict::Valid { .. } => {}
        }
        Some(verdict)
    }

    /// Probe once, record the outcome and return it with the sleep that
    /// should follow.
    pub async fn check_once(&mut self) -> (CheckOutcome, Duration) {
        let url = self.record.url();
        let started = Instant::now();
        let result = self.client.get(url).send().await;
        let latency = started.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let failures = self.record.record_transport_error(latency);
                let delay = self.backoff.on_failure();
                self.alerter.alert();
                tracing::error!(
                    url = %url,
                    failures,
                    retry_in = ?delay,
                    "{} - ERROR: {} (failures: {}, retry in {:?})",
                    url,
                    e,
                    failures,
                    delay
                );
                let outcome = CheckOutcome::Unreachable {
                    error: e.to_string(),
                    failures,
                };
                return (outcome, delay);
            }
        };

        let status = response.status().as_u16().to_string();
        drop(response);
        let rt = self.response_time_suffix(latency);
        let expected = self.record.expected_code();

        if status != expected {
            let failures = self.record.record_mismatch(&status, latency);
            let delay = self.backoff.on_failure();
            self.alerter.alert();
            tracing::error!(
                url = %url,
                status = %status,
                expected = %expected,
                failures,
                retry_in = ?delay,
                "{} HAS RETURNED {} INSTEAD OF {} - POSSIBLE DOWN!!{} (failures: {}, retry in {:?})",
                url,
                status,
                expected,
                rt,
                failures,
                delay
            );
            (CheckOutcome::Mismatch { status, failures }, delay)
        } else {
            self.record.record_success(&status, latency);
            let delay = self.backoff.on_success();
            if self.verbosity.show_ok {
                tracing::info!(url = %url, status = %status, "{} - {} AS EXPECTED{}", url, status, rt);
            }
            (CheckOutcome::Up { status }, delay)
        }
    }

    fn response_time_suffix(&self, latency: Duration) -> String {
        if self.verbosity.show_response_time {
            format!(" [{}ms]", latency.as_millis())
        } else {
            String::new()
        }
    }
}

/// Resolves once the shutdown flag is set or its sender is gone.
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    // wait_for returns Err when the sender is dropped, which also means stop.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
