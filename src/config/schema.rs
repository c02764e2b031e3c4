//! Configuration schema definitions.
//!
//! The command line and the endpoints file are merged into a single
//! `MonitorConfig` before any checker starts.

use std::net::SocketAddr;
use std::time::Duration;

/// Interval used when the endpoints file does not start with one.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Status code expected when an endpoint line omits it.
pub const DEFAULT_EXPECTED_CODE: &str = "200";

/// Root configuration for the monitor.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    /// Seconds between checks of a healthy endpoint (shared by all endpoints).
    pub interval_secs: u64,

    /// Endpoints to monitor, in file order.
    pub endpoints: Vec<EndpointConfig>,

    /// Optional console output and alerting.
    pub reporting: ReportingConfig,

    /// Dashboard and JSON API settings.
    pub dashboard: DashboardConfig,

    /// Network deadlines.
    pub timeouts: TimeoutConfig,

    /// Detach from the console window.
    pub no_window: bool,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// One monitored endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Full URL; also the endpoint's identity.
    pub url: String,

    /// Status code (as text) a healthy response carries.
    pub expected_code: String,
}

/// Console verbosity and alert side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportingConfig {
    /// Log successful checks and valid certificates.
    pub show_ok: bool,

    /// Append latency to check log lines.
    pub show_response_time: bool,

    /// Ring the terminal bell on failures and expiring certificates.
    pub sound_alert: bool,
}

/// Dashboard server configuration.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    /// Port to serve on; `None` disables the dashboard.
    pub port: Option<u16>,
}

impl DashboardConfig {
    /// Address to bind, if enabled.
    pub fn bind_address(&self) -> Option<SocketAddr> {
        self.port.map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    }
}

/// Timeout configuration.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Total time allowed for one check request, in seconds.
    pub request_secs: u64,

    /// Time allowed for the certificate handshake, in seconds.
    pub handshake_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            handshake_secs: 30,
        }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn handshake(&self) -> Duration {
        Duration::from_secs(self.handshake_secs)
    }
}
