//! JSON status document served at `/api/status`.

use serde::Serialize;

use crate::lifecycle::{format_uptime, ProcessClock};
use crate::monitor::store::{RecordSnapshot, StatsStore};

/// Top-level `/api/status` response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// RFC 3339 process start time.
    pub start_time: String,
    /// Elapsed process uptime, e.g. `1h2m3s`.
    pub uptime: String,
    /// One entry per endpoint, in store iteration order.
    pub endpoints: Vec<RecordSnapshot>,
}

impl StatusResponse {
    pub fn collect(store: &StatsStore, clock: &ProcessClock) -> Self {
        Self {
            start_time: clock.started_at_rfc3339(),
            uptime: format_uptime(clock.uptime()),
            endpoints: store.snapshot(),
        }
    }
}
