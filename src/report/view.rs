//! View models derived from store snapshots.
//!
//! Everything a human-facing surface shows is computed here, so the HTML and
//! console renderers only format strings.

use chrono::{DateTime, Local, Utc};

use crate::monitor::cert::{days_until, CERT_WARN_DAYS};
use crate::monitor::store::{RecordSnapshot, StatsStore};

/// Severity bucket for an uptime percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeHealth {
    /// At least 99%.
    Good,
    /// At least 95%.
    Warn,
    Bad,
}

impl UptimeHealth {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 99.0 {
            UptimeHealth::Good
        } else if percent >= 95.0 {
            UptimeHealth::Warn
        } else {
            UptimeHealth::Bad
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            UptimeHealth::Good => "uptime-good",
            UptimeHealth::Warn => "uptime-warn",
            UptimeHealth::Bad => "uptime-bad",
        }
    }
}

/// Certificate column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertView {
    /// `YYYY-MM-DD`.
    pub expiry_date: String,
    pub days_left: i64,
    /// True when `days_left` is within the warning threshold.
    pub warn: bool,
}

impl CertView {
    pub fn new(expiry: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days_left = days_until(expiry, now);
        Self {
            expiry_date: expiry.format("%Y-%m-%d").to_string(),
            days_left,
            warn: days_left <= CERT_WARN_DAYS,
        }
    }
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointView {
    pub url: String,
    pub is_up: bool,
    pub expected_code: String,
    pub last_status: String,
    pub response_time_ms: u64,
    pub uptime_percent: f64,
    pub uptime_health: UptimeHealth,
    pub total_checks: u64,
    pub successful_checks: u64,
    pub consecutive_failures: u64,
    pub cert: Option<CertView>,
    /// Local `HH:MM:SS` of the last check.
    pub last_check: Option<String>,
}

impl EndpointView {
    pub fn from_snapshot(snap: &RecordSnapshot, now: DateTime<Utc>) -> Self {
        let uptime_percent = snap.uptime_percent();
        Self {
            url: snap.url.clone(),
            is_up: snap.is_up,
            expected_code: snap.expected_code.clone(),
            last_status: snap.last_status.clone(),
            response_time_ms: snap.last_response_time_ms,
            uptime_percent,
            uptime_health: UptimeHealth::from_percent(uptime_percent),
            total_checks: snap.total_checks,
            successful_checks: snap.successful_checks,
            consecutive_failures: snap.consecutive_failures,
            cert: snap.cert_expiry.map(|expiry| CertView::new(expiry, now)),
            last_check: snap
                .last_check
                .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string()),
        }
    }

    /// Uptime with two decimals, e.g. `99.50%`.
    pub fn uptime_text(&self) -> String {
        format!("{:.2}%", self.uptime_percent)
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_up {
            "UP"
        } else {
            "DOWN"
        }
    }

    pub fn status_class(&self) -> &'static str {
        if self.is_up {
            "up"
        } else {
            "down"
        }
    }
}

/// Snapshot the store and build one view per endpoint.
pub fn endpoint_views(store: &StatsStore, now: DateTime<Utc>) -> Vec<EndpointView> {
    let mut views = Vec::with_capacity(store.len());
    store.for_each(|snap| views.push(EndpointView::from_snapshot(&snap, now)));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_uptime_buckets() {
        assert_eq!(UptimeHealth::from_percent(100.0), UptimeHealth::Good);
        assert_eq!(UptimeHealth::from_percent(99.0), UptimeHealth::Good);
        assert_eq!(UptimeHealth::from_percent(98.99), UptimeHealth::Warn);
        assert_eq!(UptimeHealth::from_percent(95.0), UptimeHealth::Warn);
        assert_eq!(UptimeHealth::from_percent(94.9), UptimeHealth::Bad);
        assert_eq!(UptimeHealth::from_percent(0.0), UptimeHealth::Bad);
    }

    #[test]
    fn test_cert_warning_flag() {
        let now = Utc::now();
        assert!(CertView::new(now + chrono::Duration::days(10), now).warn);
        assert!(!CertView::new(now + chrono::Duration::days(90), now).warn);
    }

    #[test]
    fn test_view_from_store() {
        let store = StatsStore::new();
        let rec = store.register("https://x/", "200").unwrap();
        let views = endpoint_views(&store, Utc::now());
        assert_eq!(views.len(), 1);
        assert!(views[0].last_check.is_none());
        assert!(views[0].cert.is_none());
        assert_eq!(views[0].status_text(), "UP");

        rec.record_mismatch("503", Duration::from_millis(7));
        let view = &endpoint_views(&store, Utc::now())[0];
        assert_eq!(view.status_class(), "down");
        assert_eq!(view.last_status, "503");
        assert_eq!(view.response_time_ms, 7);
        assert!(view.last_check.is_some());
        assert_eq!(view.uptime_health, UptimeHealth::Bad);
    }
}
