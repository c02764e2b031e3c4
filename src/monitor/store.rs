//! Concurrent statistics store.
//!
//! # Responsibilities
//! - Own one `EndpointRecord` per monitored URL
//! - Hand out shared handles to checkers (writers) and reporters (readers)
//! - Produce consistent per-record snapshots for reporting
//!
//! # Locking
//! Two levels. The `DashMap` shards guard the shape of the mapping
//! (registration and iteration); every record owns a `Mutex` over its
//! field set. Iteration holds a shard read guard while it copies each record
//! under that record's lock. Checkers only ever take their own record lock,
//! never the mapping, and never across I/O or sleeps.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Serialize, Serializer};

/// Status text recorded when the request never produced a response.
pub const STATUS_ERROR: &str = "ERROR";

/// `last_check` as served before an endpoint's first check.
pub const NEVER_CHECKED: &str = "0001-01-01T00:00:00Z";

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The URL was already registered.
    #[error("endpoint already registered: {0}")]
    Duplicate(String),
}

/// Shared handle to a single endpoint's record.
pub type RecordHandle = Arc<EndpointRecord>;

/// Mutable fields of a record, guarded by the record lock.
#[derive(Debug, Clone)]
struct EndpointStats {
    total_checks: u64,
    successful_checks: u64,
    consecutive_failures: u64,
    last_check: Option<DateTime<Utc>>,
    last_status: String,
    last_response_time: Duration,
    cert_expiry: Option<DateTime<Utc>>,
    is_up: bool,
}

impl Default for EndpointStats {
    fn default() -> Self {
        Self {
            total_checks: 0,
            successful_checks: 0,
            consecutive_failures: 0,
            last_check: None,
            last_status: String::new(),
            last_response_time: Duration::ZERO,
            cert_expiry: None,
            // Nothing has failed yet.
            is_up: true,
        }
    }
}

/// Health record for one monitored URL.
#[derive(Debug)]
pub struct EndpointRecord {
    url: String,
    expected_code: String,
    stats: Mutex<EndpointStats>,
}

impl EndpointRecord {
    fn new(url: String, expected_code: String) -> Self {
        Self {
            url,
            expected_code,
            stats: Mutex::new(EndpointStats::default()),
        }
    }

    /// The URL this record tracks (immutable identity).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The status code a healthy response must carry.
    pub fn expected_code(&self) -> &str {
        &self.expected_code
    }

    fn lock(&self) -> MutexGuard<'_, EndpointStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a response whose status matched the expected code.
    pub fn record_success(&self, status: &str, latency: Duration) {
        let mut stats = self.lock();
        stats.touch(latency);
        stats.successful_checks += 1;
        stats.consecutive_failures = 0;
        stats.is_up = true;
        stats.last_status = status.to_string();
    }

    /// Record a response whose status differed from the expected code.
    ///
    /// Returns the new consecutive failure count.
    pub fn record_mismatch(&self, status: &str, latency: Duration) -> u64 {
        let mut stats = self.lock();
        stats.touch(latency);
        stats.fail(status)
    }

    /// Record a request that failed before a response arrived.
    ///
    /// Returns the new consecutive failure count.
    pub fn record_transport_error(&self, latency: Duration) -> u64 {
        let mut stats = self.lock();
        stats.touch(latency);
        stats.fail(STATUS_ERROR)
    }

    /// Store the leaf certificate expiry observed at startup.
    pub fn set_cert_expiry(&self, expiry: DateTime<Utc>) {
        self.lock().cert_expiry = Some(expiry);
    }

    /// Copy every field under a single acquisition of the record lock.
    pub fn snapshot(&self) -> RecordSnapshot {
        let stats = self.lock().clone();
        RecordSnapshot {
            url: self.url.clone(),
            expected_code: self.expected_code.clone(),
            total_checks: stats.total_checks,
            successful_checks: stats.successful_checks,
            consecutive_failures: stats.consecutive_failures,
            last_check: stats.last_check,
            last_status: stats.last_status,
            last_response_time_ms: stats.last_response_time.as_millis() as u64,
            cert_expiry: stats.cert_expiry,
            is_up: stats.is_up,
        }
    }
}

impl EndpointStats {
    fn touch(&mut self, latency: Duration) {
        self.total_checks += 1;
        self.last_check = Some(Utc::now());
        self.last_response_time = latency;
    }

    fn fail(&mut self, status: &str) -> u64 {
        self.consecutive_failures += 1;
        self.is_up = false;
        self.last_status = status.to_string();
        self.consecutive_failures
    }
}

/// Point-in-time copy of one record. This is also the JSON shape served by
/// `/api/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    pub url: String,
    pub expected_code: String,
    pub total_checks: u64,
    pub successful_checks: u64,
    pub consecutive_failures: u64,
    #[serde(serialize_with = "serialize_last_check")]
    pub last_check: Option<DateTime<Utc>>,
    pub last_status: String,
    pub last_response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_expiry: Option<DateTime<Utc>>,
    pub is_up: bool,
}

/// Always an RFC 3339 string; [`NEVER_CHECKED`] until the first check.
fn serialize_last_check<S>(
    last_check: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match last_check {
        Some(at) => at.serialize(serializer),
        None => serializer.serialize_str(NEVER_CHECKED),
    }
}

impl RecordSnapshot {
    /// Percentage of checks that matched the expected code (0 before any check).
    pub fn uptime_percent(&self) -> f64 {
        if self.total_checks == 0 {
            return 0.0;
        }
        self.successful_checks as f64 / self.total_checks as f64 * 100.0
    }
}

/// Concurrency-safe mapping from URL to its record.
#[derive(Debug, Default)]
pub struct StatsStore {
    records: DashMap<String, RecordHandle>,
}

impl StatsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and insert a record for `url`.
    ///
    /// URLs are literal keys: `http://a/` and `http://a` are distinct.
    pub fn register(
        &self,
        url: impl Into<String>,
        expected_code: impl Into<String>,
    ) -> Result<RecordHandle, StoreError> {
        let url = url.into();
        match self.records.entry(url.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(url)),
            Entry::Vacant(slot) => {
                let record = Arc::new(EndpointRecord::new(url, expected_code.into()));
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    /// Look up a record by URL.
    pub fn get(&self, url: &str) -> Option<RecordHandle> {
        self.records.get(url).map(|r| r.value().clone())
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Visit a snapshot of every record.
    ///
    /// Records are locked one at a time, so different records may reflect
    /// slightly different instants.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(RecordSnapshot),
    {
        for entry in self.records.iter() {
            visitor(entry.value().snapshot());
        }
    }

    /// Collect snapshots of every record, in map iteration order.
    pub fn snapshot(&self) -> Vec<RecordSnapshot> {
        let mut out = Vec::with_capacity(self.records.len());
        self.for_each(|s| out.push(s));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_record_is_up_with_no_checks() {
        let store = StatsStore::new();
        store.register("http://x/ok", "200").unwrap();

        let snap = store.get("http://x/ok").unwrap().snapshot();
        assert_eq!(snap.total_checks, 0);
        assert!(snap.is_up);
        assert_eq!(snap.last_status, "");
        assert!(snap.last_check.is_none());
        assert!(snap.cert_expiry.is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let store = StatsStore::new();
        store.register("http://x/", "200").unwrap();
        assert!(matches!(
            store.register("http://x/", "404"),
            Err(StoreError::Duplicate(_))
        ));
        // Trailing slash is part of the identity.
        store.register("http://x", "200").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_outcomes_update_counters() {
        let store = StatsStore::new();
        let rec = store.register("http://x/", "200").unwrap();

        rec.record_success("200", Duration::from_millis(12));
        assert_eq!(rec.record_mismatch("500", Duration::from_millis(3)), 1);
        assert_eq!(rec.record_transport_error(Duration::from_millis(30)), 2);

        let snap = rec.snapshot();
        assert_eq!(snap.total_checks, 3);
        assert_eq!(snap.successful_checks, 1);
        assert_eq!(snap.consecutive_failures, 2);
        assert_eq!(snap.last_status, STATUS_ERROR);
        assert_eq!(snap.last_response_time_ms, 30);
        assert!(!snap.is_up);

        rec.record_success("200", Duration::from_millis(5));
        let snap = rec.snapshot();
        assert_eq!(snap.consecutive_failures, 0);
        assert!(snap.is_up);
        assert_eq!(snap.last_status, "200");
    }

    #[test]
    fn test_concurrent_writers_keep_invariants() {
        let store = Arc::new(StatsStore::new());
        let mut writers = Vec::new();
        for i in 0..4 {
            let rec = store.register(format!("http://host{}/", i), "200").unwrap();
            writers.push(thread::spawn(move || {
                for n in 0..500 {
                    if n % 3 == 0 {
                        rec.record_mismatch("503", Duration::from_millis(1));
                    } else {
                        rec.record_success("200", Duration::from_millis(1));
                    }
                }
            }));
        }

        let reader = {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    store.for_each(|s| {
                        assert!(s.successful_checks <= s.total_checks);
                        if s.consecutive_failures > 0 {
                            assert!(!s.is_up);
                        }
                    });
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        for snap in store.snapshot() {
            assert_eq!(snap.total_checks, 500);
            assert_eq!(snap.successful_checks, 333);
        }
    }

    #[test]
    fn test_cert_expiry_omitted_from_json_when_unknown() {
        let store = StatsStore::new();
        let rec = store.register("https://x/", "200").unwrap();
        let json = serde_json::to_value(rec.snapshot()).unwrap();
        assert!(json.get("cert_expiry").is_none());
        assert_eq!(json["last_status"], "");
        assert_eq!(json["is_up"], true);

        rec.set_cert_expiry(Utc::now());
        let json = serde_json::to_value(rec.snapshot()).unwrap();
        assert!(json["cert_expiry"].is_string());
    }

    #[test]
    fn test_last_check_is_always_rfc3339() {
        let store = StatsStore::new();
        let rec = store.register("http://x/", "200").unwrap();

        let json = serde_json::to_value(rec.snapshot()).unwrap();
        assert_eq!(json["last_check"], NEVER_CHECKED);
        assert!(DateTime::parse_from_rfc3339(NEVER_CHECKED).is_ok());

        rec.record_success("200", Duration::ZERO);
        let json = serde_json::to_value(rec.snapshot()).unwrap();
        let at = json["last_check"].as_str().expect("last_check is a string");
        assert!(DateTime::parse_from_rfc3339(at).is_ok());
        assert_ne!(at, NEVER_CHECKED);
    }

    #[test]
    fn test_uptime_percent() {
        let store = StatsStore::new();
        let rec = store.register("http://x/", "200").unwrap();
        assert_eq!(rec.snapshot().uptime_percent(), 0.0);
        for _ in 0..3 {
            rec.record_success("200", Duration::ZERO);
        }
        rec.record_mismatch("500", Duration::ZERO);
        assert_eq!(rec.snapshot().uptime_percent(), 75.0);
    }
}
