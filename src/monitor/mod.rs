//! Endpoint monitoring engine.
//!
//! # Data Flow
//! ```text
//! config (url, expected code, interval)
//!     → store.rs registers an EndpointRecord
//!     → supervisor.rs spawns one checker.rs task per record
//!         → cert.rs (once, https only)
//!         → GET → record outcome → backoff.rs picks the sleep → repeat
//!
//! report/* reads store.rs snapshots; it never writes.
//! ```
//!
//! # Design Decisions
//! - Checkers are independent: no ordering, quota or shared state between them
//! - The only shared mutable state is the store
//! - Transport errors and status mismatches share the same backoff

pub mod backoff;
pub mod cert;
pub mod checker;
pub mod store;
pub mod supervisor;

pub use backoff::Backoff;
pub use cert::{CertInspector, CertVerdict};
pub use checker::{CheckOutcome, Checker, Verbosity};
pub use store::{EndpointRecord, RecordHandle, RecordSnapshot, StatsStore, StoreError};
pub use supervisor::Monitor;
