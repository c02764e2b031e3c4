//! Uptime monitor for HTTP(S) endpoints.

pub mod config;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod platform;
pub mod report;

pub use config::MonitorConfig;
pub use lifecycle::{ProcessClock, Running, Shutdown};
pub use monitor::{Checker, Monitor, StatsStore};
