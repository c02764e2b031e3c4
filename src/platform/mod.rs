//! Platform-conditional side effects.
//!
//! # Responsibilities
//! - Audible alerting on failures (`alert.rs`)
//! - Detaching from the console window when running headless (`console.rs`)
//!
//! # Design Decisions
//! - The monitoring core only sees the `Alerter` trait; it never makes OS calls
//! - Every capability has a no-op fallback where the platform lacks support

pub mod alert;
pub mod console;

pub use alert::{Alerter, SilentAlerter, TerminalBell};
