//! Observability subsystem.
//!
//! Every check outcome, certificate verdict and lifecycle transition is a
//! `tracing` event with structured fields (`url`, `status`, `failures`, ...).
//! The console subscriber renders them as timestamped, colored lines.

pub mod logging;

pub use logging::init_logging;
