//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ProcessClock::start → load config → register endpoints → spawn checkers
//!     → spawn dashboard (optional)
//!
//! Shutdown (signals.rs → shutdown.rs):
//!     SIGINT/SIGTERM → stop dashboard → stop checkers → print summary → exit 0
//! ```

pub mod clock;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use clock::{format_uptime, ProcessClock};
pub use shutdown::Shutdown;
pub use startup::{start, Running, StartupError};
