//! Reporting surfaces.
//!
//! # Data Flow
//! ```text
//! StatsStore::for_each (one record lock at a time)
//!     → view.rs (uptime %, health bucket, cert warning)
//!     → dashboard.rs (HTML)      ← GET /
//!     → api.rs (JSON)            ← GET /api/status
//!     → summary.rs (stdout)      ← process exit
//! ```
//!
//! All surfaces are read-only: nothing here writes to the store.

pub mod api;
pub mod dashboard;
pub mod server;
pub mod summary;
pub mod view;

pub use api::StatusResponse;
pub use server::{AppState, DashboardServer};
pub use summary::render_summary;
