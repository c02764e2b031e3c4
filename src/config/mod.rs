//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → cli.rs (clap parse)
//!     → validation.rs (flag combinations)
//! endpoints file
//!     → loader.rs (interval line, endpoint lines)
//!     → MonitorConfig (immutable, shared by reference)
//! ```
//!
//! # Design Decisions
//! - Malformed endpoint lines are skipped with a warning, never fatal
//! - Only an unreadable/uncreatable file or conflicting flags abort startup
//! - Duplicate URLs are dropped here so the store never sees them twice

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

use std::path::PathBuf;

pub use cli::Cli;
pub use loader::{load_endpoints, parse_endpoints, EndpointsFile};
pub use schema::{DashboardConfig, EndpointConfig, MonitorConfig, ReportingConfig, TimeoutConfig};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{} file was created! Fill out the file to use the program", .0.display())]
    Created(PathBuf),

    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("-nw flag requires -dp flag to be set")]
    NoWindowWithoutDashboard,
}

/// Validate the command line and load the endpoints file it names.
pub fn load(cli: &Cli) -> Result<MonitorConfig, ConfigError> {
    validation::validate_cli(cli)?;
    let file = load_endpoints(&cli.endpoints)?;

    Ok(MonitorConfig {
        interval_secs: file.interval_secs,
        endpoints: file.endpoints,
        reporting: cli.reporting(),
        dashboard: cli.dashboard(),
        timeouts: TimeoutConfig::default(),
        no_window: cli.no_window,
    })
}
