//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{DashboardConfig, ReportingConfig};

#[derive(Debug, Parser)]
#[command(name = "uptimer")]
#[command(about = "Monitor HTTP(S) endpoints and report their uptime", long_about = None)]
pub struct Cli {
    /// Show successful checks
    #[arg(long = "show-ok", visible_alias = "so")]
    pub show_ok: bool,

    /// Show response time next to each check
    #[arg(long = "show-response-time", visible_alias = "rt")]
    pub show_response_time: bool,

    /// Sound an alert on failure
    #[arg(long = "sound-alert", visible_alias = "sa")]
    pub sound_alert: bool,

    /// Serve the dashboard and JSON API on this port (e.g. 8080)
    #[arg(long = "dashboard-port", visible_alias = "dp", value_name = "PORT")]
    pub dashboard_port: Option<u16>,

    /// Hide the console window (requires --dashboard-port)
    #[arg(long = "no-window", visible_alias = "nw")]
    pub no_window: bool,

    /// Endpoints file: optional interval on the first line, then one URL per line
    #[arg(short = 'f', long = "endpoints", default_value = "endpoints.txt")]
    pub endpoints: PathBuf,
}

impl Cli {
    pub fn reporting(&self) -> ReportingConfig {
        ReportingConfig {
            show_ok: self.show_ok,
            show_response_time: self.show_response_time,
            sound_alert: self.sound_alert,
        }
    }

    pub fn dashboard(&self) -> DashboardConfig {
        DashboardConfig {
            port: self.dashboard_port,
        }
    }
}
