//! uptimer
//!
//! Probes every endpoint listed in the endpoints file and reports their
//! health on the console, an optional web dashboard and a JSON API.
//!
//! # Architecture Overview
//!
//! ```text
//!   endpoints.txt ──▶ config ──▶ StatsStore ◀──────────── report
//!                                   ▲  ▲               (dashboard, /api/status,
//!                                   │  │                shutdown summary)
//!                         ┌─────────┘  └─────────┐
//!                     Checker (url 1)  …  Checker (url N)
//!                     cert once → GET → record → backoff sleep → GET …
//! ```

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;

use uptimer::config::{self, Cli};
use uptimer::lifecycle::{self, signals, ProcessClock};
use uptimer::observability::init_logging;
use uptimer::platform::console;

#[tokio::main]
async fn main() -> ExitCode {
    let clock = ProcessClock::start();
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(1);
        }
    };

    if config.no_window {
        console::hide_console_window();
    }

    let running = match lifecycle::start(&config, clock).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(1);
        }
    };

    tracing::info!("Listening...");
    signals::wait_for_termination().await;

    let summary = running.stop(std::io::stdout().is_terminal()).await;
    print!("{}", summary);
    ExitCode::SUCCESS
}
