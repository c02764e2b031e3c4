//! Dashboard and JSON API server.
//!
//! # Responsibilities
//! - Serve `GET /` (HTML dashboard) and `GET /api/status` (JSON)
//! - Build a fresh store snapshot per request
//! - Stop on the shared shutdown signal
//!
//! # Design Decisions
//! - A bind failure ends only this task; checkers keep running

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::Html, routing::get, Json, Router};
use chrono::{Local, Utc};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::lifecycle::{format_uptime, ProcessClock};
use crate::monitor::store::StatsStore;
use crate::report::api::StatusResponse;
use crate::report::dashboard::{self, DashboardPage};
use crate::report::view::endpoint_views;

/// Per-request deadline for the reporting endpoints.
const HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StatsStore>,
    pub clock: ProcessClock,
}

/// Build the reporting router.
#[allow(deprecated)]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/status", get(api_status_handler))
        .with_state(state)
        .layer(TimeoutLayer::new(HANDLER_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

async fn dashboard_handler(State(state): State<AppState>) -> Html<String> {
    let page = DashboardPage {
        started_at: state
            .clock
            .started_at()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        uptime: format_uptime(state.clock.uptime()),
        endpoints: endpoint_views(&state.store, Utc::now()),
    };
    Html(dashboard::render(&page))
}

async fn api_status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse::collect(&state.store, &state.clock))
}

/// HTTP server for the dashboard and API.
pub struct DashboardServer {
    addr: SocketAddr,
    state: AppState,
}

impl DashboardServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// Spawn the server. Errors are logged; they never reach the caller.
    pub fn spawn<S>(self, shutdown: S) -> JoinHandle<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            if let Err(e) = self.run(shutdown).await {
                tracing::error!(error = %e, "Dashboard server failed; monitoring continues without it");
            }
        })
    }

    /// Bind and serve until `shutdown` fires.
    pub async fn run<S>(self, shutdown: S) -> Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(
            address = %local_addr,
            "Dashboard running at http://localhost:{}",
            local_addr.port()
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Dashboard server stopped");
        Ok(())
    }
}
