//! HTML dashboard rendering.
//!
//! The page is the askama template `templates/dashboard.html`, filled from a
//! `DashboardPage` the server handler builds from a fresh store snapshot on
//! every request. Template output is HTML-escaped.

use askama::Template;

use crate::report::view::EndpointView;

/// Seconds between automatic page reloads.
pub const REFRESH_SECS: u32 = 5;

/// Everything the page shows.
#[derive(Debug, Clone, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    /// Local `YYYY-MM-DD HH:MM:SS` the monitor started.
    pub started_at: String,
    pub uptime: String,
    pub endpoints: Vec<EndpointView>,
}

impl DashboardPage {
    pub fn refresh_secs(&self) -> u32 {
        REFRESH_SECS
    }
}

/// Render the full HTML document.
pub fn render(page: &DashboardPage) -> String {
    page.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Dashboard template failed to render");
        format!("<pre>Template error: {e}</pre>")
    })
}
