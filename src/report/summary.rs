//! Shutdown summary printed to stdout on exit.

use std::fmt::Write;
use std::time::Duration;

use chrono::Utc;
use nu_ansi_term::Color;

use crate::lifecycle::format_uptime;
use crate::monitor::store::StatsStore;
use crate::report::view::endpoint_views;

const RULE_TOP: &str = "========== SHUTDOWN SUMMARY ==========";
const RULE_BOTTOM: &str = "======================================";

/// Render the summary from one snapshot of the store.
///
/// With `ansi` set, the status reads green for `UP` and red for `DOWN`.
pub fn render_summary(store: &StatsStore, uptime: Duration, ansi: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", RULE_TOP);
    let _ = writeln!(out, "Total uptime: {}\n", format_uptime(uptime));

    for ep in endpoint_views(store, Utc::now()) {
        let status = match (ansi, ep.is_up) {
            (false, _) => ep.status_text().to_string(),
            (true, true) => Color::Green.paint(ep.status_text()).to_string(),
            (true, false) => Color::Red.paint(ep.status_text()).to_string(),
        };
        let _ = writeln!(out, "{}", ep.url);
        let _ = writeln!(
            out,
            "  Status: {} | Uptime: {:.2}% | Checks: {}/{} | Consec Failures: {}",
            status,
            ep.uptime_percent,
            ep.successful_checks,
            ep.total_checks,
            ep.consecutive_failures
        );
        if let Some(cert) = &ep.cert {
            let _ = writeln!(out, "  SSL Cert Expires: {}", cert.expiry_date);
        }
    }

    let _ = writeln!(out, "{}", RULE_BOTTOM);
    out
}
