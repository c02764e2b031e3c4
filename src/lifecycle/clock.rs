//! Process start time.

use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};

/// Wall-clock and monotonic start of the process, captured once.
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl ProcessClock {
    /// Capture the current instant as the process start.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Start time as RFC 3339 with second precision.
    pub fn started_at_rfc3339(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Time since start, rounded to the nearest second.
    pub fn uptime(&self) -> Duration {
        let elapsed = self.started.elapsed();
        let secs = elapsed.as_secs() + u64::from(elapsed.subsec_millis() >= 500);
        Duration::from_secs(secs)
    }
}

/// Render a duration as `1h2m3s`, `4m0s` or `5s`.
pub fn format_uptime(d: Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, total / 60 % 60, total % 60);
    if h > 0 {
        format!("{}h{}m{}s", h, m, s)
    } else if m > 0 {
        format!("{}m{}s", m, s)
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::ZERO), "0s");
        assert_eq!(format_uptime(Duration::from_secs(59)), "59s");
        assert_eq!(format_uptime(Duration::from_secs(240)), "4m0s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h2m3s");
        assert_eq!(format_uptime(Duration::from_secs(90_000)), "25h0m0s");
    }

    #[test]
    fn test_clock_uptime_starts_near_zero() {
        let clock = ProcessClock::start();
        assert!(clock.uptime() <= Duration::from_secs(1));
        assert!(clock.started_at_rfc3339().ends_with('Z'));
    }
}
