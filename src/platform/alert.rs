//! Alert side effect fired on failed checks and expiring certificates.

use std::io::Write;
use std::sync::Arc;

/// Capability invoked by checkers whenever an operator should be alerted.
pub trait Alerter: Send + Sync + std::fmt::Debug {
    fn alert(&self);
}

/// Does nothing. Used when sound alerts are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlerter;

impl Alerter for SilentAlerter {
    fn alert(&self) {}
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Alerter for TerminalBell {
    fn alert(&self) {
        let mut err = std::io::stderr().lock();
        if let Err(e) = err.write_all(b"\x07").and_then(|_| err.flush()) {
            tracing::debug!(error = %e, "Failed to ring terminal bell");
        }
    }
}

/// Pick the alerter matching the `--sound-alert` flag.
pub fn from_flag(sound_alert: bool) -> Arc<dyn Alerter> {
    if sound_alert {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentAlerter)
    }
}
