//! Configuration validation.
//!
//! Semantic checks on the command line that clap cannot express on its own.

use crate::config::cli::Cli;
use crate::config::ConfigError;

/// Reject flag combinations that make no sense together.
pub fn validate_cli(cli: &Cli) -> Result<(), ConfigError> {
    if cli.no_window && cli.dashboard_port.is_none() {
        return Err(ConfigError::NoWindowWithoutDashboard);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_no_window_requires_dashboard() {
        let cli = Cli::try_parse_from(["uptimer", "--nw"]).unwrap();
        assert!(matches!(
            validate_cli(&cli),
            Err(ConfigError::NoWindowWithoutDashboard)
        ));

        let cli = Cli::try_parse_from(["uptimer", "--nw", "--dp", "8080"]).unwrap();
        assert!(validate_cli(&cli).is_ok());
    }
}
