//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// Generate calendar events from reservation emails.
#[derive(Debug, Parser)]
#[command(name = "eml2cal", version, about)]
pub struct Cli {
    /// Path to the config file to use.
    #[arg(long, short, env = "EML2CAL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short = 'v')]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_flag() {
        let cli = Cli::parse_from(["eml2cal", "--config", "/tmp/eml2cal.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/eml2cal.toml")));
        assert!(!cli.debug);
    }

    #[test]
    fn parses_debug_flag() {
        let cli = Cli::parse_from(["eml2cal", "-v"]);
        assert!(cli.debug);
    }
}
