//! CLI definitions for darkscan.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use darkscan_protocols::ScanMode;

/// darkscan CLI.
#[derive(Parser)]
#[command(name = "darkscan")]
#[command(about = "Dark pattern detection engine for live document trees")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.darkscan/config.toml when present)
    #[arg(short, long, global = true, env = "DARKSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scan a page description once and print the report as JSON
    Scan {
        /// Page description (JSON)
        page: PathBuf,

        /// Which tiers to run: text, image or both
        #[arg(long, default_value = "both")]
        mode: ScanMode,

        /// Skip the settle delay before the first snapshot
        #[arg(long)]
        no_wait: bool,
    },

    /// Run the host query interface and the scheduler
    Serve {
        /// Page description to load at startup
        #[arg(long)]
        page: Option<PathBuf>,

        /// Override server.host
        #[arg(long)]
        host: Option<String>,

        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// List the pattern table
    Patterns {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate the configuration and the pattern table
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from(["darkscan", "scan", "page.json", "--mode", "text", "--no-wait"])
            .unwrap();
        match cli.command {
            Commands::Scan { page, mode, no_wait } => {
                assert_eq!(page, PathBuf::from("page.json"));
                assert_eq!(mode, ScanMode::Text);
                assert!(no_wait);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_defaults_to_both() {
        let cli = Cli::try_parse_from(["darkscan", "scan", "page.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Scan { mode: ScanMode::Both, no_wait: false, .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["darkscan", "scan", "page.json", "--mode", "audio"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["darkscan", "validate", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Validate));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["darkscan", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { page, host, port } => {
                assert!(page.is_none());
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }
}
