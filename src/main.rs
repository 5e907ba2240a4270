//! darkscan - dark pattern detection engine
//!
//! Main entry point for the darkscan CLI and server.

mod cli;
mod register;
mod server;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::{error, warn};

use darkscan_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::register::build_rules;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    server::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Scan {
            page,
            mode,
            no_wait,
        } => {
            check_config(&config)?;
            let report = server::run_scan(&config, &page, mode, !no_wait).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Serve { page, host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            check_config(&config)?;
            server::run_server(config, page).await?;
        }
        Commands::Patterns { format } => list_patterns(&config, format)?,
        Commands::Validate => validate(&config)?,
    }

    Ok(())
}

/// Log warnings and refuse to start on errors.
fn check_config(config: &Config) -> Result<()> {
    let warnings = ConfigValidator::validate(config)?.into_result().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    for warning in warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(())
}

fn list_patterns(config: &Config, format: OutputFormat) -> Result<()> {
    let rules = build_rules(config)?;
    match format {
        OutputFormat::Json => {
            let table: Vec<_> = rules
                .patterns()
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "name": p.name,
                        "infoUrl": p.info_url,
                        "info": p.info,
                        "languages": p.languages,
                        "detectors": p.detectors.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        OutputFormat::Table => {
            println!("{:<20} {:<22} {:<10} DETECTORS", "ID", "NAME", "LANGUAGES");
            for p in rules.patterns() {
                println!(
                    "{:<20} {:<22} {:<10} {}",
                    p.id.as_str(),
                    p.name,
                    p.languages.join(","),
                    p.detectors.len()
                );
            }
        }
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    let rules = build_rules(config);
    if let Ok(rules) = &rules {
        println!("pattern table: {} patterns", rules.patterns().len());
    }

    if !result.is_valid() {
        bail!("configuration has {} error(s)", result.errors.len());
    }
    rules?;
    println!("configuration is valid");
    Ok(())
}
