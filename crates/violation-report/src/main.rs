mod args;
mod commands;
mod conf;
mod error;
mod render;
mod runtime;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use args::{Cli, Command};
use conf::ReportConfig;
use runtime::boot;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Phase 1: Basic tracing so we can log during config loading
    // Uses set_default (thread-local) so it can be replaced by Phase 2's global subscriber
    let basic_tracing = boot::init_tracing_basic();

    info!("Starting violation-report v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ReportConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    config.apply_overrides(&cli.overrides());

    config
        .validate()
        .map_err(error::ReportError::Config)
        .context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with config (format, level, output)
    drop(basic_tracing);
    boot::init_logging(&config.logging).context("Failed to initialise logging")?;

    info!("Configuration loaded successfully");
    info!("Root directory: {}", config.root_dir.display());

    let generated = commands::run(&cli.command, &config)
        .with_context(|| format!("{} command failed", command_name(&cli.command)))?;

    println!("File generated: {}", generated.display());
    if cli.command == Command::Html {
        println!("Open it in a browser to view the report.");
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Locate { .. } => "locate",
        Command::Html => "html",
        Command::Dump => "dump",
    }
}
