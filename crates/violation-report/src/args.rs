//! CLI argument definitions using clap
//!
//! - violation-report locate      # summary + log → violations_simple.json
//! - violation-report html        # log → violations_report.html
//! - violation-report dump        # log → violations_full.json

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::conf::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "violation-report")]
#[command(about = "Turn thread-safety monitor logs into violation reports")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, env = "REPORT_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Base directory that relative input and output paths resolve against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Monitor log to scan
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Directory generated reports are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Attach source locations to an external violation summary (JSON output)
    Locate {
        /// Violation summary document ({"violations": [...]})
        #[arg(long)]
        violations: Option<PathBuf>,
    },

    /// Render the parsed log as a browsable HTML report
    Html,

    /// Write every parsed record as JSON
    Dump,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        let violations_file = match &self.command {
            Command::Locate { violations } => violations.clone(),
            _ => None,
        };
        ConfigOverrides {
            root_dir: self.root.clone(),
            log_file: self.log.clone(),
            violations_file,
            output_dir: self.output_dir.clone(),
        }
    }
}
