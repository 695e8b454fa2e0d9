//! Command execution. Every command reads and parses all of its inputs
//! before touching the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use monitor_log::{read_log, resolve, MonitorLog, ViolationSummary};
use tracing::info;

use crate::args::Command;
use crate::conf::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::render;

/// Run `command` and return the path of the file it generated.
pub fn run(command: &Command, config: &ReportConfig) -> ReportResult<PathBuf> {
    match command {
        Command::Locate { .. } => locate(config),
        Command::Html => html(config),
        Command::Dump => dump(config),
    }
}

/// Summary + log → per-violation source locations.
pub fn locate(config: &ReportConfig) -> ReportResult<PathBuf> {
    let summary_path = config.violations_path();
    info!("Loading violation summary from: {}", summary_path.display());
    let summary = ViolationSummary::load(&summary_path)?;
    let log = scan(config)?;

    let resolved = resolve(&summary, &log);
    let contents = render::render_locations(&resolved)?;
    write_output(config, &config.locations_file_name, &contents)
}

pub fn html(config: &ReportConfig) -> ReportResult<PathBuf> {
    let log = scan(config)?;
    let contents = render::render_report(&log, &config.report_title);
    write_output(config, &config.html_file_name, &contents)
}

pub fn dump(config: &ReportConfig) -> ReportResult<PathBuf> {
    let log = scan(config)?;
    let contents = render::render_monitor_log(&log)?;
    write_output(config, &config.dump_file_name, &contents)
}

fn scan(config: &ReportConfig) -> ReportResult<MonitorLog> {
    let log_path = config.log_path();
    info!("Scanning monitor log: {}", log_path.display());
    let log = read_log(&log_path)?;
    info!(
        violations = log.violations.len(),
        exclusions = log.exclusions.len(),
        ignored_static_inits = log.ignored_static_inits.len(),
        lines = log.stats.lines_scanned,
        dropped = log.stats.dropped_lines(),
        "Monitor log parsed"
    );
    Ok(log)
}

fn write_output(config: &ReportConfig, file_name: &str, contents: &str) -> ReportResult<PathBuf> {
    create_dir(&config.output_dir_path())?;

    let path = config.output_path(file_name);
    fs::write(&path, contents).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(bytes = contents.len(), "Wrote {}", path.display());
    Ok(path)
}

fn create_dir(dir: &Path) -> ReportResult<()> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
