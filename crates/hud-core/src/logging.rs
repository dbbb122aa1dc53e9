//! Tracing subscriber bootstrap.
//!
//! Logs never go to stdout: the stdio bridge owns it.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LogConfig;

/// Environment variable that overrides `log.filter`.
pub const LOG_ENV: &str = "HUD_LOG";

/// Builds the filter: `HUD_LOG` wins over the configured directive.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Installs the global subscriber.
///
/// When `log.file` is set, returns the appender guard; keep it alive until
/// exit or buffered lines are lost.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = match &config.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            (writer, Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(BoxMakeWriter, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(writer), guard))
}
