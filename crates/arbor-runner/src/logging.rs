use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;

pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Flushes buffered log lines when dropped.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// JSON logs for a match, written to `telemetry.jsonl` in the summary's
/// directory. Returns the log path alongside the guard.
pub fn log_beside(summary: &Path, level: Level) -> Result<(LoggingGuard, PathBuf)> {
    let dir = summary
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    let path = dir.join(TELEMETRY_FILE);
    let file = File::create(&path)
        .with_context(|| format!("creating telemetry file at {}", path.display()))?;
    Ok((install(file, level), path))
}

/// JSON logs on stderr; stdout carries protocol replies only.
pub fn log_to_stderr(level: Level) -> LoggingGuard {
    install(io::stderr(), level)
}

/// `RUST_LOG` overrides `level` when set. A subscriber installed earlier
/// keeps receiving events.
fn install<W: io::Write + Send + 'static>(sink: W, level: Level) -> LoggingGuard {
    let (writer, worker) = NonBlockingBuilder::default().lossy(false).finish(sink);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_current_span(false)
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init();
    LoggingGuard { _worker: worker }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_lands_next_to_the_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("run").join("summary.md");
        let (guard, path) = log_beside(&summary, Level::INFO).unwrap();
        drop(guard);

        assert_eq!(path, dir.path().join("run").join(TELEMETRY_FILE));
        assert!(path.is_file());
    }
}
