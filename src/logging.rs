//! Logging setup
//!
//! The terminal belongs to the TUI, so log output goes to `hubseek.log`
//! beside the executable (or in the configured directory). Verbosity comes
//! from `HUBSEEK_LOG`, using `EnvFilter` directive syntax.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "hubseek.log";
pub const LOG_ENV_VAR: &str = "HUBSEEK_LOG";
const DEFAULT_DIRECTIVE: &str = "hubseek=info";

/// Default log directory (same directory as executable)
pub fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process so buffered lines get flushed on exit.
///
/// An unusable log directory is not fatal: a note goes to stderr, no
/// subscriber is installed and `None` is returned.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!(
                "[HubSeek] Logging disabled, cannot write to {}: {}",
                dir.display(),
                e
            );
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    if installed.is_err() {
        eprintln!("[HubSeek] A tracing subscriber was already installed");
    }

    Some(guard)
}
