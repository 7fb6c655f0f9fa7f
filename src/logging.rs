//! File logging via `tracing`.
//!
//! The terminal belongs to the UI, so records go to `notepad.log` through a
//! non-blocking appender. The returned guard must live until exit or
//! buffered records are lost.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

pub const LOG_FILE_NAME: &str = "notepad.log";

/// Build the filter: `RUST_LOG` when set and valid, else `level`, else `info`.
fn filter_for(env_directive: Option<&str>, level: &str) -> EnvFilter {
    env_directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber writing to `<dir>/notepad.log`.
///
/// Returns `None` when a subscriber is already installed.
pub fn init(dir: &Path, level: &str) -> Result<Option<WorkerGuard>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::Logging(format!("{}: {e}", dir.display())))?;

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_for(env.as_deref(), level);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .map_err(|e| AppError::Logging(format!("{}: {e}", dir.join(LOG_FILE_NAME).display())))?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // Already installed; dropping the guard shuts our writer down.
        Err(_) => Ok(None),
    }
}
