//! Tracing setup: stderr plus a daily rolling log file.

use std::{fs, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "zoom-slack-status.log";

/// Directory the rolling log files are written to.
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("zoom-slack-status").join("logs"))
}

/// Install the global subscriber.
///
/// The filter defaults to `info` and can be overridden with `RUST_LOG`. The
/// returned guard flushes the file writer on drop, so keep it alive for the
/// lifetime of the program. File logging is skipped if the log directory
/// cannot be created.
pub fn init() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_writer = log_dir().and_then(|dir| match fs::create_dir_all(&dir) {
        Ok(()) => Some(tracing_appender::non_blocking(
            tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX),
        )),
        Err(e) => {
            eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            None
        }
    });
    let (file_layer, guard) = match file_writer {
        Some((writer, guard)) => (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
