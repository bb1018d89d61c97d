use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

use crate::utils::create_private_dir;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    OpenLogFile {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to initialize tracing subscriber: {0}")]
    Subscriber(String),
}

/// Send `tracing` output to an append-only log file.
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
pub fn init_tracing(log_path: &Path, level: &str) -> Result<(), LoggingError> {
    let open_error = |source| LoggingError::OpenLogFile {
        path: log_path.display().to_string(),
        source,
    };

    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_private_dir(parent).map_err(open_error)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(open_error)?;

    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    Ok(())
}

/// Like `init_tracing`, but a log file that can't be opened only disables
/// logging. Returns whether logging is active.
pub fn init_tracing_or_disable(log_path: &Path, level: &str) -> bool {
    match init_tracing(log_path, level) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            false
        }
    }
}
