//! Structured logging to the plugin's debug log.

use std::sync::{Arc, Mutex};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// File name of the debug log inside the log directory.
pub const LOG_FILE_NAME: &str = "debug.log";

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Result type for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the log subscriber.
#[derive(Debug, Clone, Error)]
pub enum TelemetryError {
    /// The log directory or file could not be opened.
    #[error("failed to open log file in {dir}: {source}")]
    Open {
        /// Log directory.
        dir: Utf8PathBuf,
        /// Underlying IO error.
        source: Arc<std::io::Error>,
    },

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInitialised(String),
}

/// Installs a global subscriber appending to `<log_dir>/debug.log`.
///
/// The filter is read from `RUST_LOG`, defaulting to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns [`TelemetryError::Open`] when the log file cannot be opened and
/// [`TelemetryError::AlreadyInitialised`] when a subscriber already exists.
pub fn init_file_logging(log_dir: &Utf8Path) -> TelemetryResult<()> {
    let open_error = |error: std::io::Error| TelemetryError::Open {
        dir: log_dir.to_owned(),
        source: Arc::new(error),
    };
    Dir::create_ambient_dir_all(log_dir, ambient_authority()).map_err(open_error)?;
    let dir = Dir::open_ambient_dir(log_dir, ambient_authority()).map_err(open_error)?;
    let log_file = dir
        .open_with(LOG_FILE_NAME, OpenOptions::new().create(true).append(true))
        .map_err(open_error)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file.into_std())),
        )
        .try_init()
        .map_err(|error| TelemetryError::AlreadyInitialised(error.to_string()))
}
