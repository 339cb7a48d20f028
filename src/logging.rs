//! File logging setup.
//!
//! The terminal belongs to the user interface while the program runs, so log records go to a file
//! instead of standard output or standard error.

use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr as _};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Filter applied when `RUST_LOG` is unset or unparsable.
pub(crate) const DEFAULT_FILTER: &str = "pathgrid=info";

/// Prefix of the log file name.
const LOG_FILE_PREFIX: &str = "pathgrid";

/// Installs the global `tracing` subscriber, writing to a daily log file under `log_dir`.
///
/// The directory is created when missing. Verbosity follows `RUST_LOG` and falls back to
/// informational records from this crate.
///
/// # Errors
///
/// This function returns an error if the directory or the log file cannot be created, or if a
/// global subscriber is already installed.
pub fn init(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .wrap_err("failed to open log file")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(appender).with_ansi(false))
        .try_init()
        .wrap_err("failed to install the log subscriber")?;

    Ok(())
}
