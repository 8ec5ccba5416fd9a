//! Logging setup
//!
//! The TUI owns the terminal, so interactive runs log to `tourmap.log` in the
//! cache directory. One-shot `--print` runs log to stderr. `RUST_LOG`
//! overrides the configured level in both cases.

use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "tourmap.log";

/// Where the log file goes
///
/// Falls back to the system temp directory when there is no home directory.
pub fn log_path() -> PathBuf {
    ProjectDirs::from("", "", "tourmap")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}

/// `RUST_LOG` if set, otherwise the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Logs to the log file, appending
///
/// # Returns
/// The log file path, or an error if the file cannot be opened
pub fn init_file(level: &str) -> io::Result<PathBuf> {
    let path = log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // A subscriber may already be installed (tests); keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(path)
}

/// Logs to stderr
pub fn init_stderr(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
