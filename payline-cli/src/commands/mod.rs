//! CLI command implementations

pub mod logs;
pub mod pin;
pub mod price;
pub mod records;
pub mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use payline_core::{EntryPoint, LogEvent, LoggingService, PaylineContext};
use tracing::debug;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.record(event);
    }
}

/// Get the data directory from PAYLINE_DIR or default to ~/.payline
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PAYLINE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".payline"))
        .context("Could not find home directory; set PAYLINE_DIR")
}

/// Get or create the Payline context
pub fn get_context(records: Option<&Path>) -> Result<PaylineContext> {
    let data_dir = get_data_dir()?;
    debug!(data_dir = %data_dir.display(), records = ?records, "opening context");
    PaylineContext::new(&data_dir, records, EntryPoint::Cli)
        .context("Failed to initialize payline context")
}
