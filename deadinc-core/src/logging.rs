//! Structured logging using **tracing**.
//!
//! Internal decisions (skipped includes, cache hits, extractor runs) are
//! emitted as tracing events. User-facing progress and findings go through
//! [`crate::check::CheckOutput`] instead, so stdout stays readable.

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing collector (subscriber).
///
/// Call *once* at startup. Events are written as JSON to stderr.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=deadinc_core=debug`).
///   When unset, `verbose` selects `deadinc_core=debug`, otherwise only
///   errors are logged.
pub fn init_structured_logging(verbose: bool) {
    let default_directive = if verbose { "deadinc_core=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs an error event.
pub fn log_error(message: &str) {
    error!(detail = %message);
}
