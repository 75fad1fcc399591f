//! Logging utilities
//!
//! Provides logging setup and configuration.

/// Setup logging for the daemon (env_logger picks up the RUST_LOG environment variable).
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging() {
    let _ = env_logger::builder().format_timestamp_millis().try_init();
}
