//! Logging initialization for the client.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Log level from `RUST_LOG` env var or the provided default
/// - Human-readable output on stderr
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Client started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Ignore the error if a subscriber is already installed (tests).
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
