//! Core types, configuration, and utilities for the Crawlerhub client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_API_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_LONG_REQUEST_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
