//! Logging setup
//!
//! Library crates only emit `tracing` events. The host installs a
//! subscriber once at startup with [`init`], usually through
//! [`AppConfig::init_logging`](crate::AppConfig::init_logging).

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_FILTER: &str = "info";

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter directive could not be parsed
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter {
        /// Filter as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Parse a filter directive such as `carfinder=debug,sled=warn`
pub fn parse_filter(filter: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(filter).map_err(|e| LoggingError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Build the filter: `RUST_LOG` wins, then `default_filter`
pub fn build_filter(default_filter: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    parse_filter(default_filter)
}

/// Install the global fmt subscriber
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    let filter = build_filter(default_filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;
    tracing::debug!(filter = default_filter, "Logging initialized");
    Ok(())
}
