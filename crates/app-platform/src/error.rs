//! Platform error types

use thiserror::Error;

/// Errors reported by device services
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    /// The user refused location access
    #[error("Location permission denied")]
    PermissionDenied,

    /// The position could not be determined
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// The device has no usable heading sensor
    #[error("Heading sensor unavailable")]
    HeadingUnavailable,

    /// The system refused to open a URL
    #[error("Failed to open {url}: {reason}")]
    LaunchFailed {
        /// The URL that could not be opened
        url: String,
        /// Reason reported by the platform
        reason: String,
    },

    /// Any other platform failure
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
