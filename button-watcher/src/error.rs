use thiserror::Error;

use crate::platform::ResourceHandle;

/// Errors reported by a [`Platform`](crate::platform::Platform) backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The running platform version lacks the capability
    #[error("{capability} is not supported below API level {min_api_level}")]
    Unsupported {
        capability: &'static str,
        min_api_level: u32,
    },

    /// The platform refused the request
    #[error("Platform rejected request: {0}")]
    Rejected(String),

    /// Release was called with a handle the platform does not know
    #[error("Unknown resource handle {0}")]
    UnknownHandle(ResourceHandle),
}

/// Errors that can occur in the button watcher
#[derive(Error, Debug)]
pub enum WatcherError {
    /// A platform call failed
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for watcher operations
pub type Result<T> = std::result::Result<T, WatcherError>;
