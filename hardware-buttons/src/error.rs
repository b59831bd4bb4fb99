use thiserror::Error;

use crate::logging::LoggingError;

/// Errors surfaced by the plugin and its event channels
#[derive(Error, Debug)]
pub enum HardwareButtonsError {
    /// Error from the underlying button watcher
    #[error("Button watcher error: {0}")]
    Watcher(#[from] button_watcher::WatcherError),

    /// Channels do not exist until the plugin is attached to an engine
    #[error("Plugin is not attached to an engine")]
    EngineNotAttached,

    /// Listen was called on a channel without a stream handler
    #[error("No stream handler set on channel {0}")]
    ChannelNotAttached(String),

    /// No channel with this name is exposed by the plugin
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Logging initialization failed
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Result type for plugin operations
pub type Result<T> = std::result::Result<T, HardwareButtonsError>;
