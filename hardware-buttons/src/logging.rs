//! Logging setup for hosts embedding the plugin
//!
//! The plugin only emits `tracing` events; hosts that want them on stderr
//! call one of the initializers here once at startup.

use tracing_subscriber::EnvFilter;

const LEVEL_VAR: &str = "HARDWARE_BUTTONS_LOG_LEVEL";
const MODE_VAR: &str = "HARDWARE_BUTTONS_LOG_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber installed; the host's own logging stays untouched
    Silent,
    /// Lifecycle events at `info`
    Development,
    /// Reference counts and activations at `debug`, with targets and thread ids
    Debug,
}

impl LoggingMode {
    fn default_directive(self) -> Option<&'static str> {
        match self {
            LoggingMode::Silent => None,
            LoggingMode::Development => Some("info"),
            LoggingMode::Debug => Some("info,button_watcher=debug,hardware_buttons=debug"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install a compact stderr subscriber for `mode`
///
/// `HARDWARE_BUTTONS_LOG_LEVEL` overrides the mode's filter, then `RUST_LOG`.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let Some(directive) = mode.default_directive() else {
        return Ok(());
    };
    let verbose = mode == LoggingMode::Debug;

    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(verbose)
        .with_env_filter(env_filter(directive))
        .try_init()
        .map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Parse a mode name as accepted in `HARDWARE_BUTTONS_LOG_MODE`
///
/// Unknown or missing names fall back to `Silent`.
pub fn mode_from_name(name: Option<&str>) -> LoggingMode {
    match name {
        Some("development") => LoggingMode::Development,
        Some("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    }
}

pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var(MODE_VAR).ok();
    init_logging(mode_from_name(mode.as_deref()))
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LEVEL_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Whether a global subscriber has been installed, by us or by the host
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
