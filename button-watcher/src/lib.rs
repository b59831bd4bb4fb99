//! # Button Watcher
//!
//! Reference-counted management of the platform resources needed to observe
//! hardware button presses (volume keys, home, power/lock) and synchronous
//! fan-out of the resulting events to registered listeners.
//!
//! ## Overview
//!
//! Each signal kind owns a listener registry and at most one platform
//! resource:
//!
//! - **Volume**: a media session that pretends to play remotely so volume
//!   keys are routed to its relative volume provider
//! - **Home**: a receiver for the close-system-dialogs broadcast, filtered on
//!   the `homekey` reason
//! - **Lock**: a receiver for the screen-off broadcast, filtered on the
//!   power-button reason
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use button_watcher::{ButtonWatcherManager, SignalKind, SimulatedPlatform, VolumeDirection};
//!
//! let platform = Arc::new(SimulatedPlatform::new());
//! let manager = ButtonWatcherManager::new(platform.clone());
//!
//! // First listener activates the media session
//! let token = manager.on_volume(|direction| assert_eq!(direction, VolumeDirection::Up));
//! assert!(manager.is_active(SignalKind::Volume));
//!
//! platform.adjust_volume(1);
//!
//! // Last listener gone: the session is released
//! manager.unsubscribe(token);
//! assert_eq!(platform.active_count(), 0);
//! ```
//!
//! ## Architecture
//!
//! The manager follows the reference-counted observable pattern:
//!
//! 1. **Demand-driven resources**: acquired when a kind gets its first listener
//! 2. **Identity-based registration**: the same `Arc` listener is never added twice
//! 3. **Automatic cleanup**: released when a kind loses its last listener
//! 4. **Activation tagging**: signals from a released resource are dropped

pub mod config;
pub mod error;
pub mod event;
pub mod intent;
pub mod manager;
pub mod platform;
pub mod registry;
pub mod simulated;
mod watchers;

pub use config::{ScreenOffPolicy, VolumeSessionConfig, WatcherConfig};
pub use error::{PlatformError, Result, WatcherError};
pub use event::{ButtonEvent, SignalKind, VolumeDirection};
pub use intent::{Extra, Intent, IntentFilter};
pub use manager::ButtonWatcherManager;
pub use platform::{Platform, ResourceHandle, ResourceRequest, Signal, SignalSink};
pub use registry::{ButtonListener, ListenerToken};
pub use simulated::{Capability, SimulatedPlatform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ButtonEvent, ButtonListener, ButtonWatcherManager, ListenerToken, Platform, Result,
        SignalKind, VolumeDirection, WatcherConfig, WatcherError,
    };
}
