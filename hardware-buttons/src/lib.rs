//! # Hardware Buttons
//!
//! Exposes volume, home and lock button presses as event channels to an
//! embedding application framework.
//!
//! ## Channels
//!
//! | Channel                                | Values                      |
//! |----------------------------------------|-----------------------------|
//! | `flutter.moum.hardware_buttons.volume` | `1` (up) or `-1` (down)     |
//! | `flutter.moum.hardware_buttons.home`   | `0` on every home press     |
//! | `flutter.moum.hardware_buttons.lock`   | `0` on a power button press |
//!
//! Each channel accepts one listener at a time. Listening subscribes to the
//! shared [`ButtonWatcherManager`], which acquires the platform resource for
//! that button only while someone listens.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hardware_buttons::{HardwareButtonsPlugin, LOCK_CHANNEL};
//!
//! let mut plugin = HardwareButtonsPlugin::new();
//! plugin.on_attached_to_engine();
//! plugin.on_attached_to_activity(platform)?;
//!
//! for value in plugin.channel(LOCK_CHANNEL)?.listen()? {
//!     println!("lock pressed: {}", value);
//! }
//! ```

pub mod channel;
pub mod error;
pub mod handler;
pub mod logging;
pub mod plugin;

pub use channel::{ButtonEventStream, EventChannel, EventSink, StreamHandler};
pub use error::{HardwareButtonsError, Result};
pub use handler::{wire_value, ButtonStreamHandler};
pub use plugin::{channel_name, HardwareButtonsPlugin, HOME_CHANNEL, LOCK_CHANNEL, VOLUME_CHANNEL};

// Re-export the watcher types hosts need
pub use button_watcher::{
    ButtonEvent, ButtonWatcherManager, Platform, SignalKind, SimulatedPlatform, VolumeDirection,
    WatcherConfig,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ButtonEvent, ButtonEventStream, EventChannel, HardwareButtonsError,
        HardwareButtonsPlugin, Result, SignalKind, VolumeDirection,
    };
}
