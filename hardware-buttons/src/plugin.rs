//! Plugin lifecycle: engine and activity attachment
//!
//! The engine owns the channels; the activity provides the platform the
//! watcher acquires its resources from. Channels exist from engine attach
//! until engine detach, and have handlers once an activity is attached.

use std::sync::Arc;

use button_watcher::{ButtonWatcherManager, Platform, SignalKind, WatcherConfig};

use crate::channel::EventChannel;
use crate::error::{HardwareButtonsError, Result};
use crate::handler::ButtonStreamHandler;

pub const VOLUME_CHANNEL: &str = "flutter.moum.hardware_buttons.volume";
pub const HOME_CHANNEL: &str = "flutter.moum.hardware_buttons.home";
pub const LOCK_CHANNEL: &str = "flutter.moum.hardware_buttons.lock";

/// Channel name carrying events of `kind`
pub fn channel_name(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::Volume => VOLUME_CHANNEL,
        SignalKind::Home => HOME_CHANNEL,
        SignalKind::Lock => LOCK_CHANNEL,
    }
}

/// Hardware buttons plugin
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hardware_buttons::{HardwareButtonsPlugin, VOLUME_CHANNEL};
/// use button_watcher::SimulatedPlatform;
///
/// let platform = Arc::new(SimulatedPlatform::new());
/// let mut plugin = HardwareButtonsPlugin::new();
/// plugin.on_attached_to_engine();
/// plugin.on_attached_to_activity(platform.clone())?;
///
/// let stream = plugin.channel(VOLUME_CHANNEL)?.listen()?;
/// platform.adjust_volume(1);
/// assert_eq!(stream.try_recv(), Some(serde_json::json!(1)));
/// # Ok::<(), hardware_buttons::HardwareButtonsError>(())
/// ```
pub struct HardwareButtonsPlugin {
    config: WatcherConfig,
    channels: Option<Vec<Arc<EventChannel>>>,
    platform: Option<Arc<dyn Platform>>,
    manager: Option<ButtonWatcherManager>,
}

impl HardwareButtonsPlugin {
    pub fn new() -> Self {
        Self::with_config(WatcherConfig::default())
    }

    pub fn with_config(config: WatcherConfig) -> Self {
        Self {
            config,
            channels: None,
            platform: None,
            manager: None,
        }
    }

    /// Create the volume, home and lock channels
    pub fn on_attached_to_engine(&mut self) {
        if self.channels.is_some() {
            tracing::debug!("Already attached to engine");
            return;
        }

        self.channels = Some(
            SignalKind::ALL
                .iter()
                .map(|&kind| Arc::new(EventChannel::new(channel_name(kind))))
                .collect(),
        );
        tracing::info!("Hardware buttons plugin attached to engine");
    }

    /// Install stream handlers backed by a watcher on `platform`
    ///
    /// Re-attaching with the same platform keeps the existing watcher. A
    /// different platform gets a fresh watcher and the previous one is
    /// disposed once its listeners have been cancelled.
    pub fn on_attached_to_activity(&mut self, platform: Arc<dyn Platform>) -> Result<()> {
        let channels = self
            .channels
            .as_ref()
            .ok_or(HardwareButtonsError::EngineNotAttached)?;

        let (manager, previous) = match self.manager.take() {
            Some(manager)
                if self
                    .platform
                    .as_ref()
                    .is_some_and(|current| same_platform(current, &platform)) =>
            {
                (manager, None)
            }
            previous => {
                match ButtonWatcherManager::with_config(Arc::clone(&platform), self.config.clone()) {
                    Ok(manager) => (manager, previous),
                    Err(e) => {
                        self.manager = previous;
                        return Err(e.into());
                    }
                }
            }
        };
        self.manager = Some(manager.clone());
        self.platform = Some(platform);

        for (kind, channel) in SignalKind::ALL.iter().zip(channels) {
            channel.set_stream_handler(Some(Arc::new(ButtonStreamHandler::new(
                *kind,
                manager.clone(),
            ))));
        }

        if let Some(previous) = previous {
            tracing::info!("Activity platform changed, disposing previous button watcher");
            previous.dispose()?;
        }

        tracing::info!("Hardware buttons plugin attached to activity");
        Ok(())
    }

    pub fn on_detached_from_activity_for_config_changes(&mut self) {
        // No-op
    }

    pub fn on_reattached_to_activity_for_config_changes(&mut self) {
        // No-op
    }

    pub fn on_detached_from_activity(&mut self) {
        // No-op
    }

    /// Remove all handlers, cancelling active listeners, and drop the channels
    pub fn on_detached_from_engine(&mut self) -> Result<()> {
        if let Some(channels) = self.channels.take() {
            for channel in channels {
                channel.set_stream_handler(None);
            }
        }

        self.platform = None;
        if let Some(manager) = self.manager.take() {
            manager.dispose()?;
        }

        tracing::info!("Hardware buttons plugin detached from engine");
        Ok(())
    }

    /// Look up a channel by name
    pub fn channel(&self, name: &str) -> Result<Arc<EventChannel>> {
        let channels = self
            .channels
            .as_ref()
            .ok_or(HardwareButtonsError::EngineNotAttached)?;

        channels
            .iter()
            .find(|c| c.name() == name)
            .cloned()
            .ok_or_else(|| HardwareButtonsError::UnknownChannel(name.to_string()))
    }

    /// The channel carrying events of `kind`
    pub fn channel_for(&self, kind: SignalKind) -> Result<Arc<EventChannel>> {
        self.channel(channel_name(kind))
    }

    /// The watcher, once an activity has been attached
    pub fn manager(&self) -> Option<&ButtonWatcherManager> {
        self.manager.as_ref()
    }
}

fn same_platform(a: &Arc<dyn Platform>, b: &Arc<dyn Platform>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl Default for HardwareButtonsPlugin {
    fn default() -> Self {
        Self::new()
    }
}
