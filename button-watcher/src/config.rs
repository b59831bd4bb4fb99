//! Configuration types for the button watcher
//!
//! Controls the simulated media session used to intercept volume keys and
//! how the screen-off receiver behaves after it fires.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};

/// Parameters of the media session that intercepts volume keys
///
/// The session pretends to play remotely with a relative volume provider.
/// The absolute numbers never reach listeners, only the direction of change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSessionConfig {
    /// Session tag shown to the platform
    /// Default: "DetectVolumeService"
    pub tag: String,

    /// Maximum volume of the remote provider
    /// Default: 100
    pub max_volume: u32,

    /// Initial volume of the remote provider
    /// Default: 50
    pub initial_volume: u32,
}

impl Default for VolumeSessionConfig {
    fn default() -> Self {
        Self {
            tag: "DetectVolumeService".to_string(),
            max_volume: 100,
            initial_volume: 50,
        }
    }
}

/// What happens to the screen-off receiver after it receives a broadcast
///
/// `SingleShot` unregisters the receiver after every screen-off broadcast,
/// so a second lock press is missed until the next subscribe call re-arms it.
/// This matches the shipped plugin but is most likely a defect there;
/// `Persistent` keeps the receiver registered while listeners remain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOffPolicy {
    #[default]
    SingleShot,
    Persistent,
}

/// Configuration for the ButtonWatcherManager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Media session parameters for volume interception
    pub volume_session: VolumeSessionConfig,

    /// Screen-off receiver policy
    /// Default: SingleShot
    pub screen_off_policy: ScreenOffPolicy,
}

impl WatcherConfig {
    /// Create a new WatcherConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a WatcherConfig that keeps the screen-off receiver armed
    pub fn persistent_lock() -> Self {
        Self {
            screen_off_policy: ScreenOffPolicy::Persistent,
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.volume_session.tag.is_empty() {
            return Err(WatcherError::Configuration(
                "Volume session tag must not be empty".to_string(),
            ));
        }

        if self.volume_session.max_volume == 0 {
            return Err(WatcherError::Configuration(
                "Max volume must be greater than 0".to_string(),
            ));
        }

        if self.volume_session.initial_volume > self.volume_session.max_volume {
            return Err(WatcherError::Configuration(format!(
                "Initial volume {} exceeds max volume {}",
                self.volume_session.initial_volume, self.volume_session.max_volume
            )));
        }

        Ok(())
    }

    pub fn with_session_tag(mut self, tag: impl Into<String>) -> Self {
        self.volume_session.tag = tag.into();
        self
    }

    pub fn with_volume_range(mut self, max_volume: u32, initial_volume: u32) -> Self {
        self.volume_session.max_volume = max_volume;
        self.volume_session.initial_volume = initial_volume;
        self
    }

    pub fn with_screen_off_policy(mut self, policy: ScreenOffPolicy) -> Self {
        self.screen_off_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WatcherConfig::default();
        assert_eq!(config.volume_session.tag, "DetectVolumeService");
        assert_eq!(config.volume_session.max_volume, 100);
        assert_eq!(config.volume_session.initial_volume, 50);
        assert_eq!(config.screen_off_policy, ScreenOffPolicy::SingleShot);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let empty_tag = WatcherConfig::new().with_session_tag("");
        assert!(empty_tag.validate().is_err());

        let zero_max = WatcherConfig::new().with_volume_range(0, 0);
        assert!(zero_max.validate().is_err());

        let over = WatcherConfig::new().with_volume_range(10, 11);
        assert!(matches!(over.validate(), Err(WatcherError::Configuration(_))));
    }

    #[test]
    fn test_presets_and_builder() {
        let persistent = WatcherConfig::persistent_lock();
        assert_eq!(persistent.screen_off_policy, ScreenOffPolicy::Persistent);
        assert!(persistent.validate().is_ok());

        let config = WatcherConfig::new()
            .with_session_tag("Buttons")
            .with_volume_range(15, 7)
            .with_screen_off_policy(ScreenOffPolicy::Persistent);
        assert_eq!(config.volume_session.tag, "Buttons");
        assert_eq!(config.volume_session.max_volume, 15);
        assert_eq!(config.volume_session.initial_volume, 7);
        assert!(config.validate().is_ok());
    }
}
