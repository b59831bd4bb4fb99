//! Signal kinds and the typed button events dispatched to listeners

use serde::{Deserialize, Serialize};

/// Independent category of hardware button event
///
/// Each kind owns its own listener registry and its own platform resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Volume up / volume down, intercepted through a media session
    Volume,
    /// Home button, observed through the close-system-dialogs broadcast
    Home,
    /// Power button, observed through the screen-off broadcast
    Lock,
}

impl SignalKind {
    /// All signal kinds, in table order
    pub const ALL: [SignalKind; 3] = [SignalKind::Volume, SignalKind::Home, SignalKind::Lock];

    pub(crate) fn index(self) -> usize {
        match self {
            SignalKind::Volume => 0,
            SignalKind::Home => 1,
            SignalKind::Lock => 2,
        }
    }

    /// Stable lowercase name, used in logs and channel names
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Volume => "volume",
            SignalKind::Home => "home",
            SignalKind::Lock => "lock",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a volume key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeDirection {
    Up,
    Down,
}

impl VolumeDirection {
    /// Translate a relative volume adjustment into a direction
    ///
    /// Returns `None` for a zero delta, which carries no key press.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            0 => None,
            d if d > 0 => Some(VolumeDirection::Up),
            _ => Some(VolumeDirection::Down),
        }
    }

    /// Signed unit direction: `1` for up, `-1` for down
    pub fn as_delta(&self) -> i32 {
        match self {
            VolumeDirection::Up => 1,
            VolumeDirection::Down => -1,
        }
    }
}

/// A translated hardware button event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "button", content = "direction", rename_all = "snake_case")]
pub enum ButtonEvent {
    Volume(VolumeDirection),
    Home,
    Lock,
}

impl ButtonEvent {
    /// The signal kind this event is dispatched under
    pub fn kind(&self) -> SignalKind {
        match self {
            ButtonEvent::Volume(_) => SignalKind::Volume,
            ButtonEvent::Home => SignalKind::Home,
            ButtonEvent::Lock => SignalKind::Lock,
        }
    }
}
