//! Broadcast intents and the filters receivers are registered with

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Broadcast sent when a system dialog (recents, home, ...) is being dismissed
pub const ACTION_CLOSE_SYSTEM_DIALOGS: &str = "android.intent.action.CLOSE_SYSTEM_DIALOGS";

/// Broadcast sent when the screen turns off
pub const ACTION_SCREEN_OFF: &str = "android.intent.action.SCREEN_OFF";

/// Extra key carrying the reason code on both broadcasts
pub const EXTRA_REASON: &str = "reason";

/// Close-system-dialogs reason for a home key press
pub const REASON_HOME_KEY: &str = "homekey";

/// Close-system-dialogs reason for the recent apps key
pub const REASON_RECENT_APPS: &str = "recentapps";

/// Screen-off reason for a power button press
///
/// Same value as `PowerManager.GO_TO_SLEEP_REASON_POWER_BUTTON`, which is hidden from apps.
pub const GO_TO_SLEEP_REASON_POWER_BUTTON: i32 = 4;

/// A typed extra value attached to an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extra {
    Int(i32),
    Str(String),
}

/// A broadcast intent as delivered by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: String,
    #[serde(default)]
    pub extras: HashMap<String, Extra>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: HashMap::new(),
        }
    }

    pub fn with_string_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), Extra::Str(value.into()));
        self
    }

    pub fn with_int_extra(mut self, key: impl Into<String>, value: i32) -> Self {
        self.extras.insert(key.into(), Extra::Int(value));
        self
    }

    /// Look up a string extra
    ///
    /// Returns `None` when the key is missing or holds a non-string value.
    pub fn string_extra(&self, key: &str) -> Option<&str> {
        match self.extras.get(key)? {
            Extra::Str(s) => Some(s),
            Extra::Int(_) => None,
        }
    }

    /// Look up an int extra, falling back to `default` when missing or mistyped
    pub fn int_extra(&self, key: &str, default: i32) -> i32 {
        match self.extras.get(key) {
            Some(Extra::Int(v)) => *v,
            _ => default,
        }
    }

    /// Build a close-system-dialogs broadcast with the given reason
    pub fn close_system_dialogs(reason: &str) -> Self {
        Self::new(ACTION_CLOSE_SYSTEM_DIALOGS).with_string_extra(EXTRA_REASON, reason)
    }

    /// Build a screen-off broadcast with the given reason
    pub fn screen_off(reason: i32) -> Self {
        Self::new(ACTION_SCREEN_OFF).with_int_extra(EXTRA_REASON, reason)
    }
}

/// Set of actions a broadcast receiver is registered for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFilter {
    actions: Vec<String>,
}

impl IntentFilter {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            actions: vec![action.into()],
        }
    }

    pub fn add_action(mut self, action: impl Into<String>) -> Self {
        let action = action.into();
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
        self
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn matches(&self, intent: &Intent) -> bool {
        self.actions.iter().any(|a| *a == intent.action)
    }
}
