//! Dispatch table keyed by signal kind
//!
//! Each entry describes how to acquire the kind's platform resource, how to
//! translate a raw signal into a button event, and whether the resource is
//! released after it receives a signal.

use crate::config::{ScreenOffPolicy, WatcherConfig};
use crate::event::{ButtonEvent, SignalKind, VolumeDirection};
use crate::intent::{
    IntentFilter, ACTION_CLOSE_SYSTEM_DIALOGS, ACTION_SCREEN_OFF, EXTRA_REASON,
    GO_TO_SLEEP_REASON_POWER_BUTTON, REASON_HOME_KEY,
};
use crate::platform::{ResourceRequest, Signal};

/// Result of offering a raw signal to a watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reception {
    /// The signal is not addressed to this watcher
    Ignored,
    /// The watcher received the signal; `None` means it was filtered out
    Received(Option<ButtonEvent>),
}

pub(crate) struct WatcherEntry {
    pub kind: SignalKind,
    request: fn(&WatcherConfig) -> ResourceRequest,
    translate: fn(&Signal) -> Reception,
    single_shot: fn(&WatcherConfig) -> bool,
}

impl WatcherEntry {
    pub fn request(&self, config: &WatcherConfig) -> ResourceRequest {
        (self.request)(config)
    }

    pub fn translate(&self, signal: &Signal) -> Reception {
        (self.translate)(signal)
    }

    pub fn single_shot(&self, config: &WatcherConfig) -> bool {
        (self.single_shot)(config)
    }
}

static WATCHERS: [WatcherEntry; 3] = [
    WatcherEntry {
        kind: SignalKind::Volume,
        request: |config| ResourceRequest::MediaSession(config.volume_session.clone()),
        translate: translate_volume,
        single_shot: |_| false,
    },
    WatcherEntry {
        kind: SignalKind::Home,
        request: |_| ResourceRequest::BroadcastReceiver(IntentFilter::new(ACTION_CLOSE_SYSTEM_DIALOGS)),
        translate: translate_home,
        single_shot: |_| false,
    },
    WatcherEntry {
        kind: SignalKind::Lock,
        request: |_| ResourceRequest::BroadcastReceiver(IntentFilter::new(ACTION_SCREEN_OFF)),
        translate: translate_lock,
        single_shot: |config| config.screen_off_policy == ScreenOffPolicy::SingleShot,
    },
];

pub(crate) fn entry(kind: SignalKind) -> &'static WatcherEntry {
    &WATCHERS[kind.index()]
}

fn translate_volume(signal: &Signal) -> Reception {
    match signal {
        Signal::VolumeAdjust { direction } => {
            Reception::Received(VolumeDirection::from_delta(*direction).map(ButtonEvent::Volume))
        }
        Signal::Broadcast { .. } => Reception::Ignored,
    }
}

fn translate_home(signal: &Signal) -> Reception {
    match signal {
        Signal::Broadcast { intent } if intent.action == ACTION_CLOSE_SYSTEM_DIALOGS => {
            let is_home = intent.string_extra(EXTRA_REASON) == Some(REASON_HOME_KEY);
            Reception::Received(is_home.then_some(ButtonEvent::Home))
        }
        _ => Reception::Ignored,
    }
}

fn translate_lock(signal: &Signal) -> Reception {
    match signal {
        Signal::Broadcast { intent } if intent.action == ACTION_SCREEN_OFF => {
            let reason = intent.int_extra(EXTRA_REASON, -1);
            Reception::Received(
                (reason == GO_TO_SLEEP_REASON_POWER_BUTTON).then_some(ButtonEvent::Lock),
            )
        }
        _ => Reception::Ignored,
    }
}
