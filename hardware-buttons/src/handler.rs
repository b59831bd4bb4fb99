//! Stream handlers bridging the button watcher to event channels

use std::sync::Arc;

use button_watcher::{ButtonEvent, ButtonListener, ButtonWatcherManager, ListenerToken, SignalKind};
use parking_lot::Mutex;
use serde_json::Value;

use crate::channel::{EventSink, StreamHandler};

/// Value sent over a channel for a button event
///
/// Volume events carry `1` (up) or `-1` (down); home and lock carry `0`.
pub fn wire_value(event: ButtonEvent) -> Value {
    match event {
        ButtonEvent::Volume(direction) => Value::from(direction.as_delta()),
        ButtonEvent::Home | ButtonEvent::Lock => Value::from(0),
    }
}

type SinkSlot = Arc<Mutex<Option<Arc<dyn EventSink>>>>;

/// Subscribes to one signal kind while its channel has a listener
///
/// The handler owns a single watcher listener that forwards into whatever
/// sink is current, so listening twice never registers twice.
pub struct ButtonStreamHandler {
    kind: SignalKind,
    manager: ButtonWatcherManager,
    sink: SinkSlot,
    listener: Arc<dyn ButtonListener>,
    token: Mutex<Option<ListenerToken>>,
}

impl ButtonStreamHandler {
    pub fn new(kind: SignalKind, manager: ButtonWatcherManager) -> Self {
        let sink: SinkSlot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&sink);
        let listener: Arc<dyn ButtonListener> = Arc::new(move |event: ButtonEvent| {
            let current = slot.lock().clone();
            if let Some(sink) = current {
                sink.success(wire_value(event));
            }
        });

        Self {
            kind,
            manager,
            sink,
            listener,
            token: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn is_subscribed(&self) -> bool {
        self.token.lock().is_some()
    }
}

impl StreamHandler for ButtonStreamHandler {
    fn on_listen(&self, sink: Arc<dyn EventSink>) {
        *self.sink.lock() = Some(sink);
        let token = self.manager.subscribe(self.kind, Arc::clone(&self.listener));
        *self.token.lock() = Some(token);
    }

    fn on_cancel(&self) {
        *self.sink.lock() = None;
        if let Some(token) = self.token.lock().take() {
            self.manager.unsubscribe(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use button_watcher::{Intent, SimulatedPlatform, VolumeDirection};
    use serde_json::json;

    #[derive(Default)]
    struct VecSink(Mutex<Vec<Value>>);

    impl EventSink for VecSink {
        fn success(&self, event: Value) {
            self.0.lock().push(event);
        }
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(wire_value(ButtonEvent::Volume(VolumeDirection::Up)), json!(1));
        assert_eq!(wire_value(ButtonEvent::Volume(VolumeDirection::Down)), json!(-1));
        assert_eq!(wire_value(ButtonEvent::Home), json!(0));
        assert_eq!(wire_value(ButtonEvent::Lock), json!(0));
    }

    #[test]
    fn test_listen_and_cancel_map_to_subscribe() {
        let platform = Arc::new(SimulatedPlatform::new());
        let manager = ButtonWatcherManager::new(platform.clone());
        let handler = ButtonStreamHandler::new(SignalKind::Home, manager.clone());
        let sink = Arc::new(VecSink::default());

        handler.on_listen(sink.clone());
        assert!(handler.is_subscribed());
        assert!(manager.is_active(SignalKind::Home));

        platform.send_broadcast(Intent::close_system_dialogs("homekey"));
        assert_eq!(*sink.0.lock(), vec![json!(0)]);

        handler.on_cancel();
        assert!(!handler.is_subscribed());
        assert!(!manager.is_active(SignalKind::Home));
        handler.on_cancel();
    }

    #[test]
    fn test_relisten_does_not_double_register() {
        let platform = Arc::new(SimulatedPlatform::new());
        let manager = ButtonWatcherManager::new(platform.clone());
        let handler = ButtonStreamHandler::new(SignalKind::Volume, manager.clone());
        let first = Arc::new(VecSink::default());
        let second = Arc::new(VecSink::default());

        handler.on_listen(first.clone());
        handler.on_listen(second.clone());
        assert_eq!(manager.listener_count(SignalKind::Volume), 1);

        platform.adjust_volume(-4);
        assert!(first.0.lock().is_empty());
        assert_eq!(*second.0.lock(), vec![json!(-1)]);
    }
}
