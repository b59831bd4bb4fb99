//! Named event channels exposed to the embedding framework
//!
//! A channel carries one stream of dynamically typed values from a
//! [`StreamHandler`] to at most one listener at a time. Listening again
//! cancels the previous listener first.

use std::sync::{mpsc, Arc};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{HardwareButtonsError, Result};

/// Destination of the values a stream handler emits
pub trait EventSink: Send + Sync {
    fn success(&self, event: Value);
}

/// Producer side of a channel
pub trait StreamHandler: Send + Sync {
    /// A listener attached; emit events into `sink` until cancelled
    fn on_listen(&self, sink: Arc<dyn EventSink>);

    /// The listener detached; stop emitting
    fn on_cancel(&self);
}

struct ChannelSink {
    tx: mpsc::Sender<Value>,
}

impl EventSink for ChannelSink {
    fn success(&self, event: Value) {
        // Receiver dropped without cancel; nothing left to deliver to
        let _ = self.tx.send(event);
    }
}

#[derive(Default)]
struct ChannelState {
    handler: Option<Arc<dyn StreamHandler>>,
    listening: bool,
}

/// A named single-listener event channel
pub struct EventChannel {
    name: String,
    state: Mutex<ChannelState>,
}

impl EventChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(ChannelState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install or remove the stream handler
    ///
    /// An active listener of the previous handler is cancelled first.
    pub fn set_stream_handler(&self, handler: Option<Arc<dyn StreamHandler>>) {
        let mut state = self.state.lock();
        if state.listening {
            if let Some(previous) = &state.handler {
                tracing::debug!("Cancelling active listener on {} before handler change", self.name);
                previous.on_cancel();
            }
            state.listening = false;
        }
        state.handler = handler;
    }

    pub fn has_stream_handler(&self) -> bool {
        self.state.lock().handler.is_some()
    }

    /// Attach `sink` as the channel's listener
    pub fn listen_with(&self, sink: Arc<dyn EventSink>) -> Result<()> {
        let mut state = self.state.lock();
        let handler = state
            .handler
            .clone()
            .ok_or_else(|| HardwareButtonsError::ChannelNotAttached(self.name.clone()))?;

        if state.listening {
            tracing::debug!("Replacing active listener on {}", self.name);
            handler.on_cancel();
        }

        handler.on_listen(sink);
        state.listening = true;
        tracing::debug!("Listening on {}", self.name);
        Ok(())
    }

    /// Attach a new listener and return the stream of values it receives
    pub fn listen(&self) -> Result<ButtonEventStream> {
        let (tx, rx) = mpsc::channel();
        self.listen_with(Arc::new(ChannelSink { tx }))?;
        Ok(ButtonEventStream::new(rx))
    }

    /// Detach the current listener; a no-op when nobody is listening
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if !state.listening {
            return;
        }
        if let Some(handler) = &state.handler {
            handler.on_cancel();
        }
        state.listening = false;
        tracing::debug!("Cancelled listener on {}", self.name);
    }

    pub fn is_listening(&self) -> bool {
        self.state.lock().listening
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.name)
            .field("listening", &self.is_listening())
            .finish()
    }
}

/// Blocking iterator over the values delivered to a channel listener
///
/// Ends once the listener is cancelled and every pending value was read.
pub struct ButtonEventStream {
    rx: mpsc::Receiver<Value>,
}

impl ButtonEventStream {
    pub(crate) fn new(rx: mpsc::Receiver<Value>) -> Self {
        Self { rx }
    }

    /// Block until a value is available
    ///
    /// Returns `None` if the stream has ended.
    pub fn recv(&self) -> Option<Value> {
        self.rx.recv().ok()
    }

    /// Try to receive a value without blocking
    pub fn try_recv(&self) -> Option<Value> {
        self.rx.try_recv().ok()
    }

    /// Block until a value is available or `timeout` expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Value> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Non-blocking iterator over currently pending values
    pub fn try_iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.rx.try_iter()
    }
}

impl Iterator for ButtonEventStream {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
