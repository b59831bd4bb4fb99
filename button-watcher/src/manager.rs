//! Reference-counted hardware button watcher
//!
//! Tracks one listener registry per signal kind. The platform resource for a
//! kind is acquired when its registry becomes non-empty and released when it
//! empties again. Signals delivered by an active resource are translated and
//! fanned out synchronously to the kind's listeners.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::WatcherConfig;
use crate::error::{PlatformError, Result};
use crate::event::{ButtonEvent, SignalKind, VolumeDirection};
use crate::platform::{Platform, ResourceHandle, Signal, SignalSink};
use crate::registry::{ButtonListener, ListenerRegistry, ListenerToken};
use crate::watchers::{self, Reception};

/// Hardware button watcher shared by everything that needs button events
///
/// Cloning is cheap; all clones share the same registries and resources.
/// Resources still held when the last clone is dropped are released.
///
/// # Example
///
/// ```rust,ignore
/// use button_watcher::{ButtonWatcherManager, SignalKind};
///
/// let manager = ButtonWatcherManager::new(platform);
///
/// // First volume listener activates the media session
/// let token = manager.on_volume(|direction| println!("volume {:?}", direction));
///
/// // Last volume listener gone: the session is released
/// manager.unsubscribe(token);
/// assert!(!manager.is_active(SignalKind::Volume));
/// ```
#[derive(Clone)]
pub struct ButtonWatcherManager {
    inner: Arc<Inner>,
}

struct Inner {
    platform: Arc<dyn Platform>,
    config: WatcherConfig,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    slots: [Slot; 3],
    next_token: u64,
    next_activation: u64,
}

#[derive(Default)]
struct Slot {
    registry: ListenerRegistry,
    active: Option<Activation>,
}

/// A live platform resource and the id its signal sink is tagged with
#[derive(Debug, Clone, Copy)]
struct Activation {
    id: u64,
    handle: ResourceHandle,
}

impl ButtonWatcherManager {
    /// Create a manager with default configuration
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self::build(platform, WatcherConfig::default())
    }

    /// Create a manager with custom configuration
    pub fn with_config(platform: Arc<dyn Platform>, config: WatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(platform, config))
    }

    fn build(platform: Arc<dyn Platform>, config: WatcherConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                platform,
                config,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.inner.config
    }

    /// Register a listener for `kind`
    ///
    /// Registering the same `Arc` again returns the existing token. Whenever
    /// the registry is non-empty and no resource is active, the resource is
    /// acquired; this also re-arms a single-shot screen-off receiver.
    /// Acquisition failures are logged and otherwise ignored.
    pub fn subscribe(&self, kind: SignalKind, listener: Arc<dyn ButtonListener>) -> ListenerToken {
        let mut state = self.inner.state.lock();
        state.next_token += 1;
        let candidate = ListenerToken::new(kind, state.next_token);

        let slot = &mut state.slots[kind.index()];
        let (token, added) = slot.registry.insert(candidate, listener);
        if added {
            tracing::debug!(
                "Listener count for {}: {} -> {}",
                kind,
                slot.registry.len() - 1,
                slot.registry.len()
            );
        } else {
            tracing::debug!("Listener {} already registered for {}", token, kind);
        }

        self.inner.activate_if_needed(&mut state, kind);
        token
    }

    /// Remove a registration
    ///
    /// Releases the kind's resource when its last listener is removed.
    /// Returns whether the token was registered; unknown tokens are a no-op.
    pub fn unsubscribe(&self, token: ListenerToken) -> bool {
        let kind = token.kind();
        let mut state = self.inner.state.lock();
        let slot = &mut state.slots[kind.index()];

        let removed = slot.registry.remove(token);
        if removed {
            tracing::debug!(
                "Listener count for {}: {} -> {}",
                kind,
                slot.registry.len() + 1,
                slot.registry.len()
            );
        } else {
            tracing::debug!("Listener {} not registered, nothing to remove", token);
        }

        if slot.registry.is_empty() {
            if let Some(activation) = slot.active.take() {
                self.inner.deactivate(kind, activation);
            }
        }

        removed
    }

    /// Register a closure receiving volume directions
    pub fn on_volume(
        &self,
        f: impl Fn(VolumeDirection) + Send + Sync + 'static,
    ) -> ListenerToken {
        self.subscribe(
            SignalKind::Volume,
            Arc::new(move |event: ButtonEvent| {
                if let ButtonEvent::Volume(direction) = event {
                    f(direction)
                }
            }),
        )
    }

    /// Register a closure called on every home button press
    pub fn on_home(&self, f: impl Fn() + Send + Sync + 'static) -> ListenerToken {
        self.subscribe(SignalKind::Home, Arc::new(move |_: ButtonEvent| f()))
    }

    /// Register a closure called on every power button press
    pub fn on_lock(&self, f: impl Fn() + Send + Sync + 'static) -> ListenerToken {
        self.subscribe(SignalKind::Lock, Arc::new(move |_: ButtonEvent| f()))
    }

    /// Whether the platform resource for `kind` is currently held
    pub fn is_active(&self, kind: SignalKind) -> bool {
        self.inner.state.lock().slots[kind.index()].active.is_some()
    }

    /// The handle of the resource held for `kind`, if any
    pub fn resource_handle(&self, kind: SignalKind) -> Option<ResourceHandle> {
        self.inner.state.lock().slots[kind.index()]
            .active
            .map(|a| a.handle)
    }

    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.inner.state.lock().slots[kind.index()].registry.len()
    }

    /// Current listener count per kind
    pub fn listener_counts(&self) -> HashMap<SignalKind, usize> {
        let state = self.inner.state.lock();
        SignalKind::ALL
            .iter()
            .map(|&kind| (kind, state.slots[kind.index()].registry.len()))
            .collect()
    }

    /// Release every resource and drop every listener
    ///
    /// The manager stays usable; a later subscribe starts from scratch.
    /// All resources are released even if one release fails; the first
    /// failure is returned.
    pub fn dispose(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        let mut first_error: Option<PlatformError> = None;

        for kind in SignalKind::ALL {
            let slot = &mut state.slots[kind.index()];
            slot.registry.clear();
            if let Some(activation) = slot.active.take() {
                if let Err(e) = self.inner.platform.release(activation.handle) {
                    tracing::warn!("Failed to release {} resource {}: {}", kind, activation.handle, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        tracing::info!("Button watcher disposed");

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Inner {
    fn activate_if_needed(self: &Arc<Self>, state: &mut State, kind: SignalKind) {
        let slot = &state.slots[kind.index()];
        if slot.registry.is_empty() || slot.active.is_some() {
            return;
        }

        state.next_activation += 1;
        let activation_id = state.next_activation;

        let request = watchers::entry(kind).request(&self.config);
        let weak: Weak<Inner> = Arc::downgrade(self);
        let sink = SignalSink::new(move |signal| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_signal(kind, activation_id, signal);
            }
        });

        match self.platform.acquire(&request, sink) {
            Ok(handle) => {
                tracing::debug!("Activated {} watcher with {}", kind, handle);
                state.slots[kind.index()].active = Some(Activation {
                    id: activation_id,
                    handle,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to activate {} watcher: {}", kind, e);
            }
        }
    }

    fn deactivate(&self, kind: SignalKind, activation: Activation) {
        match self.platform.release(activation.handle) {
            Ok(()) => tracing::debug!("Deactivated {} watcher {}", kind, activation.handle),
            Err(e) => tracing::warn!(
                "Failed to release {} resource {}: {}",
                kind,
                activation.handle,
                e
            ),
        }
    }

    fn handle_signal(&self, kind: SignalKind, activation_id: u64, signal: Signal) {
        let entry = watchers::entry(kind);
        let event = match entry.translate(&signal) {
            Reception::Received(event) => event,
            Reception::Ignored => {
                tracing::trace!("{} watcher ignored {:?}", kind, signal);
                return;
            }
        };

        let listeners = {
            let mut state = self.state.lock();
            let slot = &mut state.slots[kind.index()];

            match slot.active {
                Some(active) if active.id == activation_id => {}
                _ => {
                    tracing::debug!("Dropping {} signal from inactive activation {}", kind, activation_id);
                    return;
                }
            }

            if entry.single_shot(&self.config) {
                if let Some(activation) = slot.active.take() {
                    self.deactivate(kind, activation);
                }
            }

            match event {
                Some(_) => slot.registry.snapshot(),
                None => Vec::new(),
            }
        };

        if let Some(event) = event {
            tracing::debug!("Dispatching {:?} to {} listener(s)", event, listeners.len());
            for listener in listeners {
                listener.on_button_event(event);
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        tracing::debug!(
            "ButtonWatcherManager dropping, {} active resource(s)",
            state.slots.iter().filter(|s| s.active.is_some()).count()
        );

        for kind in SignalKind::ALL {
            if let Some(activation) = state.slots[kind.index()].active.take() {
                if let Err(e) = self.platform.release(activation.handle) {
                    tracing::warn!("Failed to release {} resource on drop: {}", kind, e);
                }
            }
        }
    }
}
