//! Per-kind listener registries with identity-based duplicate protection
//!
//! Listeners are registered as `Arc<dyn ButtonListener>`. Registering the same
//! `Arc` twice yields the token of the existing registration instead of a
//! second entry, so one event is never delivered twice to one listener.

use std::sync::Arc;

use crate::event::{ButtonEvent, SignalKind};

/// Receives button events of the kind it was subscribed under
pub trait ButtonListener: Send + Sync {
    fn on_button_event(&self, event: ButtonEvent);
}

impl<F> ButtonListener for F
where
    F: Fn(ButtonEvent) + Send + Sync,
{
    fn on_button_event(&self, event: ButtonEvent) {
        self(event)
    }
}

/// Token returned by subscribe and required by unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken {
    kind: SignalKind,
    id: u64,
}

impl ListenerToken {
    pub(crate) fn new(kind: SignalKind, id: u64) -> Self {
        Self { kind, id }
    }

    /// The signal kind this registration belongs to
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn as_u64(&self) -> u64 {
        self.id
    }
}

impl std::fmt::Display for ListenerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-listener-{}", self.kind, self.id)
    }
}

/// Ordered listener list for a single signal kind
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<(ListenerToken, Arc<dyn ButtonListener>)>,
}

impl ListenerRegistry {
    /// Insert `listener` unless the same `Arc` is already present
    ///
    /// Returns the token of the registration and whether it was newly added.
    pub fn insert(
        &mut self,
        token: ListenerToken,
        listener: Arc<dyn ButtonListener>,
    ) -> (ListenerToken, bool) {
        if let Some((existing, _)) = self
            .entries
            .iter()
            .find(|(_, l)| same_listener(l, &listener))
        {
            return (*existing, false);
        }

        self.entries.push((token, listener));
        (token, true)
    }

    /// Remove the registration for `token`, returning whether it was present
    pub fn remove(&mut self, token: ListenerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| *t != token);
        self.entries.len() != before
    }

    /// Clone out the listeners in registration order, for dispatch outside the lock
    pub fn snapshot(&self) -> Vec<Arc<dyn ButtonListener>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn same_listener(a: &Arc<dyn ButtonListener>, b: &Arc<dyn ButtonListener>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
