//! The seam between the watcher and the host operating system
//!
//! A [`Platform`] hands out resources (a media session, a broadcast receiver)
//! and delivers raw [`Signal`]s to the sink wired at acquisition time until
//! the resource is released.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::VolumeSessionConfig;
use crate::error::PlatformError;
use crate::intent::{Intent, IntentFilter};

/// Opaque token for an active platform subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(u64);

impl ResourceHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "res-{}", self.0)
    }
}

/// A resource the watcher asks the platform for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    /// An active media session with a relative remote volume provider
    MediaSession(VolumeSessionConfig),
    /// A broadcast receiver registered against a filter
    BroadcastReceiver(IntentFilter),
}

/// Raw signal delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    /// Relative volume adjustment from the remote volume provider
    VolumeAdjust { direction: i32 },
    /// A broadcast intent received by a registered receiver
    Broadcast { intent: Intent },
}

/// Callback wired into a resource at acquisition
///
/// The platform must call [`SignalSink::deliver`] for every signal the
/// resource observes and stop once the resource is released.
#[derive(Clone)]
pub struct SignalSink {
    inner: Arc<dyn Fn(Signal) + Send + Sync>,
}

impl SignalSink {
    pub fn new(f: impl Fn(Signal) + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    pub fn deliver(&self, signal: Signal) {
        (self.inner)(signal)
    }
}

impl std::fmt::Debug for SignalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalSink").finish_non_exhaustive()
    }
}

/// Host operating system capabilities the watcher depends on
#[cfg_attr(test, mockall::automock)]
pub trait Platform: Send + Sync {
    /// Acquire a resource and start delivering its signals to `sink`
    fn acquire(
        &self,
        request: &ResourceRequest,
        sink: SignalSink,
    ) -> Result<ResourceHandle, PlatformError>;

    /// Deactivate a resource; no signal may reach its sink afterwards
    ///
    /// Neither method may call a sink synchronously; the watcher holds its
    /// state lock across both.
    fn release(&self, handle: ResourceHandle) -> Result<(), PlatformError>;
}
