//! In-process platform backend
//!
//! Models the host OS closely enough to drive the watcher without a device:
//! volume keys reach active media sessions only, broadcasts reach receivers
//! whose filter matches, and released resources stop receiving anything.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::PlatformError;
use crate::intent::Intent;
use crate::platform::{Platform, ResourceHandle, ResourceRequest, Signal, SignalSink};

/// Capability a simulated platform can be told to lack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Remote volume control on a media session (API 21+)
    RemoteVolume,
    /// Registering broadcast receivers
    BroadcastReceivers,
}

impl Capability {
    fn describe(self) -> PlatformError {
        match self {
            Capability::RemoteVolume => PlatformError::Unsupported {
                capability: "remote volume provider",
                min_api_level: 21,
            },
            Capability::BroadcastReceivers => PlatformError::Unsupported {
                capability: "broadcast receivers",
                min_api_level: 1,
            },
        }
    }
}

struct ActiveResource {
    request: ResourceRequest,
    sink: SignalSink,
}

/// Platform backend that lives entirely in the current process
#[derive(Default)]
pub struct SimulatedPlatform {
    resources: Mutex<BTreeMap<ResourceHandle, ActiveResource>>,
    unsupported: Mutex<HashSet<Capability>>,
    next_handle: AtomicU64,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make acquisitions needing `capability` fail from now on
    pub fn set_unsupported(&self, capability: Capability, unsupported: bool) {
        let mut caps = self.unsupported.lock();
        if unsupported {
            caps.insert(capability);
        } else {
            caps.remove(&capability);
        }
    }

    /// Press a volume key; `direction` is the relative adjustment
    ///
    /// Returns the number of media sessions that received it.
    pub fn adjust_volume(&self, direction: i32) -> usize {
        self.deliver(
            |request| matches!(request, ResourceRequest::MediaSession(_)),
            Signal::VolumeAdjust { direction },
        )
    }

    /// Fire a system broadcast
    ///
    /// Returns the number of receivers whose filter matched.
    pub fn send_broadcast(&self, intent: Intent) -> usize {
        let target = intent.clone();
        self.deliver(
            move |request| match request {
                ResourceRequest::BroadcastReceiver(filter) => filter.matches(&target),
                ResourceRequest::MediaSession(_) => false,
            },
            Signal::Broadcast { intent },
        )
    }

    /// Number of currently held resources
    pub fn active_count(&self) -> usize {
        self.resources.lock().len()
    }

    /// Requests of the currently held resources, in acquisition order
    pub fn active_requests(&self) -> Vec<ResourceRequest> {
        self.resources
            .lock()
            .values()
            .map(|r| r.request.clone())
            .collect()
    }

    pub fn is_held(&self, handle: ResourceHandle) -> bool {
        self.resources.lock().contains_key(&handle)
    }

    /// Total successful acquisitions
    pub fn acquire_count(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Total successful releases
    pub fn release_count(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    fn deliver(&self, accepts: impl Fn(&ResourceRequest) -> bool, signal: Signal) -> usize {
        // Sinks may release resources, so never call them under the lock
        let sinks: Vec<SignalSink> = self
            .resources
            .lock()
            .values()
            .filter(|r| accepts(&r.request))
            .map(|r| r.sink.clone())
            .collect();

        for sink in &sinks {
            sink.deliver(signal.clone());
        }
        sinks.len()
    }
}

impl Platform for SimulatedPlatform {
    fn acquire(
        &self,
        request: &ResourceRequest,
        sink: SignalSink,
    ) -> Result<ResourceHandle, PlatformError> {
        let needed = match request {
            ResourceRequest::MediaSession(_) => Capability::RemoteVolume,
            ResourceRequest::BroadcastReceiver(_) => Capability::BroadcastReceivers,
        };
        if self.unsupported.lock().contains(&needed) {
            return Err(needed.describe());
        }

        if let ResourceRequest::MediaSession(config) = request {
            if config.initial_volume > config.max_volume {
                return Err(PlatformError::Rejected(format!(
                    "initial volume {} above max {}",
                    config.initial_volume, config.max_volume
                )));
            }
        }

        let handle = ResourceHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        self.resources.lock().insert(
            handle,
            ActiveResource {
                request: request.clone(),
                sink,
            },
        );
        self.acquired.fetch_add(1, Ordering::Relaxed);

        tracing::trace!("Simulated platform acquired {} for {:?}", handle, request);
        Ok(handle)
    }

    fn release(&self, handle: ResourceHandle) -> Result<(), PlatformError> {
        self.resources
            .lock()
            .remove(&handle)
            .ok_or(PlatformError::UnknownHandle(handle))?;
        self.released.fetch_add(1, Ordering::Relaxed);

        tracing::trace!("Simulated platform released {}", handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VolumeSessionConfig;
    use crate::intent::{IntentFilter, ACTION_SCREEN_OFF, REASON_HOME_KEY};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn counting_sink() -> (SignalSink, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let sink = SignalSink::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (sink, count)
    }

    #[test]
    fn test_volume_reaches_sessions_only() {
        let platform = SimulatedPlatform::new();
        let (session_sink, session_count) = counting_sink();
        let (receiver_sink, receiver_count) = counting_sink();

        platform
            .acquire(&ResourceRequest::MediaSession(VolumeSessionConfig::default()), session_sink)
            .unwrap();
        platform
            .acquire(
                &ResourceRequest::BroadcastReceiver(IntentFilter::new(ACTION_SCREEN_OFF)),
                receiver_sink,
            )
            .unwrap();

        assert_eq!(platform.adjust_volume(1), 1);
        assert_eq!(session_count.load(Ordering::SeqCst), 1);
        assert_eq!(receiver_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_broadcast_respects_filter() {
        let platform = SimulatedPlatform::new();
        let (sink, count) = counting_sink();
        platform
            .acquire(
                &ResourceRequest::BroadcastReceiver(IntentFilter::new(ACTION_SCREEN_OFF)),
                sink,
            )
            .unwrap();

        assert_eq!(platform.send_broadcast(Intent::close_system_dialogs(REASON_HOME_KEY)), 0);
        assert_eq!(platform.send_broadcast(Intent::screen_off(4)), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_stops_delivery() {
        let platform = SimulatedPlatform::new();
        let (sink, count) = counting_sink();
        let handle = platform
            .acquire(&ResourceRequest::MediaSession(VolumeSessionConfig::default()), sink)
            .unwrap();

        assert!(platform.is_held(handle));
        platform.release(handle).unwrap();
        assert!(!platform.is_held(handle));
        assert_eq!(platform.adjust_volume(-1), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(platform.release(handle), Err(PlatformError::UnknownHandle(handle)));
        assert_eq!(platform.acquire_count(), 1);
        assert_eq!(platform.release_count(), 1);
    }

    #[test]
    fn test_unsupported_capability() {
        let platform = SimulatedPlatform::new();
        platform.set_unsupported(Capability::RemoteVolume, true);

        let (sink, _) = counting_sink();
        let result = platform.acquire(
            &ResourceRequest::MediaSession(VolumeSessionConfig::default()),
            sink.clone(),
        );
        assert!(matches!(result, Err(PlatformError::Unsupported { min_api_level: 21, .. })));
        assert_eq!(platform.active_count(), 0);

        platform.set_unsupported(Capability::RemoteVolume, false);
        assert!(platform
            .acquire(&ResourceRequest::MediaSession(VolumeSessionConfig::default()), sink)
            .is_ok());
    }

    #[test]
    fn test_handles_are_unique() {
        let platform = SimulatedPlatform::new();
        let filter = IntentFilter::new(ACTION_SCREEN_OFF);
        let (a, _) = counting_sink();
        let (b, _) = counting_sink();

        let first = platform.acquire(&ResourceRequest::BroadcastReceiver(filter.clone()), a).unwrap();
        let second = platform.acquire(&ResourceRequest::BroadcastReceiver(filter), b).unwrap();
        assert_ne!(first, second);
        assert_eq!(platform.active_requests().len(), 2);
    }
}
