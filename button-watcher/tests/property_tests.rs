//! Property-based tests for the registry / resource invariant.
//!
//! For any interleaving of subscribe and unsubscribe calls across the three
//! signal kinds, a kind's platform resource is held iff its registry is
//! non-empty, and no listener is ever delivered an event twice.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use button_watcher::{
    ButtonEvent, ButtonListener, ButtonWatcherManager, Intent, ListenerToken, SignalKind,
    SimulatedPlatform,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    /// Subscribe listener `n` (from a small fixed pool) to a kind
    Subscribe(SignalKind, usize),
    /// Unsubscribe the token at this index of the issued-token list
    Unsubscribe(usize),
}

const POOL: usize = 4;

fn kind_strategy() -> impl Strategy<Value = SignalKind> {
    prop_oneof![
        Just(SignalKind::Volume),
        Just(SignalKind::Home),
        Just(SignalKind::Lock),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (kind_strategy(), 0..POOL).prop_map(|(kind, n)| Op::Subscribe(kind, n)),
        (0usize..16).prop_map(Op::Unsubscribe),
    ]
}

fn counting_pool() -> (Vec<Arc<dyn ButtonListener>>, Vec<Arc<AtomicUsize>>) {
    (0..POOL)
        .map(|_| {
            let count = Arc::new(AtomicUsize::new(0));
            let c = Arc::clone(&count);
            let listener: Arc<dyn ButtonListener> = Arc::new(move |_: ButtonEvent| {
                c.fetch_add(1, Ordering::SeqCst);
            });
            (listener, count)
        })
        .unzip()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* sequence of subscribe/unsubscribe operations, each kind's
    /// resource is active iff its registry is non-empty, and the platform
    /// holds exactly one resource per active kind.
    #[test]
    fn prop_resource_active_iff_registry_non_empty(
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let platform = Arc::new(SimulatedPlatform::new());
        let manager = ButtonWatcherManager::new(platform.clone());
        let (pool, _) = counting_pool();
        let mut tokens: Vec<ListenerToken> = Vec::new();

        for op in ops {
            match op {
                Op::Subscribe(kind, n) => tokens.push(manager.subscribe(kind, Arc::clone(&pool[n]))),
                Op::Unsubscribe(i) => {
                    if !tokens.is_empty() {
                        let token = tokens[i % tokens.len()];
                        manager.unsubscribe(token);
                    }
                }
            }

            let mut active = 0;
            for kind in SignalKind::ALL {
                let count = manager.listener_count(kind);
                prop_assert!(count <= POOL, "duplicates in {} registry", kind);
                prop_assert_eq!(manager.is_active(kind), count > 0);
                if count > 0 {
                    active += 1;
                }
            }
            prop_assert_eq!(platform.active_count(), active);
        }
    }

    /// *For any* set of subscriptions to the home kind, including repeats of
    /// the same listener, one home press reaches each distinct listener once.
    #[test]
    fn prop_no_duplicate_delivery(
        picks in proptest::collection::vec(0..POOL, 1..12),
    ) {
        let platform = Arc::new(SimulatedPlatform::new());
        let manager = ButtonWatcherManager::new(platform.clone());
        let (pool, counts) = counting_pool();

        for &n in &picks {
            manager.subscribe(SignalKind::Home, Arc::clone(&pool[n]));
        }

        platform.send_broadcast(Intent::close_system_dialogs("homekey"));

        for (n, count) in counts.iter().enumerate() {
            let expected = usize::from(picks.contains(&n));
            prop_assert_eq!(count.load(Ordering::SeqCst), expected);
        }
    }

    /// *For any* non-zero delta, exactly one volume event is dispatched and
    /// its direction follows the sign; zero dispatches nothing.
    #[test]
    fn prop_volume_sign(delta in any::<i32>()) {
        let platform = Arc::new(SimulatedPlatform::new());
        let manager = ButtonWatcherManager::new(platform.clone());
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        manager.on_volume(move |direction| s.lock().push(direction));
        platform.adjust_volume(delta);

        let seen = seen.lock();
        if delta == 0 {
            prop_assert!(seen.is_empty());
        } else {
            prop_assert_eq!(seen.len(), 1);
            prop_assert_eq!(seen[0].as_delta().signum(), delta.signum());
        }
    }
}
