// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// An event type that can travel over the [`EventBus`].
///
/// Every event reports a `Kind` used to route it to the listeners that
/// subscribed for that kind.
pub trait BusEvent: Clone + Send + Sync + 'static {
    /// The routing key of the event family.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the kind of this particular event.
    fn kind(&self) -> Self::Kind;
}

/// Handle returned by [`EventBus::on`], used to unsubscribe via
/// [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync + 'static>;

struct ListenerEntry<E: BusEvent> {
    id: ListenerId,
    callback: Callback<E>,
}

/// Manages a generic, thread-safe observer registry.
///
/// This EventBus is generic over the type `E` of event it transports, so
/// `aegis-core` stays decoupled from the event enums of higher-level crates.
///
/// Delivery is isolated per listener: a listener that panics is caught and
/// logged, and every other listener still runs. One badly behaved observer
/// can never abort the operation that emitted the event, matching the
/// posture the controllers take toward feature hooks.
pub struct EventBus<E: BusEvent> {
    listeners: Mutex<HashMap<E::Kind, Vec<ListenerEntry<E>>>>,
    taps: Mutex<Vec<flume::Sender<E>>>,
    next_id: AtomicU64,
}

impl<E: BusEvent> EventBus<E> {
    /// Creates a new, empty bus.
    pub fn new() -> Self {
        log::debug!("Generic EventBus initialized.");
        Self {
            listeners: Mutex::new(HashMap::new()),
            taps: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers a listener for one event kind.
    ///
    /// ## Returns
    /// A [`ListenerId`] that identifies the registration for [`off`](Self::off).
    pub fn on(&self, kind: E::Kind, listener: impl Fn(&E) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self.listeners.lock().unwrap();
        listeners.entry(kind).or_default().push(ListenerEntry {
            id,
            callback: Arc::new(listener),
        });
        id
    }

    /// Removes a previously registered listener.
    ///
    /// ## Returns
    /// `true` if the listener was found and removed.
    pub fn off(&self, kind: E::Kind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        if let Some(entries) = listeners.get_mut(&kind) {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            return entries.len() < before;
        }
        false
    }

    /// Delivers an event to every listener of its kind and to every tap.
    ///
    /// Listener panics are caught and logged per listener. Disconnected taps
    /// are pruned.
    pub fn emit(&self, event: E) {
        let kind = event.kind();
        log::trace!("Emitting {kind:?} event.");

        // Clone the callbacks out so no lock is held while listener code runs.
        let callbacks: Vec<(ListenerId, Callback<E>)> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .get(&kind)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|entry| (entry.id, Arc::clone(&entry.callback)))
                        .collect()
                })
                .unwrap_or_default()
        };

        for (id, callback) in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                log::error!("Event listener {id:?} panicked while handling a {kind:?} event.");
            }
        }

        let mut taps = self.taps.lock().unwrap();
        taps.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Opens a stream subscription receiving every event regardless of kind.
    ///
    /// Dropping the receiver ends the subscription; the bus prunes it on the
    /// next emit.
    pub fn tap(&self) -> flume::Receiver<E> {
        let (tx, rx) = flume::unbounded();
        self.taps.lock().unwrap().push(tx);
        rx
    }

    /// Returns the number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        let listeners = self.listeners.lock().unwrap();
        listeners.get(&kind).map(|entries| entries.len()).unwrap_or(0)
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listener_total: usize = self
            .listeners
            .lock()
            .map(|map| map.values().map(|v| v.len()).sum())
            .unwrap_or(0);
        f.debug_struct("EventBus")
            .field("listeners", &listener_total)
            .finish()
    }
}
