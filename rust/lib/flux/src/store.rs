use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::trie::Trie;
use crate::value::{StateValue, SubscriptionId};

/// Callback invoked with `(path, new_value)` after a write.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    handler: ChangeHandler,
}

/// Path-keyed state with pattern subscriptions.
///
/// Writes notify synchronously, on the writer's thread, after the value
/// lock has been released, so a subscriber may read the store.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscribers: Trie<Subscriber>,
    next_id: AtomicU64,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscribers: Trie::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store `value` at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        let value = StateValue::new(value);
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string(), value.clone());
        for sub in self.subscribers.matches(path) {
            (sub.handler)(path, &value);
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }

    /// Clone out the value at `path` if it exists and is a `T`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Remove the value at `path`. Subscribers are not notified.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(path)
    }

    /// Paths currently holding a value, in order.
    pub fn paths(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.insert(
            pattern,
            Subscriber {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) {
        self.subscribers.remove(pattern, |s| s.id == id);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
