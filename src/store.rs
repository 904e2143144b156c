use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// String key/value persistence shared by every panel.
///
/// Listeners registered with [`StateStore::subscribe`] fire with no payload
/// after any change, including changes that originate in another process and
/// are pulled in by the reload task.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    fn subscribe(&self, listener: ChangeListener);
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    listeners: RwLock<Vec<ChangeListener>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }

    /// Swaps in a whole new key set. Returns whether anything changed;
    /// listeners only fire when it did.
    pub fn replace_all(&self, entries: BTreeMap<String, String>) -> bool {
        let changed = {
            let mut current = self.entries.write();
            if *current == entries {
                false
            } else {
                *current = entries;
                true
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        // Cloned out so a listener can subscribe or read without deadlocking.
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_string(), value);
        self.notify();
    }

    fn remove(&self, key: &str) {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            self.notify();
        }
    }

    fn subscribe(&self, listener: ChangeListener) {
        self.listeners.write().push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(store: &MemoryStore) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        store.subscribe(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        hits
    }

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("water_v1"), None);
        store.set("water_v1", "250".to_string());
        assert_eq!(store.get("water_v1").as_deref(), Some("250"));
        store.remove("water_v1");
        assert_eq!(store.get("water_v1"), None);
    }

    #[test]
    fn listeners_fire_on_change_only() {
        let store = MemoryStore::new();
        let hits = counting_listener(&store);

        store.set("a", "1".to_string());
        store.remove("missing");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let same = store.snapshot();
        assert!(!store.replace_all(same));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let mut next = BTreeMap::new();
        next.insert("b".to_string(), "2".to_string());
        assert!(store.replace_all(next));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn listener_can_read_store() {
        let store = Arc::new(MemoryStore::new());
        let seen = Arc::new(RwLock::new(None));
        let reader = Arc::downgrade(&store);
        let sink = Arc::clone(&seen);
        store.subscribe(Arc::new(move || {
            if let Some(store) = reader.upgrade() {
                *sink.write() = store.get("k");
            }
        }));
        store.set("k", "v".to_string());
        assert_eq!(seen.read().as_deref(), Some("v"));
    }
}
