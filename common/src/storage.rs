//! Small persistence port for client-side state (recent searches, sidebar).

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};

pub const RECENT_SEARCHES_KEY: &str = "data-table-command";
pub const CONTROLS_OPEN_KEY: &str = "data-table-controls";

/// String key/value storage scoped to the browser profile.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store, used in tests and on the server render.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Reads a JSON value, unreadable payloads count as missing.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    serde_json::from_str(&raw).ok()
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        store.set(key, &raw);
    }
}

/// A value loaded from the store on first read and written back on every
/// change.
pub struct Persisted<T> {
    key: &'static str,
    value: Option<T>,
}

impl<T: Serialize + DeserializeOwned + Default> Persisted<T> {
    pub fn new(key: &'static str) -> Self {
        Self { key, value: None }
    }

    pub fn get(&mut self, store: &dyn KeyValueStore) -> &T {
        let key = self.key;
        self.value.get_or_insert_with(|| load_json(store, key).unwrap_or_default())
    }

    pub fn set(&mut self, store: &dyn KeyValueStore, value: T) {
        save_json(store, self.key, &value);
        self.value = Some(value);
    }

    pub fn update(&mut self, store: &dyn KeyValueStore, f: impl FnOnce(&mut T)) {
        self.get(store);
        if let Some(value) = self.value.as_mut() {
            f(value);
            save_json(store, self.key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_loads_lazily_and_flushes_on_write() {
        let store = MemoryStore::default();
        store.set(CONTROLS_OPEN_KEY, "false");

        let mut open = Persisted::<bool>::new(CONTROLS_OPEN_KEY);
        assert!(!*open.get(&store));

        open.update(&store, |v| *v = !*v);
        assert_eq!(store.get(CONTROLS_OPEN_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn corrupt_payload_falls_back_to_default() {
        let store = MemoryStore::default();
        store.set(RECENT_SEARCHES_KEY, "{not json");
        let mut searches = Persisted::<Vec<String>>::new(RECENT_SEARCHES_KEY);
        assert!(searches.get(&store).is_empty());
    }
}
