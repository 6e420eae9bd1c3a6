//! Per-instance response cache for backend queries.
//!
//! Each manager instance owns one cache keyed by package name, so
//! repeated dependency lookups within a resolver run hit the external
//! tool once. Nothing is shared across instances and nothing persists;
//! access is serialized with a mutex so an instance handed to multiple
//! threads stays coherent.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ResponseCache<V: Clone> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached value for a package name, if any. A poisoned lock is
    /// treated as a miss rather than propagated.
    pub fn get(&self, name: &str) -> Option<V> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(name).cloned())
    }

    pub fn put(&self, name: &str, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(name.to_string(), value);
        }
    }

    /// Drop one entry (e.g. after a mutating operation touched the package).
    pub fn invalidate(&self, name: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(name);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
