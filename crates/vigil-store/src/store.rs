//! The storage capability trait and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// A persisted store of named string entries.
///
/// This is the capability the session layer is handed instead of any
/// ambient storage API. The contract deliberately mirrors browser
/// local storage: string keys, string values, and no failure mode.
/// An implementation that can actually fail (disk, network) is
/// expected to degrade to "entry absent" rather than surface errors,
/// because nothing in the session layer can do anything useful with a
/// storage error.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store is shared across async tasks (the
///   periodic check runs on a separate task from the caller).
/// - `'static` → it doesn't borrow temporary data; it lives as long
///   as the monitor that holds it.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Removes the entry under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process [`KeyValueStore`] backed by a `HashMap`.
///
/// The default store when embedding Vigil without a host-provided
/// storage backend, and the fake used in tests. Entries live exactly
/// as long as the process, which matches the lifetime the session
/// layer assumes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // None of the operations below can panic while holding the
        // guard, so the mutex cannot be poisoned in practice.
        self.entries.lock().expect("store mutex poisoned")
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_key_returns_none() {
        let store = MemoryStore::new();

        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let store = MemoryStore::new();

        store.set("language", "fr");

        assert_eq!(store.get("language"), Some("fr".to_string()));
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let store = MemoryStore::new();
        store.set("theme", "light");

        store.set("theme", "dark");

        assert_eq!(store.get("theme"), Some("dark".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_deletes_entry() {
        let store = MemoryStore::new();
        store.set("authToken", "abc");

        store.remove("authToken");

        assert_eq!(store.get("authToken"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let store = MemoryStore::new();

        // Must not panic or create an entry.
        store.remove("never-set");

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let writer = Arc::clone(&store);

        let handle = std::thread::spawn(move || {
            writer.set("sessionTimeout", "30");
        });
        handle.join().expect("writer thread panicked");

        assert_eq!(store.get("sessionTimeout"), Some("30".to_string()));
    }
}
