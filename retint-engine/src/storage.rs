//! Theme persistence
//!
//! The host supplies the key-value store (browser local storage, a file, a
//! test map). Only the last chosen theme is kept.

use alloc::collections::BTreeMap;
use alloc::string::String;

/// Key the chosen theme is stored under.
pub const STORAGE_KEY: &str = "retint.theme";

/// A string key-value store.
pub trait ThemeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ThemeStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.into(), value.into());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl<T: ThemeStore + ?Sized> ThemeStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remember(store: &mut impl ThemeStore, value: &str) {
        store.set(STORAGE_KEY, value);
    }

    #[test]
    fn test_borrowed_store_writes_through() {
        let mut store = MemoryStore::new();
        remember(&mut &mut store, "dark");
        assert_eq!(store.get(STORAGE_KEY).as_deref(), Some("dark"));
        store.remove(STORAGE_KEY);
        assert!(store.is_empty());
    }
}
