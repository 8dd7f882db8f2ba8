//! Counter store port
//!
//! Persists the per-key timestamp logs used by the rate limiter. Both
//! operations are synchronous so a caller can run a read-modify-write
//! inside one critical section.

use std::collections::HashMap;
use std::sync::Mutex;

/// Key/value store of millisecond timestamp lists
pub trait CounterStore: Send + Sync {
    /// Timestamps stored under `key`; empty when absent.
    fn read(&self, key: &str) -> Vec<u64>;

    /// Replace the timestamps stored under `key`.
    fn write(&self, key: &str, timestamps: Vec<u64>);

    /// Read `key`, let `apply` edit the timestamps, and write them back.
    ///
    /// Stores shared between processes override this to hold their lock
    /// across the whole cycle. `apply` is called exactly once.
    fn update(&self, key: &str, apply: &mut dyn FnMut(&mut Vec<u64>)) {
        let mut timestamps = self.read(key);
        apply(&mut timestamps);
        self.write(key, timestamps);
    }
}

/// Process-local store; contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    entries: Mutex<HashMap<String, Vec<u64>>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn read(&self, key: &str) -> Vec<u64> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned().unwrap_or_default(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned().unwrap_or_default(),
        }
    }

    fn write(&self, key: &str, timestamps: Vec<u64>) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        if timestamps.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), timestamps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key_is_empty() {
        let store = InMemoryCounterStore::new();
        assert!(store.read("rateLimit:a:lesson_plan").is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let store = InMemoryCounterStore::new();
        store.write("k", vec![1, 2, 3]);
        assert_eq!(store.read("k"), vec![1, 2, 3]);

        store.write("k", Vec::new());
        assert!(store.read("k").is_empty());
    }

    #[test]
    fn test_default_update_reads_then_writes() {
        let store = InMemoryCounterStore::new();
        store.write("k", vec![1]);

        let mut calls = 0;
        store.update("k", &mut |timestamps: &mut Vec<u64>| {
            calls += 1;
            timestamps.push(2);
        });

        assert_eq!(calls, 1);
        assert_eq!(store.read("k"), vec![1, 2]);
    }
}
