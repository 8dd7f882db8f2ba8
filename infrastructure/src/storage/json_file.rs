//! JSON-file backed [`CounterStore`].
//!
//! The file is the only copy of the counters: every operation reloads it
//! under an advisory lock on a sibling `.lock` file, so several stores (or
//! processes) on the same path see each other's writes. Writes go to a
//! sibling temp file that is then renamed over the original. Counter logs
//! are small (bounded by the window quota) so this stays cheap.

use fd_lock::RwLock;
use forge_application::CounterStore;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while opening or persisting the counter file
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt counter file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

type Entries = BTreeMap<String, Vec<u64>>;

/// Counter store persisted as a single JSON object of `key -> [millis]`
pub struct JsonFileCounterStore {
    path: PathBuf,
    /// `fd_lock` needs `&mut` for the exclusive lock; the mutex also
    /// serializes threads of this process.
    lock: Mutex<RwLock<File>>,
}

impl JsonFileCounterStore {
    /// Open the store at `path`. A missing file starts empty; a corrupt one
    /// is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let lock_path = path.with_extension("json.lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StorageError::Io {
                path: lock_path,
                source,
            })?;
        let lock = RwLock::new(lock_file);

        let entries = {
            let _shared = lock.read().map_err(io_err)?;
            load(&path)?
        };
        debug!("Opened counter store {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            lock: Mutex::new(lock),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_lock(&self) -> MutexGuard<'_, RwLock<File>> {
        match self.lock.lock() {
            Ok(lock) => lock,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_key(&self, key: &str) -> Result<Vec<u64>, StorageError> {
        let file_lock = self.file_lock();
        let _shared = file_lock.read().map_err(|e| self.io_err(e))?;
        Ok(load(&self.path)?.remove(key).unwrap_or_default())
    }

    /// Reload, edit and persist the map while holding the exclusive lock.
    fn modify(&self, edit: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let mut file_lock = self.file_lock();
        let _exclusive = file_lock.write().map_err(|e| self.io_err(e))?;

        let mut entries = load(&self.path)?;
        edit(&mut entries);
        self.persist(&entries)
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }
}

fn load(path: &Path) -> Result<Entries, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(Entries::new()),
        Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn store(entries: &mut Entries, key: &str, timestamps: Vec<u64>) {
    if timestamps.is_empty() {
        entries.remove(key);
    } else {
        entries.insert(key.to_string(), timestamps);
    }
}

impl CounterStore for JsonFileCounterStore {
    fn read(&self, key: &str) -> Vec<u64> {
        self.read_key(key).unwrap_or_else(|e| {
            warn!("Failed to read counter store: {}", e);
            Vec::new()
        })
    }

    fn write(&self, key: &str, timestamps: Vec<u64>) {
        if let Err(e) = self.modify(|entries| store(entries, key, timestamps)) {
            warn!("Failed to persist counter store: {}", e);
        }
    }

    fn update(&self, key: &str, apply: &mut dyn FnMut(&mut Vec<u64>)) {
        let mut applied = false;
        let outcome = self.modify(|entries| {
            let mut timestamps = entries.remove(key).unwrap_or_default();
            apply(&mut timestamps);
            applied = true;
            store(entries, key, timestamps);
        });

        if let Err(e) = outcome {
            warn!("Failed to update counter store: {}", e);
            // Unreadable storage: decide on an empty log for this call only.
            if !applied {
                apply(&mut Vec::new());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCounterStore::open(dir.path().join("counters.json")).unwrap();
        assert!(store.read("rateLimit:student_001:lesson_plan").is_empty());
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("counters.json");

        let store = JsonFileCounterStore::open(&path).unwrap();
        store.write("rateLimit:a:assessment", vec![1_000, 2_000]);
        store.write("rateLimit:b:assessment", vec![3_000]);
        store.write("rateLimit:b:assessment", Vec::new());
        drop(store);

        let reopened = JsonFileCounterStore::open(&path).unwrap();
        assert_eq!(reopened.read("rateLimit:a:assessment"), vec![1_000, 2_000]);
        assert!(reopened.read("rateLimit:b:assessment").is_empty());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_two_stores_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counters.json");
        let first = JsonFileCounterStore::open(&path).unwrap();
        let second = JsonFileCounterStore::open(&path).unwrap();

        first.write("rateLimit:s-1:lesson_plan", vec![1, 2, 3]);
        assert_eq!(second.read("rateLimit:s-1:lesson_plan"), vec![1, 2, 3]);

        second.write("rateLimit:s-2:lesson_plan", vec![4]);
        drop(first);
        drop(second);

        let reopened = JsonFileCounterStore::open(&path).unwrap();
        assert_eq!(reopened.read("rateLimit:s-1:lesson_plan"), vec![1, 2, 3]);
        assert_eq!(reopened.read("rateLimit:s-2:lesson_plan"), vec![4]);
    }

    #[test]
    fn test_updates_from_two_stores_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counters.json");
        let first = JsonFileCounterStore::open(&path).unwrap();
        let second = JsonFileCounterStore::open(&path).unwrap();

        for (counters, t) in [(&first, 10), (&second, 20), (&first, 30)] {
            counters.update("k", &mut |timestamps: &mut Vec<u64>| timestamps.push(t));
        }

        assert_eq!(first.read("k"), vec![10, 20, 30]);
        assert_eq!(second.read("k"), vec![10, 20, 30]);
    }

    #[test]
    fn test_quota_holds_across_limiters_on_one_file() {
        use forge_application::{ManualClock, RateLimiter};
        use forge_domain::{ServiceType, SlidingWindow};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counters.json");
        let clock = Arc::new(ManualClock::new(0));
        let limiters: Vec<RateLimiter> = (0..2)
            .map(|_| {
                RateLimiter::new(
                    Arc::new(JsonFileCounterStore::open(&path).unwrap()),
                    clock.clone(),
                    SlidingWindow::new(60_000, 3),
                )
            })
            .collect();

        let mut accepted = 0;
        for t in 0..6 {
            clock.set(t);
            let limiter = &limiters[(t % 2) as usize];
            if limiter.try_acquire("s-1", ServiceType::LessonPlan).is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counters.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileCounterStore::open(&path).err().unwrap();
        assert!(matches!(err, StorageError::Parse { .. }));
    }

    #[test]
    fn test_empty_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counters.json");
        std::fs::write(&path, "\n").unwrap();

        let store = JsonFileCounterStore::open(&path).unwrap();
        assert!(store.read("k").is_empty());
    }
}
