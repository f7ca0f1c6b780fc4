//! Durable key-value layer
//!
//! A generic name→bytes map with two tiers. Every operation tries the
//! structured backend first and drops to the simple backend when the
//! structured one could not be opened or the operation fails.
//!
//! The tiers are not replicated. Keys whose latest value only made it to the
//! fallback are recorded in a diverted-key set, itself persisted in the
//! fallback, so reads of those keys go to the fallback first. A later
//! successful structured write clears the mark.

pub mod backend;
pub mod file_io;
pub mod files;
pub mod handle;
pub mod memory;
pub mod sqlite;

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, warn};

pub use backend::{SimpleBackend, StructuredBackend, StructuredOpener};
pub use files::FileBackend;
pub use handle::StorageHandle;
pub use memory::{MemoryBackend, MemoryOpener};
pub use sqlite::{SqliteBackend, SqliteOpener};

use crate::config::LedgerPaths;
use crate::error::StoreError;

/// Fallback key holding the diverted-key set
pub const DIVERTED_KEYS: &str = "__fallbackKeys";

/// The two-tier key-value store
pub struct DurableKv {
    handle: StorageHandle,
    fallback: Arc<dyn SimpleBackend>,
    /// Loaded from the fallback on first use
    diverted: Mutex<Option<BTreeSet<String>>>,
}

impl DurableKv {
    pub fn new(handle: StorageHandle, fallback: Arc<dyn SimpleBackend>) -> Self {
        Self {
            handle,
            fallback,
            diverted: Mutex::new(None),
        }
    }

    /// SQLite at the ledger's database path, files in its fallback directory
    pub fn open(paths: &LedgerPaths) -> Self {
        Self::new(
            StorageHandle::new(Box::new(SqliteOpener::new(paths.database_file()))),
            Arc::new(FileBackend::new(paths.fallback_dir())),
        )
    }

    /// A throwaway store held entirely in memory
    pub fn in_memory() -> Self {
        Self::new(
            StorageHandle::with_backend(Arc::new(MemoryBackend::new())),
            Arc::new(MemoryBackend::new()),
        )
    }

    /// Name of the tier currently serving writes
    pub async fn active_backend(&self) -> &'static str {
        match self.handle.get().await {
            Some(backend) => backend.name(),
            None => self.fallback.name(),
        }
    }

    /// Read a key. Failures on both tiers read as a missing key.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.is_diverted(key) {
            return Ok(self.fallback_get(key));
        }

        if let Some(backend) = self.handle.get().await {
            match backend.get(key).await {
                Ok(value) => return Ok(value),
                Err(e) => warn!(key, error = %e, "structured read failed, trying fallback"),
            }
        }

        Ok(self.fallback_get(key))
    }

    /// Write a key. Fails only when both tiers refuse the write.
    pub async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if let Some(backend) = self.handle.get().await {
            match backend.put(key, value.clone()).await {
                Ok(()) => {
                    self.undivert(&[key], |k| (k == key).then_some(value.as_slice()));
                    debug!(key, backend = backend.name(), "stored value");
                    return Ok(());
                }
                Err(e) => warn!(key, error = %e, "structured write failed, using fallback"),
            }
        }

        let result = self.fallback_put(key, &value);
        if let Err(e) = &result {
            error!(key, error = %e, "write failed on every backend");
        }
        result
    }

    /// Fallback write of one key, undone if the diversion mark cannot be saved
    fn fallback_put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let old = self
            .fallback
            .get(key)
            .map_err(|e| as_write_failed(key, e))?;
        self.fallback
            .put(key, value)
            .map_err(|e| as_write_failed(key, e))?;
        if let Err(e) = self.mark_diverted(&[key]) {
            self.restore(&[(key, old)]);
            return Err(as_write_failed(key, e));
        }
        Ok(())
    }

    /// Write several keys so that either all of them change or none do
    pub async fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();

        if let Some(backend) = self.handle.get().await {
            match backend.put_batch(entries.clone()).await {
                Ok(()) => {
                    self.undivert(&keys, |k| {
                        entries
                            .iter()
                            .find(|(key, _)| key == k)
                            .map(|(_, v)| v.as_slice())
                    });
                    debug!(count = entries.len(), "stored batch");
                    return Ok(());
                }
                Err(e) => warn!(error = %e, "structured batch failed, using fallback"),
            }
        }

        let result = self.fallback_batch(&entries);
        if let Err(e) = &result {
            error!(error = %e, "batch write failed on every backend");
        }
        result
    }

    fn fallback_get(&self, key: &str) -> Option<Vec<u8>> {
        match self.fallback.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "fallback read failed");
                None
            }
        }
    }

    fn fallback_batch(&self, entries: &[(String, Vec<u8>)]) -> Result<(), StoreError> {
        let mut previous = Vec::with_capacity(entries.len());
        for (key, _) in entries {
            let old = self
                .fallback
                .get(key)
                .map_err(|e| as_write_failed(key, e))?;
            previous.push((key.as_str(), old));
        }

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.fallback.put(key, value) {
                self.restore(&previous[..written]);
                return Err(as_write_failed(key, e));
            }
        }

        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        if let Err(e) = self.mark_diverted(&keys) {
            self.restore(&previous);
            return Err(as_write_failed("<batch>", e));
        }
        Ok(())
    }

    fn restore(&self, previous: &[(&str, Option<Vec<u8>>)]) {
        for (key, old) in previous {
            let result = match old {
                Some(bytes) => self.fallback.put(key, bytes),
                None => self.fallback.remove(key),
            };
            if let Err(e) = result {
                error!(key = *key, error = %e, "could not roll back fallback write");
            }
        }
    }

    fn diverted(&self) -> MutexGuard<'_, Option<BTreeSet<String>>> {
        let mut guard = self
            .diverted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.is_none() {
            *guard = Some(self.load_diverted());
        }
        guard
    }

    fn load_diverted(&self) -> BTreeSet<String> {
        match self.fallback.get(DIVERTED_KEYS) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(error = %e, "diverted-key set unreadable, ignoring it");
                BTreeSet::new()
            }),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(error = %e, "diverted-key set unavailable");
                BTreeSet::new()
            }
        }
    }

    fn is_diverted(&self, key: &str) -> bool {
        self.diverted()
            .as_ref()
            .is_some_and(|set| set.contains(key))
    }

    /// Persist a new diverted set, updating memory only on success
    fn store_diverted(
        &self,
        guard: &mut MutexGuard<'_, Option<BTreeSet<String>>>,
        next: BTreeSet<String>,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&next)
            .map_err(|e| StoreError::write_failed(DIVERTED_KEYS, e.to_string()))?;
        self.fallback.put(DIVERTED_KEYS, &bytes)?;
        **guard = Some(next);
        Ok(())
    }

    fn mark_diverted(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut guard = self.diverted();
        let mut next = guard.clone().unwrap_or_default();
        let before = next.len();
        next.extend(keys.iter().map(|k| k.to_string()));
        if next.len() == before {
            return Ok(());
        }
        self.store_diverted(&mut guard, next)
    }

    /// Clear marks after a structured write of `keys`
    ///
    /// If the cleared set cannot be persisted, the fallback copy is refreshed
    /// instead so the stale mark still reads the latest value.
    fn undivert<'v>(&self, keys: &[&str], value_of: impl Fn(&str) -> Option<&'v [u8]>) {
        let mut guard = self.diverted();
        let current = guard.clone().unwrap_or_default();
        let marked: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| current.contains(*k))
            .collect();
        if marked.is_empty() {
            return;
        }

        let mut next = current;
        for key in &marked {
            next.remove(*key);
        }
        if let Err(e) = self.store_diverted(&mut guard, next) {
            warn!(error = %e, "could not clear diverted keys, refreshing fallback copies");
            for key in marked {
                let refreshed = value_of(key)
                    .map(|bytes| self.fallback.put(key, bytes))
                    .unwrap_or(Ok(()));
                if refreshed.is_err() {
                    // Neither tier agrees; trust the structured copy for this process
                    if let Some(set) = guard.as_mut() {
                        set.remove(key);
                    }
                }
            }
        }
    }
}

fn as_write_failed(key: &str, err: StoreError) -> StoreError {
    match err {
        StoreError::WriteFailed { .. } => err,
        other => StoreError::write_failed(key, other.to_string()),
    }
}
