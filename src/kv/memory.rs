//! In-memory backends
//!
//! Used for ephemeral ledgers and for exercising the fallback paths in tests:
//! reads and writes can be switched to fail on demand.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::backend::{SimpleBackend, StructuredBackend, StructuredOpener};
use crate::error::StoreError;

/// A name→bytes map that implements both backend tiers
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    failing_keys: Mutex<BTreeSet<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail (or succeed again)
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes of one key fail
    pub fn fail_writes_for(&self, key: &str) {
        lock(&self.failing_keys).insert(key.to_string());
    }

    /// Current value of a key, bypassing failure switches
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        lock(&self.data).get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        lock(&self.data).keys().cloned().collect()
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::BackendUnavailable(format!(
                "read of '{}' refused",
                key
            )));
        }
        Ok(self.peek(key))
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) || lock(&self.failing_keys).contains(key) {
            return Err(StoreError::write_failed(key, "write refused"));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl StructuredBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(key)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.check_write(key)?;
        lock(&self.data).insert(key.to_string(), value);
        Ok(())
    }

    async fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        for (key, _) in &entries {
            self.check_write(key)?;
        }
        let mut data = lock(&self.data);
        for (key, value) in entries {
            data.insert(key, value);
        }
        Ok(())
    }
}

impl SimpleBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.check_write(key)?;
        lock(&self.data).insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_write(key)?;
        lock(&self.data).remove(key);
        Ok(())
    }
}

/// Hands out one shared [`MemoryBackend`] and counts how often it was asked
pub struct MemoryOpener {
    backend: Arc<MemoryBackend>,
    opens: Arc<AtomicUsize>,
    fail: bool,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn with_backend(backend: Arc<MemoryBackend>) -> Self {
        Self {
            backend,
            opens: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// An opener whose open always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn open_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.opens)
    }
}

impl Default for MemoryOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StructuredOpener for MemoryOpener {
    async fn open(&self) -> Result<Arc<dyn StructuredBackend>, StoreError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        // Give racing callers a chance to pile up on the cell
        tokio::task::yield_now().await;
        if self.fail {
            return Err(StoreError::BackendUnavailable("memory open refused".into()));
        }
        Ok(Arc::clone(&self.backend) as Arc<dyn StructuredBackend>)
    }
}
