//! Backend traits for the durable key-value layer
//!
//! The primary backend is asynchronous and transactional; the fallback is a
//! plain synchronous map. Neither knows anything about ledger entities.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;

/// Asynchronous, transactional storage (the primary tier)
#[async_trait]
pub trait StructuredBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Write several keys in one transaction: all or nothing
    async fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), StoreError>;
}

/// Opens the structured backend; invoked at most once per storage handle
#[async_trait]
pub trait StructuredOpener: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn StructuredBackend>, StoreError>;
}

/// Synchronous key-value storage (the fallback tier)
pub trait SimpleBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove a key; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
