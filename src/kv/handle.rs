//! Memoized access to the structured backend
//!
//! The opener runs at most once. Every caller, including ones racing on the
//! first access, sees the same outcome: the open backend, or `None` when
//! opening failed and the layer is running on the fallback alone.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::backend::{StructuredBackend, StructuredOpener};
use crate::error::StoreError;

pub struct StorageHandle {
    opener: Box<dyn StructuredOpener>,
    cell: OnceCell<Option<Arc<dyn StructuredBackend>>>,
}

impl StorageHandle {
    pub fn new(opener: Box<dyn StructuredOpener>) -> Self {
        Self {
            opener,
            cell: OnceCell::new(),
        }
    }

    /// A handle whose structured backend is already open
    pub fn with_backend(backend: Arc<dyn StructuredBackend>) -> Self {
        Self {
            opener: Box::new(Unavailable),
            cell: OnceCell::new_with(Some(Some(backend))),
        }
    }

    /// A handle that never has a structured backend
    pub fn unavailable() -> Self {
        Self {
            opener: Box::new(Unavailable),
            cell: OnceCell::new_with(Some(None)),
        }
    }

    /// The structured backend, opening it on first use
    pub async fn get(&self) -> Option<Arc<dyn StructuredBackend>> {
        self.cell
            .get_or_init(|| async {
                match self.opener.open().await {
                    Ok(backend) => {
                        debug!(backend = backend.name(), "opened structured storage");
                        Some(backend)
                    }
                    Err(e) => {
                        warn!(error = %e, "structured storage unavailable, using fallback");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Whether initialization has already run
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

struct Unavailable;

#[async_trait]
impl StructuredOpener for Unavailable {
    async fn open(&self) -> Result<Arc<dyn StructuredBackend>, StoreError> {
        Err(StoreError::BackendUnavailable(
            "no structured backend configured".into(),
        ))
    }
}
