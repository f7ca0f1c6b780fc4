//! Simple fallback backend: one file per key

use std::path::{Path, PathBuf};

use super::backend::SimpleBackend;
use super::file_io::{read_bytes, remove_file, write_bytes_atomic};
use crate::error::StoreError;

/// Stores each key as `<dir>/<key>.dat`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::BackendUnavailable(format!(
                "Key '{}' cannot be stored as a file name",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.dat", key)))
    }
}

impl SimpleBackend for FileBackend {
    fn name(&self) -> &'static str {
        "files"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        read_bytes(self.path_for(key)?)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self
            .path_for(key)
            .map_err(|e| StoreError::write_failed(key, e.to_string()))?;
        write_bytes_atomic(path, value).map_err(|e| match e {
            StoreError::WriteFailed { reason, .. } => StoreError::write_failed(key, reason),
            other => other,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        remove_file(self.path_for(key)?)
    }
}
