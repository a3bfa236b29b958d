//! # Directory Cache
//!
//! A small hot-reloading lookup table backed by a JSON file (bank code →
//! bank display name). The file is re-read only when its modification time
//! moves strictly forward.
//!
//! ## Concurrency
//!
//! The current mapping is an immutable [`DirectorySnapshot`] behind an `Arc`.
//! Readers clone the `Arc` and never observe a partially loaded map. A reload
//! builds a complete new snapshot and swaps the pointer. Reloads are
//! serialized by a mutex and re-check staleness after acquiring it, so
//! concurrent callers that all saw a stale snapshot trigger one read of the
//! file, not one each.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors from loading the directory source.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The backing file does not exist.
    #[error("directory source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The backing file exists but could not be read or stat'd.
    #[error("failed to read directory source {}: {source}", .path.display())]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The backing file is not a JSON object.
    #[error("failed to parse directory source {}: {reason}", .path.display())]
    Parse {
        /// Path of the backing file.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },
}

/// One immutable generation of the directory mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySnapshot<V> {
    entries: BTreeMap<String, V>,
    source_modified_at: Option<SystemTime>,
}

impl<V> DirectorySnapshot<V> {
    fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            source_modified_at: None,
        }
    }

    /// All entries, ordered by key.
    pub fn entries(&self) -> &BTreeMap<String, V> {
        &self.entries
    }

    /// Look up one entry.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Modification time of the file this snapshot was loaded from.
    pub fn source_modified_at(&self) -> Option<SystemTime> {
        self.source_modified_at
    }

    /// A snapshot needs reloading when it is empty, was never loaded, or the
    /// source has a strictly newer modification time.
    fn is_stale(&self, source_modified_at: SystemTime) -> bool {
        match self.source_modified_at {
            _ if self.entries.is_empty() => true,
            None => true,
            Some(cached) => source_modified_at > cached,
        }
    }
}

/// Hot-reloading, mtime-gated cache over a JSON object file.
///
/// `V` is the value type of each entry. Entries whose value does not decode
/// as `V` are skipped, so unrelated top-level fields in the file are
/// tolerated.
#[derive(Debug)]
pub struct DirectoryCache<V = String> {
    path: PathBuf,
    current: RwLock<Arc<DirectorySnapshot<V>>>,
    reload: Mutex<()>,
    _value: PhantomData<fn() -> V>,
}

impl<V> DirectoryCache<V>
where
    V: DeserializeOwned + Send + Sync,
{
    /// Create an empty cache over `path`. Nothing is read until first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(Arc::new(DirectorySnapshot::empty())),
            reload: Mutex::new(()),
            _value: PhantomData,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the current mapping, reloading it first if the source changed.
    pub fn snapshot(&self) -> Result<Arc<DirectorySnapshot<V>>, DirectoryError> {
        let modified = self.source_modified_at()?;

        let current = self.current();
        if !current.is_stale(modified) {
            return Ok(current);
        }

        let _guard = self.reload.lock();
        // Another caller may have reloaded while we waited for the lock.
        let current = self.current();
        if !current.is_stale(modified) {
            return Ok(current);
        }

        let fresh = Arc::new(self.load(modified)?);
        *self.current.write() = Arc::clone(&fresh);
        tracing::info!(
            entries = fresh.len(),
            path = %self.path.display(),
            "loaded directory"
        );
        Ok(fresh)
    }

    /// Convenience lookup through a fresh snapshot.
    pub fn lookup(&self, key: &str) -> Result<Option<V>, DirectoryError>
    where
        V: Clone,
    {
        Ok(self.snapshot()?.get(key).cloned())
    }

    fn current(&self) -> Arc<DirectorySnapshot<V>> {
        Arc::clone(&self.current.read())
    }

    fn source_modified_at(&self) -> Result<SystemTime, DirectoryError> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| self.io_error(e))?;
        metadata.modified().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> DirectoryError {
        if source.kind() == std::io::ErrorKind::NotFound {
            DirectoryError::SourceNotFound(self.path.clone())
        } else {
            DirectoryError::Io {
                path: self.path.clone(),
                source,
            }
        }
    }

    fn load(&self, modified: SystemTime) -> Result<DirectorySnapshot<V>, DirectoryError> {
        let bytes = std::fs::read(&self.path).map_err(|e| self.io_error(e))?;
        let parsed: Value = serde_json::from_slice(&bytes).map_err(|e| DirectoryError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let Value::Object(object) = parsed else {
            return Err(DirectoryError::Parse {
                path: self.path.clone(),
                reason: "expected a JSON object at the top level".to_string(),
            });
        };

        let mut entries = BTreeMap::new();
        for (key, value) in object {
            match serde_json::from_value::<V>(value) {
                Ok(v) => {
                    entries.insert(key, v);
                }
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "skipping directory entry");
                }
            }
        }

        Ok(DirectorySnapshot {
            entries,
            source_modified_at: Some(modified),
        })
    }
}
