//! Texture stores: where converted bytes end up.
//!
//! A [`TextureStore`] writes encoded texture bytes under a file-name
//! key. [`DirectoryStore`] persists atomically (temp file + rename), so
//! a failed conversion or write never leaves a partial output behind.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Errors from writing texture bytes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file name is empty or would escape the store root.
    #[error("invalid output file name '{0}'")]
    InvalidFileName(String),

    /// An I/O failure while writing.
    #[error("failed to write '{path}': {source}")]
    Io {
        /// Target path of the write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Atomically persisting the temp file failed.
    #[error("failed to persist output: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Destination for converted texture bytes, keyed by file name.
pub trait TextureStore: Send + Sync {
    /// Writes the full encoded content under the given file name.
    /// Either the complete content becomes visible or nothing does.
    fn write(&self, file_name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// File-system store writing into a flat directory.
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// A store over an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the directory (and parents) and returns a store over it.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// The directory outputs are written into.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TextureStore for DirectoryStore {
    fn write(&self, file_name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name == ".." {
            return Err(StoreError::InvalidFileName(file_name.to_string()));
        }

        let target = self.root.join(file_name);
        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.root).map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
        tmp.write_all(bytes).map_err(|source| StoreError::Io {
            path: target.clone(),
            source,
        })?;
        tmp.persist(target)?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes written under a file name, if any.
    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(file_name).cloned()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl TextureStore for MemoryStore {
    fn write(&self, file_name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if file_name.is_empty() {
            return Err(StoreError::InvalidFileName(file_name.to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(file_name.to_string(), bytes.to_vec());
        Ok(())
    }
}
