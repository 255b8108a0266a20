//! Artifact persistence.
//!
//! The report only needs two operations from storage: make sure the output
//! directory exists, and write one file. [`LocalStore`] backs them with the
//! local filesystem; [`MemoryStore`] keeps artifacts in memory.

use crate::error::WriteError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Where rendered artifacts end up.
pub trait ArtifactStore: Send + Sync {
    /// Create `path` (and parents) if missing. An existing directory is not an error.
    fn ensure_directory(&self, path: &Path) -> Result<(), WriteError>;

    /// Write `bytes` to `path`, replacing any previous content.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), WriteError>;
}

/// Local filesystem store.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl ArtifactStore for LocalStore {
    fn ensure_directory(&self, path: &Path) -> Result<(), WriteError> {
        if !path.is_dir() {
            tracing::info!("Creating output directory: {}", path.display());
        }
        std::fs::create_dir_all(path).map_err(|source| WriteError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
        std::fs::write(path, bytes).map_err(|source| WriteError {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory store keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    directories: Mutex<Vec<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of every file written so far, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Content of a written file.
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }

    /// Directories created so far, in creation order.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.directories
            .lock()
            .map(|dirs| dirs.clone())
            .unwrap_or_default()
    }
}

fn poisoned(path: &Path) -> WriteError {
    WriteError {
        path: path.to_path_buf(),
        source: std::io::Error::other("memory store lock poisoned"),
    }
}

impl ArtifactStore for MemoryStore {
    fn ensure_directory(&self, path: &Path) -> Result<(), WriteError> {
        let mut dirs = self.directories.lock().map_err(|_| poisoned(path))?;
        if !dirs.iter().any(|d| d == path) {
            dirs.push(path.to_path_buf());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
        let parent_known = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self
                .directories
                .lock()
                .map_err(|_| poisoned(path))?
                .iter()
                .any(|d| d == parent),
            _ => true,
        };
        if !parent_known {
            return Err(WriteError {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "parent directory does not exist",
                ),
            });
        }

        self.files
            .lock()
            .map_err(|_| poisoned(path))?
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// Create the store artifacts are written to.
pub fn create_output_store() -> Arc<dyn ArtifactStore> {
    Arc::new(LocalStore)
}
