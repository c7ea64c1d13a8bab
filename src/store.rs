use crate::schemas::Document;
use chrono::Utc;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whole-document persistence. Every mutation is a `load`, an in-memory edit
/// and a `save`; concurrent writers race and the last `save` wins.
pub trait Store: Send + Sync {
    fn load(&self) -> Result<Document, StoreError>;
    fn save(&self, document: &Document) -> Result<(), StoreError>;
}

/// A single pretty-printed JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Set when a load had to fall back to an empty document.
    unreadable: AtomicBool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore {
            path: path.into(),
            unreadable: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn initialize(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        info!(path = %self.path.display(), "creating empty document store");
        self.save(&Document::default())
    }

    // Copies the unreadable file aside before the first save replaces it.
    fn keep_unreadable_copy(&self) -> Result<(), StoreError> {
        if !self.unreadable.swap(false, Ordering::SeqCst) || !self.path.exists() {
            return Ok(());
        }
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", Utc::now().timestamp_millis()));
        let backup = PathBuf::from(name);
        fs::copy(&self.path, &backup).map_err(|e| StoreError::io(&backup, e))?;
        warn!(backup = %backup.display(), "kept a copy of the unreadable document before overwriting it");
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Document, StoreError> {
        self.initialize()?;
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        match serde_json::from_str(&content) {
            Ok(document) => Ok(document),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "stored document is corrupt, serving an empty one");
                self.unreadable.store(true, Ordering::SeqCst);
                Ok(Document::default())
            }
        }
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        self.keep_unreadable_copy()?;
        write_atomic_file(&self.path, &bytes)
    }
}

// Each call gets its own temp file, so concurrent saves never share one.
fn write_atomic_file(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}
