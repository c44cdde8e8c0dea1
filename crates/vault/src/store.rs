//! Embedding store: a directory of sealed-token files.
//!
//! Each record is one file named `<record>.sealed` holding a sealed token
//! verbatim. The store never parses or re-frames tokens — they are opaque
//! blobs that only the codec (with the right key) can interpret.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// File extension of persisted tokens.
pub const TOKEN_EXT: &str = "sealed";

/// Errors produced by the embedding store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record name is empty or would escape the store directory.
    #[error("invalid record name: {0:?}")]
    InvalidName(String),

    /// No record with the given name exists.
    #[error("record not found: {0}")]
    NotFound(String),

    /// An underlying filesystem operation failed.
    #[error("store I/O failure")]
    Io(#[from] std::io::Error),
}

/// Directory-backed store of sealed tokens, keyed by record name.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    dir: PathBuf,
}

impl EmbeddingStore {
    /// Open the store at `dir`, creating the directory if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// The directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a record name to its file path, rejecting traversal attempts.
    fn record_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidName(name.to_owned()));
        }
        Ok(self.dir.join(format!("{name}.{TOKEN_EXT}")))
    }

    /// Persist `token` verbatim under `name`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] or [`StoreError::Io`].
    pub async fn save(&self, name: &str, token: &[u8]) -> Result<(), StoreError> {
        let path = self.record_path(name)?;
        fs::write(&path, token).await?;
        debug!(record = name, bytes = token.len(), "sealed token saved");
        Ok(())
    }

    /// Read the token stored under `name`, byte-exact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for a missing record,
    /// [`StoreError::InvalidName`], or [`StoreError::Io`] for any other
    /// filesystem failure.
    pub async fn load(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.record_path(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all records currently present, sorted.
    ///
    /// Files without the `.sealed` extension are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TOKEN_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
