//! Durable bearer-token storage.
//!
//! DESIGN
//! ======
//! One opaque string under one key. [`FileTokenStore`] writes a temp file
//! and renames it over the target so a crash never leaves a half-written
//! token; on unix the temp file is created `0600`, so the token is never
//! readable by other users even briefly. [`MemoryTokenStore`] backs tests and
//! ephemeral sessions; clones share the same slot, so a second store built
//! from a clone sees what the first persisted.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn io(context: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { context, source }
    }
}

/// Persisted bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the token; `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing medium cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing medium cannot be written.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Erase the token. Erasing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing medium cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// FILE
// =============================================================================

#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io("failed to read token file")(err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::io("failed to create token directory"))?;
        }
        let temp_path = self.path.with_extension("tmp");
        write_owner_only(&temp_path, token)?;
        fs::rename(&temp_path, &self.path).map_err(StorageError::io("failed to replace token file"))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io("failed to delete token file")(err)),
        }
    }
}

/// Write `token` to a fresh file that is `0600` from creation on unix.
/// A leftover temp file from an interrupted save is removed first so its
/// permissions are never inherited.
fn write_owner_only(path: &Path, token: &str) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(StorageError::io("failed to remove stale token temp file")(err)),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(StorageError::io("failed to create token temp file"))?;
    file.write_all(token.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(StorageError::io("failed to write token temp file"))
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(token.to_owned()))) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
