// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token persistence.
//!
//! The token issued by `POST /auth/login` is the only credential kept on the
//! client. It outlives the in-memory wallet session (a reload keeps it) and is
//! removed on disconnect, account change, or when the backend rejects it.

use std::fs;
use std::io;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::StoragePaths;

/// Error type for token storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token store lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Client-local storage for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Current token, if any.
    fn get(&self) -> StorageResult<Option<String>>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> StorageResult<()>;

    /// Remove the stored token. Removing an absent token is not an error.
    fn clear(&self) -> StorageResult<()>;
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> StorageResult<Option<String>> {
        let token = self.token.read().map_err(|_| StorageError::Poisoned)?;
        Ok(token.clone())
    }

    fn set(&self, token: &str) -> StorageResult<()> {
        let mut slot = self.token.write().map_err(|_| StorageError::Poisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut slot = self.token.write().map_err(|_| StorageError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Token store backed by a JSON file under [`StoragePaths::root`].
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    paths: StoragePaths,
}

impl FileTokenStore {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> StorageResult<Option<String>> {
        let bytes = match fs::read(self.paths.token_file()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: TokenFile = serde_json::from_slice(&bytes)?;
        Ok(Some(file.token))
    }

    fn set(&self, token: &str) -> StorageResult<()> {
        fs::create_dir_all(self.paths.root())?;

        // Replace atomically: write a sibling file, then rename over the target.
        let path = self.paths.token_file();
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec(&TokenFile {
            token: token.to_string(),
        })?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(self.paths.token_file()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_store() -> (tempfile::TempDir, FileTokenStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::new(StoragePaths::new(dir.path().join("client")));
        (dir, store)
    }

    #[test]
    fn memory_store_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("t1").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("t1"));

        store.set("t2").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("t2"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn file_store_missing_file_reads_as_none() {
        let (_dir, store) = file_store();
        assert_eq!(store.get().unwrap(), None);
        store.clear().expect("clearing an absent token is fine");
    }

    #[test]
    fn file_store_persists_across_instances() {
        let (_dir, store) = file_store();
        store.set("t1").unwrap();
        assert!(store.paths().token_file().exists());

        let reopened = FileTokenStore::new(store.paths().clone());
        assert_eq!(reopened.get().unwrap().as_deref(), Some("t1"));

        reopened.clear().unwrap();
        assert!(!store.paths().token_file().exists());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let (_dir, store) = file_store();
        fs::create_dir_all(store.paths().root()).unwrap();
        fs::write(store.paths().token_file(), b"not json").unwrap();

        assert!(matches!(store.get(), Err(StorageError::Json(_))));
    }
}
