// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for client-local storage.

use std::path::{Path, PathBuf};

/// Default directory for client-local state, relative to the working directory.
pub const DATA_ROOT: &str = ".sphere";

/// Storage path utilities for client-local state.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all client data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the persisted bearer token.
    pub fn token_file(&self) -> PathBuf {
        self.root.join("token.json")
    }
}
