// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-local storage.
//!
//! ```text
//! .sphere/
//! └── token.json      # { "token": "<bearer token>" }
//! ```

pub mod paths;
pub mod token_store;

pub use paths::StoragePaths;
pub use token_store::{
    FileTokenStore, MemoryTokenStore, StorageError, StorageResult, TokenStore,
};
