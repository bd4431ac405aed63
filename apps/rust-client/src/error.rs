// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::{config::ConfigError, storage::StorageError};

/// Error taxonomy for everything a user action can run into.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("No wallet provider found. Please install a browser wallet to use this application.")]
    ProviderMissing,

    #[error("Wallet access request was rejected")]
    UserRejected,

    #[error("Wrong network: {0}")]
    NetworkMismatch(String),

    #[error("Signature request was rejected")]
    SignatureRejected,

    #[error("{0}")]
    Validation(String),

    #[error("{}", .message.as_deref().unwrap_or("Request failed"))]
    Backend { status: u16, message: Option<String> },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Another request is already in progress")]
    Busy,
}

/// Coarse classification used by notices and connector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ProviderMissing,
    UserRejected,
    NetworkMismatch,
    SignatureRejected,
    Validation,
    Backend,
    Busy,
}

impl ClientError {
    pub fn backend(status: u16, message: Option<String>) -> Self {
        ClientError::Backend { status, message }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::ProviderMissing => ErrorKind::ProviderMissing,
            ClientError::UserRejected => ErrorKind::UserRejected,
            ClientError::NetworkMismatch(_) => ErrorKind::NetworkMismatch,
            ClientError::SignatureRejected => ErrorKind::SignatureRejected,
            ClientError::Validation(_) | ClientError::Config(_) => ErrorKind::Validation,
            ClientError::Backend { .. }
            | ClientError::Transport(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Storage(_) => ErrorKind::Backend,
            ClientError::Busy => ErrorKind::Busy,
        }
    }

    /// HTTP status of a backend rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Inline notice for this error.
    ///
    /// Backend failures show the message from the response body; when there
    /// is none (or the request never got a response) `fallback` is shown.
    pub fn notice(&self, fallback: &str) -> Notice {
        let message = match self {
            ClientError::Backend {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ClientError::Backend { .. }
            | ClientError::Transport(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Storage(_) => fallback.to_string(),
            other => other.to_string(),
        };
        Notice {
            kind: self.kind(),
            message,
        }
    }
}

/// Dismissible inline error notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}
