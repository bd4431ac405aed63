// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Injected-wallet provider interface.
//!
//! Mirrors the request methods and notifications of a standard browser
//! wallet (EIP-1193), with error codes from EIP-1193 and EIP-3085.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::blockchain::NetworkConfig;

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested account has not been authorized.
pub const CODE_UNAUTHORIZED: i64 = 4100;
/// EIP-1193: the provider is disconnected from all chains.
pub const CODE_DISCONNECTED: i64 = 4900;
/// EIP-3085: the chain has not been added to the wallet.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

/// Errors reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("User rejected the request")]
    UserRejected,

    #[error("Account has not been authorized")]
    Unauthorized,

    #[error("Provider is disconnected")]
    Disconnected,

    #[error("Unrecognized chain id {0}")]
    UnrecognizedChain(u64),

    #[error("Provider error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl ProviderError {
    /// Numeric provider error code.
    pub fn code(&self) -> i64 {
        match self {
            ProviderError::UserRejected => CODE_USER_REJECTED,
            ProviderError::Unauthorized => CODE_UNAUTHORIZED,
            ProviderError::Disconnected => CODE_DISCONNECTED,
            ProviderError::UnrecognizedChain(_) => CODE_UNRECOGNIZED_CHAIN,
            ProviderError::Rpc { code, .. } => *code,
        }
    }

    /// Build an error from a raw provider `{code, message}` pair.
    ///
    /// `chain_id` is the chain the failed request concerned, if any.
    pub fn from_code(code: i64, message: impl Into<String>, chain_id: Option<u64>) -> Self {
        match (code, chain_id) {
            (CODE_USER_REJECTED, _) => ProviderError::UserRejected,
            (CODE_UNAUTHORIZED, _) => ProviderError::Unauthorized,
            (CODE_DISCONNECTED, _) => ProviderError::Disconnected,
            (CODE_UNRECOGNIZED_CHAIN, Some(chain_id)) => ProviderError::UnrecognizedChain(chain_id),
            (code, _) => ProviderError::Rpc {
                code,
                message: message.into(),
            },
        }
    }
}

/// Notifications pushed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `accountsChanged`: the accounts now exposed to the app (may be empty).
    AccountsChanged(Vec<String>),
    /// `chainChanged`: the wallet moved to another chain.
    ChainChanged(u64),
    /// `disconnect`: the provider lost its connection.
    Disconnect,
}

/// Wallet provider as injected into the app.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`: ask the user to expose accounts.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `eth_chainId`: chain the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError>;

    /// `personal_sign`: sign `message` with `address`'s key. Returns `0x` hex.
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, ProviderError>;

    /// Subscribe to provider notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_code() {
        for err in [
            ProviderError::UserRejected,
            ProviderError::Unauthorized,
            ProviderError::Disconnected,
            ProviderError::UnrecognizedChain(4),
        ] {
            assert_eq!(ProviderError::from_code(err.code(), "", Some(4)), err);
        }
    }

    #[test]
    fn unrecognized_chain_without_chain_id_stays_raw() {
        let err = ProviderError::from_code(4902, "Unrecognized chain ID", None);
        assert_eq!(
            err,
            ProviderError::Rpc {
                code: 4902,
                message: "Unrecognized chain ID".into()
            }
        );
        assert_eq!(err.code(), 4902);
    }

    #[test]
    fn unknown_codes_keep_message() {
        let err = ProviderError::from_code(-32603, "Internal error", None);
        assert_eq!(err.to_string(), "Provider error -32603: Internal error");
    }
}
