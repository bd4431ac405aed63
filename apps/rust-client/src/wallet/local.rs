// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process wallet backed by a secp256k1 key.
//!
//! Behaves like an injected browser wallet that approves every prompt:
//! accounts are exposed after `request_accounts`, chains must be added
//! before they can be switched to, and notifications are broadcast to
//! subscribers.

use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex, RwLock,
};

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::blockchain::{
    signing::{sign_personal_message, signer_from_hex, signer_from_pem},
    ChainClient, ChainError, NetworkConfig,
};

use super::provider::{ProviderError, ProviderEvent, WalletProvider};

/// JSON-RPC internal error code.
const CODE_INTERNAL: i64 = -32603;

fn internal(err: impl ToString) -> ProviderError {
    ProviderError::Rpc {
        code: CODE_INTERNAL,
        message: err.to_string(),
    }
}

/// Local key wallet.
pub struct LocalWallet {
    signer: RwLock<PrivateKeySigner>,
    authorized: AtomicBool,
    chain_id: AtomicU64,
    known_chains: Mutex<HashSet<u64>>,
    verify_rpc: bool,
    events: broadcast::Sender<ProviderEvent>,
}

impl LocalWallet {
    /// Wallet sitting on `chain_id`, the only chain it knows initially.
    pub fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            signer: RwLock::new(signer),
            authorized: AtomicBool::new(false),
            chain_id: AtomicU64::new(chain_id),
            known_chains: Mutex::new(HashSet::from([chain_id])),
            verify_rpc: false,
            events,
        }
    }

    pub fn from_hex(private_key_hex: &str, chain_id: u64) -> Result<Self, ChainError> {
        Ok(Self::new(signer_from_hex(private_key_hex)?, chain_id))
    }

    pub fn from_pem(pem_bytes: &[u8], chain_id: u64) -> Result<Self, ChainError> {
        Ok(Self::new(signer_from_pem(pem_bytes)?, chain_id))
    }

    /// Check a network's RPC endpoint before adding it.
    pub fn with_rpc_verification(mut self) -> Self {
        self.verify_rpc = true;
        self
    }

    /// Checksummed address of the current key.
    pub fn address(&self) -> String {
        self.read_signer().address().to_string()
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    /// Replace the key, as when the user picks another account.
    pub fn switch_signer(&self, signer: PrivateKeySigner) {
        let address = signer.address().to_string();
        *self.signer.write().unwrap_or_else(|e| e.into_inner()) = signer;
        if self.is_authorized() {
            self.notify(ProviderEvent::AccountsChanged(vec![address]));
        }
    }

    /// Withdraw the app's account access.
    pub fn revoke(&self) {
        if self.authorized.swap(false, Ordering::SeqCst) {
            self.notify(ProviderEvent::AccountsChanged(Vec::new()));
        }
    }

    /// Drop the connection to every chain.
    pub fn disconnect(&self) {
        self.authorized.store(false, Ordering::SeqCst);
        self.notify(ProviderEvent::Disconnect);
    }

    fn read_signer(&self) -> std::sync::RwLockReadGuard<'_, PrivateKeySigner> {
        self.signer.read().unwrap_or_else(|e| e.into_inner())
    }

    fn knows_chain(&self, chain_id: u64) -> bool {
        self.known_chains
            .lock()
            .map(|chains| chains.contains(&chain_id))
            .unwrap_or(false)
    }

    fn notify(&self, event: ProviderEvent) {
        tracing::debug!(event = ?event, "Wallet notification");
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.authorized.store(true, Ordering::SeqCst);
        Ok(vec![self.address()])
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        if !self.knows_chain(chain_id) {
            return Err(ProviderError::UnrecognizedChain(chain_id));
        }
        let previous = self.chain_id.swap(chain_id, Ordering::SeqCst);
        if previous != chain_id {
            self.notify(ProviderEvent::ChainChanged(chain_id));
        }
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError> {
        if self.verify_rpc {
            let client = ChainClient::new(network.clone()).map_err(internal)?;
            client.verify_chain_id().await.map_err(internal)?;
        }
        self.known_chains
            .lock()
            .map_err(internal)?
            .insert(network.chain_id);
        tracing::info!(chain_id = network.chain_id, name = %network.name, "Network added to wallet");
        Ok(())
    }

    async fn sign_message(&self, address: &str, message: &str) -> Result<String, ProviderError> {
        if !self.is_authorized() {
            return Err(ProviderError::Unauthorized);
        }
        let signer = self.read_signer();
        if !signer.address().to_string().eq_ignore_ascii_case(address) {
            return Err(ProviderError::Unauthorized);
        }
        sign_personal_message(&signer, message).map_err(internal)
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
