// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    api::MarketplaceApi,
    config::ClientConfig,
    error::ClientError,
    storage::TokenStore,
    store::SessionStore,
    wallet::{connector::WalletConnector, watcher::SessionNotice, WalletProvider},
};

/// Shared application context handed to views and the wallet connector.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    pub session: SessionStore,
    pub tokens: Arc<dyn TokenStore>,
    pub api: MarketplaceApi,
    pub notices: broadcast::Sender<SessionNotice>,
}

impl AppState {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let session = SessionStore::new();
        let api = MarketplaceApi::new(&config, tokens.clone(), session.clone())?;
        let (notices, _) = broadcast::channel(16);
        Ok(Self {
            config: Arc::new(config),
            session,
            tokens,
            api,
            notices,
        })
    }

    /// Connector for `provider`; `None` when no wallet is installed.
    pub fn connector(&self, provider: Option<Arc<dyn WalletProvider>>) -> WalletConnector {
        WalletConnector::new(self, provider)
    }
}
