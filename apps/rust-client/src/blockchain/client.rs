// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client used to check what chain an RPC endpoint serves.

use alloy::{
    network::Ethereum,
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};

use super::types::NetworkConfig;

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// EVM chain client for a single RPC endpoint.
pub struct ChainClient {
    network: NetworkConfig,
    provider: HttpProvider,
}

impl ChainClient {
    /// Create a new client for the specified network.
    pub fn new(network: NetworkConfig) -> Result<Self, ChainError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { network, provider })
    }

    /// Chain id reported by the RPC endpoint (`eth_chainId`).
    pub async fn get_chain_id(&self) -> Result<u64, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::RpcError(e.to_string()))
    }

    /// Confirm the endpoint serves the chain id the configuration claims.
    pub async fn verify_chain_id(&self) -> Result<(), ChainError> {
        let reported = self.get_chain_id().await?;
        if reported == self.network.chain_id {
            Ok(())
        } else {
            Err(ChainError::ChainIdMismatch {
                expected: self.network.chain_id,
                reported,
            })
        }
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

/// Errors that can occur during chain and key operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("RPC endpoint serves chain {reported}, expected {expected}")]
    ChainIdMismatch { expected: u64, reported: u64 },
}
