// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network types and constants.

use serde::{Deserialize, Serialize};

/// Native currency descriptor advertised to a wallet when registering a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// EVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: String,
    /// Native currency of the chain
    pub currency: NativeCurrency,
}

/// Default chain the marketplace contracts are deployed on.
pub const DEFAULT_CHAIN_ID: u64 = 4;

/// Symbol used by the marketplace for listing prices.
pub const MARKET_CURRENCY: &str = "SPH";

impl NetworkConfig {
    /// Rinkeby test network, the marketplace's historical deployment target.
    pub fn rinkeby() -> Self {
        Self {
            name: "Rinkeby Test Network".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: "https://rinkeby.infura.io/v3/".to_string(),
            explorer_url: "https://rinkeby.etherscan.io".to_string(),
            currency: NativeCurrency {
                name: "Ethereum".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
        }
    }

    /// Chain id in the `0x`-prefixed quantity form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Parameters for a `wallet_addEthereumChain` request.
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.name.clone(),
            native_currency: self.currency.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }
}

/// EIP-3085 `wallet_addEthereumChain` parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// Parse a chain id given either as decimal (`4`) or hex quantity (`0x4`).
pub fn parse_chain_id(raw: &str) -> Result<u64, String> {
    let value = raw.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|_| format!("`{raw}` is not a valid chain id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_hex_is_minimal_quantity() {
        assert_eq!(NetworkConfig::rinkeby().chain_id_hex(), "0x4");

        let mut network = NetworkConfig::rinkeby();
        network.chain_id = 11155111;
        assert_eq!(network.chain_id_hex(), "0xaa36a7");
    }

    #[test]
    fn add_chain_params_use_wallet_field_names() {
        let params = NetworkConfig::rinkeby().add_chain_params();
        let value = serde_json::to_value(&params).unwrap();

        assert_eq!(value["chainId"], "0x4");
        assert_eq!(value["chainName"], "Rinkeby Test Network");
        assert_eq!(value["nativeCurrency"]["symbol"], "ETH");
        assert_eq!(value["nativeCurrency"]["decimals"], 18);
        assert_eq!(value["rpcUrls"][0], "https://rinkeby.infura.io/v3/");
        assert_eq!(value["blockExplorerUrls"][0], "https://rinkeby.etherscan.io");
    }

    #[test]
    fn parse_chain_id_accepts_decimal_and_hex() {
        assert_eq!(parse_chain_id("4"), Ok(4));
        assert_eq!(parse_chain_id("0x4"), Ok(4));
        assert_eq!(parse_chain_id(" 0xAA36A7 "), Ok(11155111));
        assert!(parse_chain_id("rinkeby").is_err());
        assert!(parse_chain_id("0x").is_err());
    }
}
