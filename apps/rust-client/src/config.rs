// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the client. Configuration is loaded from the environment at
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SPHERE_API_URL` | Marketplace REST API base URL | `http://localhost:8080/api` |
//! | `SPHERE_CHAIN_ID` | Required chain id (decimal or `0x` hex) | `4` |
//! | `SPHERE_CHAIN_NAME` | Network name sent when adding the chain | `Rinkeby Test Network` |
//! | `SPHERE_CHAIN_RPC_URL` | RPC URL sent when adding the chain | Rinkeby Infura URL |
//! | `SPHERE_CHAIN_EXPLORER_URL` | Explorer URL sent when adding the chain | `https://rinkeby.etherscan.io` |
//! | `SPHERE_VERIFY_CHAIN_RPC` | Check a chain's RPC reports its chain id before the local wallet adds it (`true`/`false`) | `false` |
//! | `SPHERE_TOKEN_PATH` | Directory holding the bearer token | `.sphere` |
//! | `SPHERE_HTTP_TIMEOUT_SECS` | HTTP request timeout | `15` |
//! | `SPHERE_REDIRECT_DELAY_MS` | Delay before leaving the upload page | `2000` |
//! | `WALLET_PRIVATE_KEY` | Hex key for the local wallet (CLI) | Optional |
//! | `WALLET_KEY_PEM_PATH` | PEM key file for the local wallet (CLI) | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::time::Duration;

use crate::blockchain::{parse_chain_id, NetworkConfig};
use crate::storage::paths::DATA_ROOT;

/// Environment variable name for the marketplace API base URL.
pub const API_URL_ENV: &str = "SPHERE_API_URL";
/// Environment variable name for the required chain id.
pub const CHAIN_ID_ENV: &str = "SPHERE_CHAIN_ID";
/// Environment variable name for the required chain's display name.
pub const CHAIN_NAME_ENV: &str = "SPHERE_CHAIN_NAME";
/// Environment variable name for the required chain's RPC URL.
pub const CHAIN_RPC_URL_ENV: &str = "SPHERE_CHAIN_RPC_URL";
/// Environment variable name for the required chain's explorer URL.
pub const CHAIN_EXPLORER_URL_ENV: &str = "SPHERE_CHAIN_EXPLORER_URL";
/// Environment variable name for the add-chain RPC check.
pub const VERIFY_CHAIN_RPC_ENV: &str = "SPHERE_VERIFY_CHAIN_RPC";
/// Environment variable name for the token storage directory.
pub const TOKEN_PATH_ENV: &str = "SPHERE_TOKEN_PATH";
/// Environment variable name for the HTTP timeout in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "SPHERE_HTTP_TIMEOUT_SECS";
/// Environment variable name for the post-upload redirect delay in milliseconds.
pub const REDIRECT_DELAY_ENV: &str = "SPHERE_REDIRECT_DELAY_MS";
/// Environment variable name for the local wallet's hex private key.
pub const WALLET_PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
/// Environment variable name for the local wallet's PEM key file.
pub const WALLET_KEY_PEM_PATH_ENV: &str = "WALLET_KEY_PEM_PATH";
/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Where the local wallet's key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletKeySource {
    Hex(String),
    PemFile(PathBuf),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: url::Url,
    pub network: NetworkConfig,
    /// Local wallet checks a chain's RPC endpoint before adding it.
    pub verify_chain_rpc: bool,
    pub token_dir: PathBuf,
    pub http_timeout: Duration,
    pub redirect_delay: Duration,
    pub wallet_key: Option<WalletKeySource>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: url::Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            network: NetworkConfig::rinkeby(),
            verify_chain_rpc: false,
            token_dir: PathBuf::from(DATA_ROOT),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            wallet_key: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(API_URL_ENV) {
            config.api_url = url::Url::parse(raw.trim())
                .map_err(|e| ConfigError::invalid(API_URL_ENV, e.to_string()))?;
        }

        if let Some(raw) = get(CHAIN_ID_ENV) {
            config.network.chain_id =
                parse_chain_id(&raw).map_err(|reason| ConfigError::invalid(CHAIN_ID_ENV, reason))?;
        }
        if let Some(name) = get(CHAIN_NAME_ENV) {
            config.network.name = name;
        }
        if let Some(rpc_url) = get(CHAIN_RPC_URL_ENV) {
            config.network.rpc_url = rpc_url;
        }
        if let Some(explorer_url) = get(CHAIN_EXPLORER_URL_ENV) {
            config.network.explorer_url = explorer_url;
        }

        if let Some(raw) = get(VERIFY_CHAIN_RPC_ENV) {
            config.verify_chain_rpc = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::invalid(
                        VERIFY_CHAIN_RPC_ENV,
                        "expected true or false",
                    ))
                }
            };
        }

        if let Some(dir) = get(TOKEN_PATH_ENV) {
            config.token_dir = PathBuf::from(dir);
        }

        if let Some(raw) = get(HTTP_TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(HTTP_TIMEOUT_ENV, "expected whole seconds"))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get(REDIRECT_DELAY_ENV) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(REDIRECT_DELAY_ENV, "expected milliseconds"))?;
            config.redirect_delay = Duration::from_millis(millis);
        }

        config.wallet_key = match (get(WALLET_PRIVATE_KEY_ENV), get(WALLET_KEY_PEM_PATH_ENV)) {
            (Some(hex), _) => Some(WalletKeySource::Hex(hex)),
            (None, Some(path)) => Some(WalletKeySource::PemFile(PathBuf::from(path))),
            (None, None) => None,
        };

        Ok(config)
    }
}
