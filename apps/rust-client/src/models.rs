// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies exchanged with the marketplace REST API.
//!
//! ## Model Categories
//!
//! - **Auth**: nonce challenge, login exchange, the authenticated user
//! - **NFTs**: marketplace records and the action request bodies
//! - **Token**: marketplace currency price

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blockchain::MARKET_CURRENCY;

// =============================================================================
// Auth Models
// =============================================================================

/// Response of `GET /auth/nonce`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NonceResponse {
    /// One-time value bound to `message`.
    pub nonce: String,
    /// Challenge the wallet must sign.
    pub message: String,
    /// Whether a user is already registered for the address.
    pub exists: bool,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub address: String,
    pub signature: String,
    pub nonce: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Backend user record attached to a wallet session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Name to show for this user: the username, or the numeric id.
    pub fn display_name(&self) -> String {
        if self.username.is_empty() {
            self.id.to_string()
        } else {
            self.username.clone()
        }
    }
}

// =============================================================================
// NFT Models
// =============================================================================

/// Lifecycle of a marketplace item. Transitions happen server-side only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NftStatus {
    Uploaded,
    Minted,
    Listed,
    Owned,
    #[serde(other)]
    Unknown,
}

impl NftStatus {
    /// Capitalised label, e.g. `Listed`.
    pub fn label(&self) -> &'static str {
        match self {
            NftStatus::Uploaded => "Uploaded",
            NftStatus::Minted => "Minted",
            NftStatus::Listed => "Listed",
            NftStatus::Owned => "Owned",
            NftStatus::Unknown => "Unknown",
        }
    }
}

/// Marketplace NFT record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nft {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub image_url: String,
    #[serde(default)]
    pub metadata_url: String,
    pub status: NftStatus,
    #[serde(default)]
    pub price: Option<f64>,
    pub creator_id: u64,
    pub owner_id: u64,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub creator: Option<User>,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Nft {
    /// On-chain token id, once minted. The backend sends `""` before minting.
    pub fn token_id(&self) -> Option<&str> {
        self.token_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Price label for listed items, e.g. `2.5 SPH`.
    pub fn price_label(&self) -> Option<String> {
        match (self.status, self.price) {
            (NftStatus::Listed, Some(price)) => Some(format!("{price} {MARKET_CURRENCY}")),
            _ => None,
        }
    }

    /// Creator's username, falling back to the creator id.
    pub fn creator_name(&self) -> String {
        match &self.creator {
            Some(user) if !user.username.is_empty() => user.username.clone(),
            _ => self.creator_id.to_string(),
        }
    }

    /// Owner's username, falling back to the owner id.
    pub fn owner_name(&self) -> String {
        match &self.owner {
            Some(user) if !user.username.is_empty() => user.username.clone(),
            _ => self.owner_id.to_string(),
        }
    }
}

/// Body of `POST /nfts/mint` and `POST /nfts/buy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NftIdRequest {
    pub nft_id: u64,
}

/// Body of `POST /nfts/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListNftRequest {
    pub nft_id: u64,
    pub price: f64,
}

/// Response of `POST /nfts/mint`, `/nfts/list` and `/nfts/buy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub nft: Option<Nft>,
}

/// Response of `POST /nfts/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub id: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Query for `GET /nfts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftFilter {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "minPrice", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl Default for NftFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            category: None,
            min_price: None,
            max_price: None,
        }
    }
}

// =============================================================================
// Token Models
// =============================================================================

/// Response of `GET /token/price`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TokenPrice {
    pub price: f64,
}
