// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sphere Client - Wallet-authenticated NFT marketplace client
//!
//! Client-side semantics of the Sphere marketplace: the wallet login
//! handshake, the wallet session store, the REST client and headless
//! controllers for the marketplace views.
//!
//! ## Modules
//!
//! - `api` - REST client for the marketplace backend (reqwest)
//! - `blockchain` - Network descriptors, key loading, EIP-191 signing (alloy)
//! - `market` - Grid, detail and upload controllers
//! - `storage` - Bearer token persistence
//! - `store` - Wallet session and its reducer
//! - `wallet` - Provider seam, login handshake, notification watcher

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod wallet;

#[cfg(test)]
mod testing;
