// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM chain integration.
//!
//! This module provides functionality for:
//! - Network descriptors used when asking a wallet to switch or add a chain
//! - Local key loading and EIP-191 personal-message signing
//! - Querying an RPC endpoint's chain id

pub mod client;
pub mod signing;
pub mod types;

pub use client::{ChainClient, ChainError};
pub use types::*;
