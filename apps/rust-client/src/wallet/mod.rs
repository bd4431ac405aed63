// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider seam, the login handshake and the notification watcher.

pub mod connector;
pub mod local;
pub mod provider;
pub mod watcher;

pub use connector::{AuthHandshake, ConnectOutcome, ConnectState, WalletConnector};
pub use local::LocalWallet;
pub use provider::{ProviderError, ProviderEvent, WalletProvider};
pub use watcher::{ProviderWatcher, SessionNotice, Subscription};
