// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session store.
//!
//! The session is changed only by [`reduce`], a pure function from
//! `(session, event)` to the next session. [`SessionStore`] is the shared
//! context object that applies events and lets observers await changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::User;

/// Authenticated wallet account and the backend user bound to it.
///
/// Invariant: `is_connected` implies a non-empty `address` and `Some(user)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletSession {
    pub address: String,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
    pub user: Option<User>,
}

impl WalletSession {
    /// The empty, disconnected session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Backend user id, when connected.
    pub fn user_id(&self) -> Option<u64> {
        if self.is_connected {
            self.user.as_ref().map(|user| user.id)
        } else {
            None
        }
    }

    /// `0x1234...abcd` form of the connected address.
    pub fn short_address(&self) -> String {
        short_address(&self.address)
    }

    /// Whether `address` is the account this session belongs to.
    pub fn is_same_account(&self, address: &str) -> bool {
        !self.address.is_empty() && self.address.eq_ignore_ascii_case(address)
    }
}

/// Everything that may change the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login exchange completed.
    Connected {
        address: String,
        chain_id: u64,
        user: User,
    },
    /// User asked to disconnect.
    Disconnected,
    /// Provider reported its exposed accounts.
    AccountsChanged(Vec<String>),
    /// Provider switched network; the app reloads.
    ChainChanged(u64),
    /// Backend no longer accepts the bearer token.
    TokenLost,
}

/// Compute the next session. Pure.
pub fn reduce(session: &WalletSession, event: &SessionEvent) -> WalletSession {
    match event {
        SessionEvent::Connected {
            address,
            chain_id,
            user,
        } => {
            if address.is_empty() {
                return session.clone();
            }
            WalletSession {
                address: address.clone(),
                chain_id: Some(*chain_id),
                is_connected: true,
                user: Some(user.clone()),
            }
        }
        SessionEvent::Disconnected | SessionEvent::ChainChanged(_) | SessionEvent::TokenLost => {
            WalletSession::empty()
        }
        SessionEvent::AccountsChanged(accounts) => match accounts.first() {
            Some(active) if session.is_same_account(active) => session.clone(),
            // Empty list or a different account: never adopt the new address.
            _ => WalletSession::empty(),
        },
    }
}

/// Shared handle to the process-wide wallet session.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<WalletSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WalletSession::empty());
        Self { tx: Arc::new(tx) }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> WalletSession {
        self.tx.borrow().clone()
    }

    /// Apply `event` and return the resulting session.
    pub fn dispatch(&self, event: SessionEvent) -> WalletSession {
        let mut next = WalletSession::empty();
        self.tx.send_if_modified(|session| {
            next = reduce(session, &event);
            if *session == next {
                false
            } else {
                *session = next.clone();
                true
            }
        });
        tracing::debug!(
            event = ?event,
            connected = next.is_connected,
            "Wallet session updated"
        );
        next
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorten an address to `0x1234...abcd`.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
