// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Provider notification watcher.
//!
//! Runs for the lifetime of an authenticated session and applies the
//! provider's account, chain and disconnect notifications to it:
//!
//! - accounts changed to `[]`, or to a different first account: the session
//!   is reset and the stored token removed. The new account is never adopted.
//! - chain changed: the in-memory session is reset and a reload is requested.
//!   The token is kept.
//! - disconnect: handled like accounts changed to `[]`.
//!
//! Each rule ends the session, so the watcher stops after applying one. It
//! also stops when the session ends elsewhere, e.g. the backend rejecting the
//! token.
//! The returned [`Subscription`] cancels the watcher when dropped.

use std::sync::Arc;

use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    state::AppState,
    storage::TokenStore,
    store::{SessionEvent, SessionStore, WalletSession},
};

use super::provider::{ProviderEvent, WalletProvider};

/// What the rest of the app should do after the watcher ended a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// Network changed: reload from scratch.
    ReloadRequired { chain_id: u64 },
    /// Account access was lost; the user must connect again.
    SessionCleared,
}

/// Background task applying provider notifications to the session.
pub struct ProviderWatcher {
    session: SessionStore,
    tokens: Arc<dyn TokenStore>,
    notices: broadcast::Sender<SessionNotice>,
    events: broadcast::Receiver<ProviderEvent>,
    session_changes: watch::Receiver<WalletSession>,
}

impl ProviderWatcher {
    /// Subscribes to `provider` immediately; notifications sent from here on
    /// are seen by the watcher.
    pub fn new(state: &AppState, provider: &dyn WalletProvider) -> Self {
        Self {
            session: state.session.clone(),
            tokens: state.tokens.clone(),
            notices: state.notices.clone(),
            events: provider.subscribe(),
            session_changes: state.session.subscribe(),
        }
    }

    /// Spawn the watcher and return its handle.
    pub fn spawn(self) -> Subscription {
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(self.run(shutdown.clone()));
        Subscription {
            shutdown,
            task: Some(task),
        }
    }

    /// Run until the session ends, the provider goes away or the token is
    /// cancelled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        debug!("Provider watcher started");
        loop {
            let event = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    debug!("Provider watcher cancelled");
                    return;
                }
                _ = self.session_changes.changed() => None,
                event = self.events.recv() => Some(event),
            };

            let Some(event) = event else {
                if self.session.snapshot().is_connected {
                    continue;
                }
                debug!("Session ended, provider watcher stopping");
                return;
            };

            match event {
                Ok(event) => {
                    if let Some(notice) = self.apply(event) {
                        // Nobody listening is fine.
                        let _ = self.notices.send(notice);
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Provider watcher lagged behind notifications");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Provider closed its notification channel");
                    return;
                }
            }
        }
    }

    /// Apply one notification. Returns the notice when the session ended.
    fn apply(&self, event: ProviderEvent) -> Option<SessionNotice> {
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                let current = self.session.snapshot();
                if accounts.first().is_some_and(|a| current.is_same_account(a)) {
                    return None;
                }
                info!(
                    previous = %current.short_address(),
                    accounts = accounts.len(),
                    "Wallet account changed, clearing session"
                );
                self.clear_token();
                self.session.dispatch(SessionEvent::AccountsChanged(accounts));
                Some(SessionNotice::SessionCleared)
            }
            ProviderEvent::Disconnect => {
                info!("Wallet provider disconnected, clearing session");
                self.clear_token();
                self.session
                    .dispatch(SessionEvent::AccountsChanged(Vec::new()));
                Some(SessionNotice::SessionCleared)
            }
            ProviderEvent::ChainChanged(chain_id) => {
                info!(chain_id, "Wallet network changed, reload required");
                self.session.dispatch(SessionEvent::ChainChanged(chain_id));
                Some(SessionNotice::ReloadRequired { chain_id })
            }
        }
    }

    fn clear_token(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to remove auth token");
        }
    }
}

/// Handle to a running watcher. Dropping it cancels the watcher.
pub struct Subscription {
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// Whether the watcher is still running.
    pub fn is_active(&self) -> bool {
        !self.shutdown.is_cancelled()
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel and wait for the watcher task to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
