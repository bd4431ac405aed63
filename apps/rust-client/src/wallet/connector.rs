// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet login handshake.
//!
//! ```text
//! Idle -> RequestingAccounts -> CheckingNetwork -> FetchingNonce
//!      -> AwaitingSignature -> ExchangingToken -> Connected
//! ```
//!
//! Any failure returns to `Idle` carrying the notice for the error. When the
//! backend does not know the address yet, the handshake stops after the
//! signature and is handed to registration instead of being exchanged.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, Notice},
    models::LoginRequest,
    state::AppState,
    store::{SessionEvent, WalletSession},
};

use super::{
    provider::{ProviderError, WalletProvider, CODE_UNRECOGNIZED_CHAIN},
    watcher::{ProviderWatcher, Subscription},
};

const CONNECT_FAILED: &str = "Failed to connect wallet";

/// Handshake progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectState {
    /// Not connecting. Carries the notice of the last failure, if any.
    Idle(Option<Notice>),
    RequestingAccounts,
    CheckingNetwork,
    FetchingNonce,
    AwaitingSignature,
    ExchangingToken,
    Connected,
}

impl ConnectState {
    /// The step that follows this one on success.
    pub fn successor(&self) -> Option<ConnectState> {
        match self {
            ConnectState::Idle(_) => Some(ConnectState::RequestingAccounts),
            ConnectState::RequestingAccounts => Some(ConnectState::CheckingNetwork),
            ConnectState::CheckingNetwork => Some(ConnectState::FetchingNonce),
            ConnectState::FetchingNonce => Some(ConnectState::AwaitingSignature),
            ConnectState::AwaitingSignature => Some(ConnectState::ExchangingToken),
            ConnectState::ExchangingToken => Some(ConnectState::Connected),
            ConnectState::Connected => None,
        }
    }

    /// Whether a handshake is in flight.
    pub fn in_progress(&self) -> bool {
        !matches!(self, ConnectState::Idle(_) | ConnectState::Connected)
    }
}

/// Signed challenge, used once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHandshake {
    pub address: String,
    pub nonce: String,
    pub message: String,
    pub signature: String,
}

/// How a completed handshake ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Logged in; the session is populated and the token stored.
    Connected(WalletSession),
    /// Unknown address. Registration takes over with the signed challenge.
    RegistrationRequired(AuthHandshake),
}

/// Runs the login handshake against a wallet provider.
pub struct WalletConnector {
    state: AppState,
    provider: Option<Arc<dyn WalletProvider>>,
    fsm: Arc<watch::Sender<ConnectState>>,
    busy: Arc<AtomicBool>,
    subscription: Mutex<Option<Subscription>>,
}

impl WalletConnector {
    /// `provider` is `None` when no wallet is installed.
    pub fn new(state: &AppState, provider: Option<Arc<dyn WalletProvider>>) -> Self {
        let (fsm, _) = watch::channel(ConnectState::Idle(None));
        Self {
            state: state.clone(),
            provider,
            fsm: Arc::new(fsm),
            busy: Arc::new(AtomicBool::new(false)),
            subscription: Mutex::new(None),
        }
    }

    pub fn provider_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Current handshake step.
    pub fn state(&self) -> ConnectState {
        self.fsm.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectState> {
        self.fsm.subscribe()
    }

    /// Whether `connect` is in flight. A UI disables its button on this.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Whether a provider watcher is running for the current session.
    pub fn is_watching(&self) -> bool {
        self.lock_subscription()
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Run the handshake.
    ///
    /// Fails with [`ClientError::Busy`] while another handshake is running.
    /// A live session keeps its watcher until a new login replaces it.
    pub async fn connect(&self) -> Result<ConnectOutcome, ClientError> {
        let _guard = BusyGuard::acquire(&self.busy, &self.fsm)?;
        self.fsm.send_replace(ConnectState::Idle(None));

        match self.handshake().await {
            Ok(outcome) => {
                let done = match &outcome {
                    ConnectOutcome::Connected(_) => ConnectState::Connected,
                    ConnectOutcome::RegistrationRequired(_) => ConnectState::Idle(None),
                };
                self.fsm.send_replace(done);
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                self.fsm
                    .send_replace(ConnectState::Idle(Some(e.notice(CONNECT_FAILED))));
                Err(e)
            }
        }
    }

    /// End the session: stop watching, reset the session, drop the token.
    pub fn disconnect(&self) -> Result<(), ClientError> {
        self.release_watcher();
        self.state.session.dispatch(SessionEvent::Disconnected);
        let cleared = self.state.tokens.clear();
        self.fsm.send_replace(ConnectState::Idle(None));
        info!("Wallet disconnected");
        cleared.map_err(ClientError::from)
    }

    async fn handshake(&self) -> Result<ConnectOutcome, ClientError> {
        let provider = self.provider.as_ref().ok_or(ClientError::ProviderMissing)?;

        self.advance(ConnectState::RequestingAccounts);
        let accounts = provider.request_accounts().await.map_err(|e| {
            debug!(error = %e, "Account request failed");
            ClientError::UserRejected
        })?;
        let address = accounts
            .into_iter()
            .next()
            .filter(|address| !address.is_empty())
            .ok_or(ClientError::UserRejected)?;

        self.advance(ConnectState::CheckingNetwork);
        let chain_id = self.ensure_network(provider.as_ref()).await?;

        self.advance(ConnectState::FetchingNonce);
        let challenge = self.state.api.get_nonce(&address).await?;

        self.advance(ConnectState::AwaitingSignature);
        let signature = provider
            .sign_message(&address, &challenge.message)
            .await
            .map_err(|e| {
                debug!(error = %e, "Signature request failed");
                ClientError::SignatureRejected
            })?;

        if !challenge.exists {
            info!(address = %address, "Address not registered, handing off to registration");
            return Ok(ConnectOutcome::RegistrationRequired(AuthHandshake {
                address,
                nonce: challenge.nonce,
                message: challenge.message,
                signature,
            }));
        }

        self.advance(ConnectState::ExchangingToken);
        let auth = self
            .state
            .api
            .login(&LoginRequest {
                address: address.clone(),
                signature,
                nonce: challenge.nonce,
            })
            .await?;
        self.state.tokens.set(&auth.token)?;

        let session = self.state.session.dispatch(SessionEvent::Connected {
            address,
            chain_id,
            user: auth.user,
        });
        let subscription = ProviderWatcher::new(&self.state, provider.as_ref()).spawn();
        // Dropping the previous subscription cancels it.
        let previous = self.lock_subscription().replace(subscription);
        drop(previous);

        info!(
            address = %session.short_address(),
            user_id = ?session.user_id(),
            chain_id,
            "Wallet connected"
        );
        Ok(ConnectOutcome::Connected(session))
    }

    /// Bring the wallet onto the configured chain, registering the chain
    /// with the wallet when it does not know it. Returns the chain id the
    /// wallet reports afterwards.
    async fn ensure_network(&self, provider: &dyn WalletProvider) -> Result<u64, ClientError> {
        let required = &self.state.config.network;
        let mismatch = |e: ProviderError| {
            warn!(error = %e, chain_id = required.chain_id, "Network switch failed");
            ClientError::NetworkMismatch(format!("please switch to {}", required.name))
        };

        let current = provider.chain_id().await.map_err(mismatch)?;
        if current == required.chain_id {
            return Ok(current);
        }

        info!(from = current, to = required.chain_id, "Switching wallet network");
        match provider.switch_chain(required.chain_id).await {
            Ok(()) => {}
            Err(e) if e.code() == CODE_UNRECOGNIZED_CHAIN => {
                provider.add_chain(required).await.map_err(mismatch)?;
                provider
                    .switch_chain(required.chain_id)
                    .await
                    .map_err(mismatch)?;
            }
            Err(e) => return Err(mismatch(e)),
        }

        let reported = provider.chain_id().await.map_err(mismatch)?;
        if reported != required.chain_id {
            return Err(ClientError::NetworkMismatch(format!(
                "wallet is on chain {reported}, expected {}",
                required.chain_id
            )));
        }
        Ok(reported)
    }

    fn advance(&self, next: ConnectState) {
        self.fsm.send_modify(|state| {
            if state.successor().as_ref() != Some(&next) {
                warn!(from = ?state, to = ?next, "Unexpected handshake transition");
            }
            debug!(state = ?next, "Handshake step");
            *state = next;
        });
    }

    fn release_watcher(&self) {
        if let Some(subscription) = self.lock_subscription().take() {
            subscription.cancel();
        }
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Holds the busy flag for one handshake. Released on drop, which also
/// returns an abandoned handshake to `Idle`.
struct BusyGuard {
    busy: Arc<AtomicBool>,
    fsm: Arc<watch::Sender<ConnectState>>,
}

impl BusyGuard {
    fn acquire(
        busy: &Arc<AtomicBool>,
        fsm: &Arc<watch::Sender<ConnectState>>,
    ) -> Result<Self, ClientError> {
        busy.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ClientError::Busy)?;
        Ok(Self {
            busy: busy.clone(),
            fsm: fsm.clone(),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.fsm.send_if_modified(|state| {
            if state.in_progress() {
                *state = ConnectState::Idle(None);
                true
            } else {
                false
            }
        });
        self.busy.store(false, Ordering::SeqCst);
    }
}
