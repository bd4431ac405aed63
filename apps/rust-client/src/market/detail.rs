// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT detail view controller.
//!
//! Holds one NFT record and runs its actions. Every action is a single REST
//! call followed by a re-fetch of the record; local state is only ever
//! replaced by what the backend returns, never updated optimistically.

use crate::{
    error::{ClientError, Notice},
    market::actions::{is_permitted, permitted_action, NftAction},
    models::Nft,
    state::AppState,
};

const LOAD_FAILED: &str = "Failed to load NFT details";
const INVALID_PRICE: &str = "Please enter a valid price";

/// Shown instead of actions while no wallet is connected.
pub const CONNECT_PROMPT: &str = "Connect your wallet to interact with this NFT";

/// Detail page state for a single NFT.
pub struct NftDetailView {
    state: AppState,
    nft_id: u64,
    nft: Option<Nft>,
    busy: bool,
    notice: Option<Notice>,
    success: Option<String>,
}

impl NftDetailView {
    pub fn new(state: &AppState, nft_id: u64) -> Self {
        Self {
            state: state.clone(),
            nft_id,
            nft: None,
            busy: false,
            notice: None,
            success: None,
        }
    }

    /// Fetch the record.
    pub async fn load(&mut self) -> Result<&Nft, ClientError> {
        match self.state.api.get_nft(self.nft_id).await {
            Ok(nft) => Ok(&*self.nft.insert(nft)),
            Err(e) => {
                tracing::warn!(nft_id = self.nft_id, error = %e, "Error fetching NFT");
                self.notice = Some(e.notice(LOAD_FAILED));
                Err(e)
            }
        }
    }

    pub fn nft(&self) -> Option<&Nft> {
        self.nft.as_ref()
    }

    /// The action the current session may take on this NFT.
    pub fn action(&self) -> Option<NftAction> {
        let nft = self.nft.as_ref()?;
        permitted_action(&self.state.session.snapshot(), nft)
    }

    /// Prompt to connect, when no wallet session exists.
    pub fn connect_prompt(&self) -> Option<&'static str> {
        (!self.state.session.snapshot().is_connected).then_some(CONNECT_PROMPT)
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub async fn mint(&mut self) -> Result<(), ClientError> {
        self.perform(NftAction::Mint, None).await
    }

    /// List for sale at the price typed by the user.
    pub async fn list_for_sale(&mut self, price_input: &str) -> Result<(), ClientError> {
        let price = match parse_price(price_input) {
            Ok(price) => price,
            Err(e) => {
                self.notice = Some(e.notice(INVALID_PRICE));
                return Err(e);
            }
        };
        self.perform(NftAction::ListForSale, Some(price)).await
    }

    pub async fn buy(&mut self) -> Result<(), ClientError> {
        self.perform(NftAction::Buy, None).await
    }

    async fn perform(&mut self, action: NftAction, price: Option<f64>) -> Result<(), ClientError> {
        if self.busy {
            return Err(ClientError::Busy);
        }
        let Some(nft) = self.nft.as_ref() else {
            return Err(ClientError::validation("NFT details are not loaded"));
        };
        if !is_permitted(&self.state.session.snapshot(), nft, action) {
            let err = ClientError::validation(format!("{action:?} is not available for this NFT"));
            self.notice = Some(err.notice(action.failure_message()));
            return Err(err);
        }
        let nft_id = nft.id;

        self.busy = true;
        self.notice = None;
        self.success = None;

        let api = &self.state.api;
        let result = match (action, price) {
            (NftAction::Mint, _) => api.mint_nft(nft_id).await,
            (NftAction::ListForSale, Some(price)) => api.list_nft(nft_id, price).await,
            (NftAction::ListForSale, None) => Err(ClientError::validation(INVALID_PRICE)),
            (NftAction::Buy, _) => api.buy_nft(nft_id).await,
        };

        let outcome = match result {
            Ok(_) => {
                self.success = Some(action.success_message().to_string());
                match api.get_nft(nft_id).await {
                    Ok(fresh) => {
                        self.nft = Some(fresh);
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(nft_id, error = %e, "Error refreshing NFT");
                        self.notice = Some(e.notice(LOAD_FAILED));
                        Err(e)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(nft_id, action = ?action, error = %e, "NFT action failed");
                self.notice = Some(e.notice(action.failure_message()));
                Err(e)
            }
        };

        self.busy = false;
        outcome
    }
}

/// Parse a listing price: a finite number greater than zero.
pub fn parse_price(input: &str) -> Result<f64, ClientError> {
    match input.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(ClientError::validation(INVALID_PRICE)),
    }
}
