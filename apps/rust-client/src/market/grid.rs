// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Marketplace grid and the connected user's collection.

use crate::{
    error::{ClientError, Notice},
    market::actions::{is_permitted, NftAction},
    models::{Nft, NftFilter},
    state::AppState,
};

const FETCH_FAILED: &str = "Failed to fetch NFTs";

/// Shown when a refresh returns no items.
pub const EMPTY_GRID: &str = "No NFTs found";

/// What the grid lists.
#[derive(Debug, Clone, PartialEq)]
pub enum GridScope {
    /// `GET /nfts` with a filter.
    Marketplace(NftFilter),
    /// `GET /user/nfts`.
    Collection,
}

/// One grid card, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct NftCard {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub status_label: &'static str,
    pub price_label: Option<String>,
    pub can_buy: bool,
    pub detail_path: String,
}

/// Grid view state.
pub struct MarketplaceView {
    state: AppState,
    scope: GridScope,
    nfts: Vec<Nft>,
    loading: bool,
    notice: Option<Notice>,
    success: Option<String>,
}

impl MarketplaceView {
    /// Marketplace grid with the default filter.
    pub fn marketplace(state: &AppState) -> Self {
        Self::with_scope(state, GridScope::Marketplace(NftFilter::default()))
    }

    /// The connected user's own items.
    pub fn collection(state: &AppState) -> Self {
        Self::with_scope(state, GridScope::Collection)
    }

    pub fn with_scope(state: &AppState, scope: GridScope) -> Self {
        Self {
            state: state.clone(),
            scope,
            nfts: Vec::new(),
            loading: false,
            notice: None,
            success: None,
        }
    }

    pub fn scope(&self) -> &GridScope {
        &self.scope
    }

    /// Replace the marketplace filter. Takes effect on the next refresh.
    pub fn set_filter(&mut self, filter: NftFilter) {
        self.scope = GridScope::Marketplace(filter);
    }

    pub fn nfts(&self) -> &[Nft] {
        &self.nfts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
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

    /// Placeholder text when there is nothing to show.
    pub fn empty_message(&self) -> Option<&'static str> {
        (!self.loading && self.nfts.is_empty()).then_some(EMPTY_GRID)
    }

    /// Reload the list. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = match &self.scope {
            GridScope::Marketplace(filter) => self.state.api.list_nfts(filter).await,
            GridScope::Collection => self.state.api.user_nfts().await,
        };
        self.loading = false;

        match result {
            Ok(nfts) => {
                tracing::debug!(count = nfts.len(), "NFT grid refreshed");
                self.nfts = nfts;
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching NFTs");
                self.notice = Some(e.notice(FETCH_FAILED));
                Err(e)
            }
        }
    }

    pub fn cards(&self) -> Vec<NftCard> {
        let session = self.state.session.snapshot();
        self.nfts
            .iter()
            .map(|nft| NftCard {
                id: nft.id,
                title: nft.title.clone(),
                description: nft.description.clone(),
                image_url: nft.image_url.clone(),
                status_label: nft.status.label(),
                price_label: nft.price_label(),
                can_buy: is_permitted(&session, nft, NftAction::Buy),
                detail_path: format!("/nft/{}", nft.id),
            })
            .collect()
    }

    /// Buy from the grid, then re-fetch that one record in place.
    pub async fn buy(&mut self, nft_id: u64) -> Result<(), ClientError> {
        let action = NftAction::Buy;
        let session = self.state.session.snapshot();
        let permitted = self
            .nfts
            .iter()
            .find(|nft| nft.id == nft_id)
            .is_some_and(|nft| is_permitted(&session, nft, action));
        if !permitted {
            let err = ClientError::validation("This NFT cannot be bought");
            self.notice = Some(err.notice(action.failure_message()));
            return Err(err);
        }

        self.notice = None;
        self.success = None;
        if let Err(e) = self.state.api.buy_nft(nft_id).await {
            tracing::warn!(nft_id, error = %e, "Error buying NFT");
            self.notice = Some(e.notice(action.failure_message()));
            return Err(e);
        }
        self.success = Some(action.success_message().to_string());

        match self.state.api.get_nft(nft_id).await {
            Ok(fresh) => {
                if let Some(slot) = self.nfts.iter_mut().find(|nft| nft.id == nft_id) {
                    *slot = fresh;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(nft_id, error = %e, "Error refreshing NFT");
                self.notice = Some(e.notice(FETCH_FAILED));
                Err(e)
            }
        }
    }
}
