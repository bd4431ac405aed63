// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Which item actions a session may take.

use crate::{
    models::{Nft, NftStatus},
    store::WalletSession,
};

/// Per-item action a user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NftAction {
    Mint,
    ListForSale,
    Buy,
}

impl NftAction {
    /// Fallback notice when the backend gives no reason for a failure.
    pub fn failure_message(&self) -> &'static str {
        match self {
            NftAction::Mint => "Failed to mint NFT",
            NftAction::ListForSale => "Failed to list NFT",
            NftAction::Buy => "Failed to buy NFT",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            NftAction::Mint => "NFT minted successfully!",
            NftAction::ListForSale => "NFT listed for sale successfully!",
            NftAction::Buy => "NFT purchased successfully!",
        }
    }
}

/// Whether the session's user owns `nft`. Always false when disconnected.
pub fn is_owner(session: &WalletSession, nft: &Nft) -> bool {
    session.user_id() == Some(nft.owner_id)
}

/// The action enabled for `nft`, if any.
///
/// | status   | owner | connected | action        |
/// |----------|-------|-----------|---------------|
/// | uploaded | yes   | yes       | mint          |
/// | minted   | yes   | yes       | list-for-sale |
/// | listed   | no    | yes       | buy           |
///
/// Every other combination is view-only.
pub fn permitted_action(session: &WalletSession, nft: &Nft) -> Option<NftAction> {
    if !session.is_connected {
        return None;
    }
    match (nft.status, is_owner(session, nft)) {
        (NftStatus::Uploaded, true) => Some(NftAction::Mint),
        (NftStatus::Minted, true) => Some(NftAction::ListForSale),
        (NftStatus::Listed, false) => Some(NftAction::Buy),
        _ => None,
    }
}

/// Whether `action` is enabled for `nft`.
pub fn is_permitted(session: &WalletSession, nft: &Nft, action: NftAction) -> bool {
    permitted_action(session, nft) == Some(action)
}
