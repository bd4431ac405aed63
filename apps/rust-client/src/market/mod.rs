// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Headless marketplace views: grid, detail and upload.

pub mod actions;
pub mod detail;
pub mod grid;
pub mod upload;

pub use actions::{is_permitted, permitted_action, NftAction};
pub use detail::NftDetailView;
pub use grid::{GridScope, MarketplaceView, NftCard};
pub use upload::{UploadFile, UploadFlow, UploadForm, UploadReceipt};
