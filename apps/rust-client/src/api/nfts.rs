// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT endpoints: browsing, upload and the mint/list/buy actions.

use reqwest::multipart::{Form, Part};

use crate::{
    error::ClientError,
    market::upload::UploadForm,
    models::{ActionResponse, ListNftRequest, Nft, NftFilter, NftIdRequest, UploadResponse},
};

use super::MarketplaceApi;

impl MarketplaceApi {
    /// `GET /nfts/:id`.
    pub async fn get_nft(&self, id: u64) -> Result<Nft, ClientError> {
        let request = self.get(&format!("nfts/{id}"))?;
        self.send_public(request).await
    }

    /// `GET /nfts`: marketplace page matching `filter`.
    pub async fn list_nfts(&self, filter: &NftFilter) -> Result<Vec<Nft>, ClientError> {
        let request = self.get("nfts")?.query(filter);
        self.send_public(request).await
    }

    /// `GET /user/nfts`: items owned by the authenticated user.
    pub async fn user_nfts(&self) -> Result<Vec<Nft>, ClientError> {
        let request = self.get("user/nfts")?;
        self.send_authorized(request).await
    }

    /// `POST /nfts/upload` as `multipart/form-data`.
    pub async fn upload_nft(&self, form: &UploadForm) -> Result<UploadResponse, ClientError> {
        let file = form
            .file
            .as_ref()
            .ok_or_else(|| ClientError::validation("Please fill in all fields and upload an image"))?;

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.mime_type())?;
        let body = Form::new()
            .text("title", form.title.clone())
            .text("description", form.description.clone())
            .text("category", form.category.clone())
            .part("file", part);

        let request = self.post("nfts/upload")?.multipart(body);
        self.send_authorized(request).await
    }

    /// `POST /nfts/mint`.
    pub async fn mint_nft(&self, nft_id: u64) -> Result<ActionResponse, ClientError> {
        let request = self.post("nfts/mint")?.json(&NftIdRequest { nft_id });
        self.send_authorized(request).await
    }

    /// `POST /nfts/list`.
    pub async fn list_nft(&self, nft_id: u64, price: f64) -> Result<ActionResponse, ClientError> {
        let request = self
            .post("nfts/list")?
            .json(&ListNftRequest { nft_id, price });
        self.send_authorized(request).await
    }

    /// `POST /nfts/buy`.
    pub async fn buy_nft(&self, nft_id: u64) -> Result<ActionResponse, ClientError> {
        let request = self.post("nfts/buy")?.json(&NftIdRequest { nft_id });
        self.send_authorized(request).await
    }
}
