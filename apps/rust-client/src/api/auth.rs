// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet login endpoints.

use crate::{
    error::ClientError,
    models::{AuthResponse, LoginRequest, NonceResponse},
};

use super::MarketplaceApi;

impl MarketplaceApi {
    /// `GET /auth/nonce?address=…`: one-time challenge for `address`.
    pub async fn get_nonce(&self, address: &str) -> Result<NonceResponse, ClientError> {
        let request = self.get("auth/nonce")?.query(&[("address", address)]);
        self.send_public(request).await
    }

    /// `POST /auth/login`: exchange a signed challenge for a bearer token.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let request = self.post("auth/login")?.json(request);
        self.send_public(request).await
    }
}
