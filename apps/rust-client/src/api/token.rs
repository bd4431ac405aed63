// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::{error::ClientError, models::TokenPrice};

use super::MarketplaceApi;

impl MarketplaceApi {
    /// `GET /token/price`: current price of the marketplace currency.
    pub async fn token_price(&self) -> Result<TokenPrice, ClientError> {
        let request = self.get("token/price")?;
        self.send_public(request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{BackendState, FakeBackend};

    #[tokio::test]
    async fn reads_token_price() {
        let backend = FakeBackend::start(BackendState::new()).await;
        let price = backend.app_state().api.token_price().await.unwrap();
        assert_eq!(price.price, 0.25);
    }

    #[tokio::test]
    async fn server_error_without_body_message() {
        let backend =
            FakeBackend::start(BackendState::new().fail("GET /token/price", 500, None)).await;
        let err = backend.app_state().api.token_price().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.notice("Failed to get token price").message, "Failed to get token price");
    }
}
