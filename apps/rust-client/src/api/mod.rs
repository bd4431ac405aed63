// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Marketplace REST Client
//!
//! Typed access to the marketplace backend. Endpoint groups live in their own
//! files (`auth`, `nfts`, `token`) as `impl MarketplaceApi` blocks.
//!
//! ## Errors
//!
//! Any non-2xx response becomes [`ClientError::Backend`] carrying the status
//! and the `error` field of the JSON body when present. A 401 on a request
//! that carried a bearer token means the token is no longer accepted: it is
//! removed from the token store and the wallet session is reset.
//!
//! No request is retried.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    config::ClientConfig,
    error::ClientError,
    storage::TokenStore,
    store::{SessionEvent, SessionStore},
};

pub mod auth;
pub mod nfts;
pub mod token;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Marketplace API client.
#[derive(Clone)]
pub struct MarketplaceApi {
    base_url: Url,
    http: Client,
    tokens: Arc<dyn TokenStore>,
    session: SessionStore,
}

impl MarketplaceApi {
    pub fn new(
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
        session: SessionStore,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            base_url: normalize_base(config.api_url.clone()),
            http,
            tokens,
            session,
        })
    }

    /// Base URL every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path such as `nfts/upload`.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidResponse(format!("bad endpoint `{path}`: {e}")))
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, ClientError> {
        Ok(self.http.get(self.endpoint(path)?))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ClientError> {
        Ok(self.http.post(self.endpoint(path)?))
    }

    /// Send a request that needs no credentials.
    async fn send_public<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }

    /// Send a request with the stored bearer token attached, if any.
    async fn send_authorized<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let token = self.tokens.get()?;
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED && token.is_some() {
            tracing::warn!("Bearer token rejected by backend, clearing session");
            if let Err(e) = self.tokens.clear() {
                tracing::warn!(error = %e, "Failed to remove rejected token");
            }
            self.session.dispatch(SessionEvent::TokenLost);
        }
        decode(response).await
    }
}

/// Ensure the base path ends in `/` so relative joins append instead of replace.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Map a response to `T` or to a backend error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.error);
        return Err(ClientError::backend(status.as_u16(), message));
    }

    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
