//! REST transport for the vendor backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`ApiClient`] owns the HTTP connection pool, base URL and timeouts. The
//! resource-family clients (`account`, `vendor`, `branch`, `discount`,
//! `declaration`, `lookup`) borrow it together with the bearer token, so a
//! token-requiring call cannot be issued without one.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is returned to the caller as an [`ApiError`]. Nothing here
//! retries or swallows errors.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::account::AccountClient;
use super::branch::BranchClient;
use super::declaration::DeclarationClient;
use super::discount::DiscountClient;
use super::error::ApiError;
use super::lookup::LookupClient;
use super::vendor::VendorClient;
use crate::config::Timeouts;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` with the given request/connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // RESOURCE FAMILIES
    // =========================================================================

    #[must_use]
    pub fn account(&self) -> AccountClient<'_> {
        AccountClient::new(self)
    }

    #[must_use]
    pub fn vendors<'a>(&'a self, token: &'a str) -> VendorClient<'a> {
        VendorClient::new(self, token)
    }

    #[must_use]
    pub fn branches<'a>(&'a self, token: &'a str) -> BranchClient<'a> {
        BranchClient::new(self, token)
    }

    #[must_use]
    pub fn discounts<'a>(&'a self, token: &'a str) -> DiscountClient<'a> {
        DiscountClient::new(self, token)
    }

    #[must_use]
    pub fn declarations<'a>(&'a self, token: &'a str) -> DeclarationClient<'a> {
        DeclarationClient::new(self, token)
    }

    #[must_use]
    pub fn lookups(&self) -> LookupClient<'_> {
        LookupClient::new(self)
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a request, attaching `Authorization: Bearer <token>` when given.
    pub(crate) fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        tracing::debug!(%method, path, "backend request");
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode a JSON success body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let (status, text) = send(builder).await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &text));
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and decode, mapping 404 to `None`.
    pub(crate) async fn send_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let (status, text) = send(builder).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &text));
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and ignore any success body (DELETE).
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let (status, text) = send(builder).await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &text));
        }
        Ok(())
    }
}

async fn send(builder: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "backend request failed");
    }
    Ok((status, text))
}
