//! Vendor declaration.

use reqwest::Method;

use super::api::ApiClient;
use super::error::ApiError;
use super::types::Declaration;

const DECLARATION_PATH: &str = "/api/v1/vendor/declaration/";

pub struct DeclarationClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> DeclarationClient<'a> {
    pub(crate) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    /// Fetch the signed declaration; `None` when the vendor has not signed.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx status
    /// other than 404.
    pub async fn get(&self) -> Result<Option<Declaration>, ApiError> {
        let builder = self.api.request(Method::GET, DECLARATION_PATH, Some(self.token));
        self.api.send_optional(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn submit(&self, body: &Declaration) -> Result<Declaration, ApiError> {
        let builder = self
            .api
            .request(Method::POST, DECLARATION_PATH, Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }
}
