//! Discount CRUD.

#[cfg(test)]
#[path = "discount_test.rs"]
mod discount_test;

use reqwest::Method;

use super::api::ApiClient;
use super::error::ApiError;
use super::types::{Discount, DiscountCreate, DiscountUpdate};

const DISCOUNTS_PATH: &str = "/api/v1/vendor/discounts/";

pub struct DiscountClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> DiscountClient<'a> {
    pub(crate) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn list(&self) -> Result<Vec<Discount>, ApiError> {
        let builder = self.api.request(Method::GET, DISCOUNTS_PATH, Some(self.token));
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn create(&self, body: &DiscountCreate) -> Result<Discount, ApiError> {
        let builder = self
            .api
            .request(Method::POST, DISCOUNTS_PATH, Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn update(&self, id: &str, body: &DiscountUpdate) -> Result<Discount, ApiError> {
        let builder = self
            .api
            .request(Method::PATCH, &format!("{DISCOUNTS_PATH}{id}/"), Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let builder = self
            .api
            .request(Method::DELETE, &format!("{DISCOUNTS_PATH}{id}/"), Some(self.token));
        self.api.send_empty(builder).await
    }
}
