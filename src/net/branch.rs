//! Branch CRUD.

#[cfg(test)]
#[path = "branch_test.rs"]
mod branch_test;

use reqwest::Method;

use super::api::ApiClient;
use super::error::ApiError;
use super::types::{Branch, BranchCreate, BranchUpdate};

const BRANCHES_PATH: &str = "/api/v1/vendor/branches/";

pub struct BranchClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> BranchClient<'a> {
    pub(crate) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn list(&self) -> Result<Vec<Branch>, ApiError> {
        let builder = self.api.request(Method::GET, BRANCHES_PATH, Some(self.token));
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn get(&self, id: &str) -> Result<Branch, ApiError> {
        let builder = self.api.request(Method::GET, &item_path(id), Some(self.token));
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn create(&self, body: &BranchCreate) -> Result<Branch, ApiError> {
        let builder = self
            .api
            .request(Method::POST, BRANCHES_PATH, Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn update(&self, id: &str, body: &BranchUpdate) -> Result<Branch, ApiError> {
        let builder = self
            .api
            .request(Method::PATCH, &item_path(id), Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.api.request(Method::DELETE, &item_path(id), Some(self.token));
        self.api.send_empty(builder).await
    }
}

fn item_path(id: &str) -> String {
    format!("{BRANCHES_PATH}{id}/")
}
