//! Public reference data: shop types and the location hierarchy.

use reqwest::Method;

use super::api::ApiClient;
use super::error::ApiError;
use super::types::{Country, District, ShopType, State};

pub struct LookupClient<'a> {
    api: &'a ApiClient,
}

impl<'a> LookupClient<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn shop_types(&self) -> Result<Vec<ShopType>, ApiError> {
        let builder = self.api.request(Method::GET, "/api/v1/vendor/shop-types/", None);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        let builder = self.api.request(Method::GET, "/api/v1/location/countries/", None);
        self.api.send_json(builder).await
    }

    /// States of one country.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn states(&self, country_id: &str) -> Result<Vec<State>, ApiError> {
        let builder = self
            .api
            .request(Method::GET, "/api/v1/location/states/", None)
            .query(&[("country", country_id)]);
        self.api.send_json(builder).await
    }

    /// Districts of one state.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn districts(&self, state_id: &str) -> Result<Vec<District>, ApiError> {
        let builder = self
            .api
            .request(Method::GET, "/api/v1/location/districts/", None)
            .query(&[("state", state_id)]);
        self.api.send_json(builder).await
    }
}
