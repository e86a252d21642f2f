//! Vendor profile endpoints.

#[cfg(test)]
#[path = "vendor_test.rs"]
mod vendor_test;

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::api::ApiClient;
use super::error::ApiError;
use super::types::{
    OnboardingStatus, Upload, VendorCreate, VendorDetails, VendorPatch, VendorProfileUpdate, VendorUpdate,
    VerificationStatus,
};

pub struct VendorClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> VendorClient<'a> {
    pub(crate) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn create(&self, body: &VendorCreate) -> Result<VendorDetails, ApiError> {
        let builder = self
            .api
            .request(Method::POST, "/api/v1/vendor/create/", Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }

    /// Partial update. The echo is returned as a patch since the backend
    /// answers with a flat record that may omit nested fields.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn update(&self, body: &VendorUpdate) -> Result<VendorPatch, ApiError> {
        let builder = self
            .api
            .request(Method::PATCH, "/api/v1/vendor/update/", Some(self.token))
            .json(body);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn details(&self) -> Result<VendorDetails, ApiError> {
        let builder = self
            .api
            .request(Method::GET, "/api/v1/vendor/details/", Some(self.token));
        self.api.send_json(builder).await
    }

    /// Multipart profile update; unset fields are not sent.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn update_profile(&self, body: VendorProfileUpdate) -> Result<serde_json::Value, ApiError> {
        let mut form = Form::new();
        for (name, value) in body.text_fields() {
            form = form.text(name, value);
        }
        if let Some(logo) = body.logo {
            form = form.part("logo", file_part(logo));
        }
        if let Some(store_photo) = body.store_photo {
            form = form.part("store_photo", file_part(store_photo));
        }
        let builder = self
            .api
            .request(Method::PATCH, "/api/v1/vendor/profile/update/", Some(self.token))
            .multipart(form);
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn verification_status(&self) -> Result<VerificationStatus, ApiError> {
        let builder = self
            .api
            .request(Method::GET, "/api/v1/vendor/verification-status/", Some(self.token));
        self.api.send_json(builder).await
    }

    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn onboarding_status(&self) -> Result<OnboardingStatus, ApiError> {
        let builder = self
            .api
            .request(Method::GET, "/api/v1/vendor/onboarding-status/", Some(self.token));
        self.api.send_json(builder).await
    }
}

fn file_part(upload: Upload) -> Part {
    Part::bytes(upload.bytes).file_name(upload.file_name)
}
