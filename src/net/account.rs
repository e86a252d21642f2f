//! Account endpoints and the session-facing API seam.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::Form;

use super::api::ApiClient;
use super::error::ApiError;
use super::types::{FirebaseAuthResponse, OnboardingStatus, UserInfo, VendorDetails};

const USER_TYPE_VENDOR: &str = "vendor";

/// The four backend reads and exchanges the session store depends on.
///
/// Implemented by [`ApiClient`]; tests substitute an in-memory fake.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Exchange an identity assertion for a backend session.
    async fn exchange_identity(&self, id_token: &str) -> Result<FirebaseAuthResponse, ApiError>;

    async fn user_info(&self, token: &str) -> Result<UserInfo, ApiError>;

    async fn onboarding_status(&self, token: &str) -> Result<OnboardingStatus, ApiError>;

    async fn vendor_details(&self, token: &str) -> Result<VendorDetails, ApiError>;
}

pub struct AccountClient<'a> {
    api: &'a ApiClient,
}

impl<'a> AccountClient<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `POST /api/v1/account/firebase_authenticate/` as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status. A new
    /// account without a password carries
    /// [`super::error::ErrorKind::NewUserRequiresPassword`].
    pub async fn firebase_authenticate(&self, id_token: &str) -> Result<FirebaseAuthResponse, ApiError> {
        let form = Form::new()
            .text("id_token", id_token.to_owned())
            .text("user_type", USER_TYPE_VENDOR);
        let builder = self
            .api
            .request(Method::POST, "/api/v1/account/firebase_authenticate/", None)
            .multipart(form);
        self.api.send_json(builder).await
    }

    /// `GET /api/v1/account/user_info/`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    pub async fn user_info(&self, token: &str) -> Result<UserInfo, ApiError> {
        let builder = self
            .api
            .request(Method::GET, "/api/v1/account/user_info/", Some(token));
        self.api.send_json(builder).await
    }
}

#[async_trait]
impl SessionApi for ApiClient {
    async fn exchange_identity(&self, id_token: &str) -> Result<FirebaseAuthResponse, ApiError> {
        self.account().firebase_authenticate(id_token).await
    }

    async fn user_info(&self, token: &str) -> Result<UserInfo, ApiError> {
        self.account().user_info(token).await
    }

    async fn onboarding_status(&self, token: &str) -> Result<OnboardingStatus, ApiError> {
        self.vendors(token).onboarding_status().await
    }

    async fn vendor_details(&self, token: &str) -> Result<VendorDetails, ApiError> {
        self.vendors(token).details().await
    }
}
