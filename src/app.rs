//! Application root: the object graph every flow and command borrows.
//!
//! DESIGN
//! ======
//! `AppContext` is built once at startup and owns the API client, the
//! session store and (when configured) the identity provider. Nothing in
//! the crate reaches for global state; flows take `&AppContext`.

use std::sync::Arc;

use crate::config::{ConfigError, PortalConfig};
use crate::identity::{FirebaseIdentity, IdentityError, IdentityProvider};
use crate::net::{ApiClient, ApiError};
use crate::state::{FileTokenStore, SessionStore, TokenStore};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

pub struct AppContext {
    pub config: PortalConfig,
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppContext {
    /// Wire the production graph: HTTP client, file token store, and the
    /// Firebase bridge when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if an HTTP client cannot be built.
    pub fn from_config(config: PortalConfig) -> Result<Self, AppError> {
        let api = Arc::new(ApiClient::new(&config.api_base_url, config.timeouts)?);
        let storage: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_path));
        let identity: Option<Arc<dyn IdentityProvider>> = match config.require_firebase_key() {
            Ok(key) => Some(Arc::new(FirebaseIdentity::new(
                &config.firebase_auth_base_url,
                key,
                config.timeouts,
            )?)),
            Err(e) => {
                tracing::debug!(error = %e, "identity provider disabled");
                None
            }
        };
        Ok(Self::new(config, api, storage, identity))
    }

    #[must_use]
    pub fn new(
        config: PortalConfig,
        api: Arc<ApiClient>,
        storage: Arc<dyn TokenStore>,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(api.clone(), storage));
        Self { config, api, session, identity }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no identity provider is configured.
    pub fn identity(&self) -> Result<&dyn IdentityProvider, ConfigError> {
        self.identity
            .as_deref()
            .ok_or(ConfigError::Missing("FIREBASE_API_KEY"))
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::config::Timeouts;
    use crate::identity::{FederatedCredential, FederatedPrompt, IdentityAssertion};
    use crate::state::MemoryTokenStore;
    use mockito::{Mock, ServerGuard};

    pub const TEST_TOKEN: &str = "tok";

    /// Identity provider answering every sign-in with one canned result.
    pub struct StubIdentity {
        pub result: Result<IdentityAssertion, IdentityError>,
    }

    impl StubIdentity {
        #[must_use]
        pub fn ok(id_token: &str, email: &str) -> Arc<dyn IdentityProvider> {
            Arc::new(Self {
                result: Ok(IdentityAssertion { id_token: id_token.to_owned(), email: Some(email.to_owned()) }),
            })
        }

        #[must_use]
        pub fn err(error: IdentityError) -> Arc<dyn IdentityProvider> {
            Arc::new(Self { result: Err(error) })
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for StubIdentity {
        async fn sign_in_with_password(&self, _: &str, _: &str) -> Result<IdentityAssertion, IdentityError> {
            self.result.clone()
        }

        async fn sign_up_with_password(&self, _: &str, _: &str) -> Result<IdentityAssertion, IdentityError> {
            self.result.clone()
        }

        async fn sign_in_federated(&self, prompt: &dyn FederatedPrompt) -> Result<IdentityAssertion, IdentityError> {
            match prompt.credential().await {
                Some(_) => self.result.clone(),
                None => Err(IdentityError::PopupClosed),
            }
        }
    }

    /// Prompt that either yields a Google credential or behaves as closed.
    pub struct StubPrompt {
        pub closed: bool,
    }

    #[async_trait::async_trait]
    impl FederatedPrompt for StubPrompt {
        async fn credential(&self) -> Option<FederatedCredential> {
            (!self.closed).then(|| FederatedCredential {
                provider_id: "google.com".to_owned(),
                id_token: Some("google-jwt".to_owned()),
                access_token: None,
            })
        }
    }

    pub const VENDOR_JSON: &str = r#"{
        "id": "v-1", "name": "Corner Books", "contact_number": "98470",
        "shop_type": "st-1", "business_type": "Retail", "owner_name": "Asha",
        "is_onboarded": false, "profile": {}, "branches": []
    }"#;

    #[must_use]
    pub fn test_config(api_base_url: &str) -> PortalConfig {
        PortalConfig {
            api_base_url: api_base_url.to_owned(),
            firebase_api_key: None,
            firebase_auth_base_url: "http://127.0.0.1:9".to_owned(),
            token_path: std::path::PathBuf::from("/nonexistent/vendor_auth_token"),
            timeouts: Timeouts::default(),
        }
    }

    /// Context over an in-memory token store.
    #[must_use]
    pub fn test_context(api_base_url: &str, identity: Option<Arc<dyn IdentityProvider>>) -> AppContext {
        let api = Arc::new(ApiClient::new(api_base_url, Timeouts::default()).unwrap());
        AppContext::new(test_config(api_base_url), api, Arc::new(MemoryTokenStore::new()), identity)
    }

    /// Mock the three session reads. Keep the returned mocks alive for the
    /// duration of the test.
    pub async fn mock_session_reads(server: &mut ServerGuard, onboarded: bool, with_vendor: bool) -> Vec<Mock> {
        let user = serde_json::json!({
            "id": "u-1", "email": "asha@example.com", "has_vendor_account": with_vendor
        });
        let status = serde_json::json!({
            "is_onboarded": onboarded,
            "step_status": {"default_branch": onboarded, "contact_details": onboarded, "store_details": onboarded}
        });
        let mut mocks = vec![
            server
                .mock("GET", "/api/v1/account/user_info/")
                .with_status(200)
                .with_body(user.to_string())
                .create_async()
                .await,
            server
                .mock("GET", "/api/v1/vendor/onboarding-status/")
                .with_status(200)
                .with_body(status.to_string())
                .create_async()
                .await,
        ];
        if with_vendor {
            mocks.push(
                server
                    .mock("GET", "/api/v1/vendor/details/")
                    .with_status(200)
                    .with_body(VENDOR_JSON)
                    .create_async()
                    .await,
            );
        }
        mocks
    }

    /// Context whose session is already signed in as vendor `v-1`.
    pub async fn signed_in_context(server: &mut ServerGuard, onboarded: bool) -> (AppContext, Vec<Mock>) {
        let mocks = mock_session_reads(server, onboarded, true).await;
        let ctx = test_context(&server.url(), None);
        ctx.session.load_user_data(TEST_TOKEN).await.unwrap();
        (ctx, mocks)
    }
}
