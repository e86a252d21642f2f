//! Firebase Authentication REST client.
//!
//! Thin wrapper over `accounts:signInWithPassword`, `accounts:signUp` and
//! `accounts:signInWithIdp`. Error codes are parsed in `parse_error` so the
//! mapping is testable without a server.

#[cfg(test)]
#[path = "firebase_test.rs"]
mod firebase_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FederatedCredential, FederatedPrompt, IdentityAssertion, IdentityError, IdentityProvider};
use crate::config::Timeouts;

/// Redirect URI reported to `signInWithIdp`. Firebase requires one even when
/// the credential was obtained out of band.
const IDP_REQUEST_URI: &str = "http://localhost";

// =============================================================================
// CLIENT
// =============================================================================

pub struct FirebaseIdentity {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseIdentity {
    /// # Errors
    ///
    /// Returns [`IdentityError::Provider`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeouts: Timeouts) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| IdentityError::Provider(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url, api_key: api_key.into() })
    }

    async fn call<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<IdentityAssertion, IdentityError> {
        let url = format!("{}/v1/accounts:{method}", self.base_url);
        tracing::debug!(method, "identity provider request");
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = parse_error(&text);
            tracing::debug!(method, status = status.as_u16(), error = %err, "identity provider rejected request");
            return Err(err);
        }

        let parsed: TokenResponse =
            serde_json::from_str(&text).map_err(|e| IdentityError::Provider(e.to_string()))?;
        Ok(IdentityAssertion { id_token: parsed.id_token, email: parsed.email.filter(|e| !e.is_empty()) })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<IdentityAssertion, IdentityError> {
        let body = PasswordRequest { email, password, return_secure_token: true };
        self.call("signInWithPassword", &body).await
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<IdentityAssertion, IdentityError> {
        let body = PasswordRequest { email, password, return_secure_token: true };
        self.call("signUp", &body).await
    }

    async fn sign_in_federated(&self, prompt: &dyn FederatedPrompt) -> Result<IdentityAssertion, IdentityError> {
        let Some(credential) = prompt.credential().await else {
            return Err(IdentityError::PopupClosed);
        };
        let post_body = idp_post_body(&credential)?;
        let body = IdpRequest {
            post_body: &post_body,
            request_uri: IDP_REQUEST_URI,
            return_secure_token: true,
            return_idp_credential: true,
        };
        self.call("signInWithIdp", &body).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: &'a str,
    request_uri: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn idp_post_body(credential: &FederatedCredential) -> Result<String, IdentityError> {
    let (key, token) = match (&credential.id_token, &credential.access_token) {
        (Some(id_token), _) => ("id_token", id_token),
        (None, Some(access_token)) => ("access_token", access_token),
        (None, None) => return Err(IdentityError::Provider("credential carries no token".to_owned())),
    };
    Ok(form_urlencoded::Serializer::new(String::new())
        .append_pair(key, token)
        .append_pair("providerId", &credential.provider_id)
        .finish())
}

/// Map a Firebase error body to an [`IdentityError`].
///
/// Messages look like `WEAK_PASSWORD : Password should be at least 6
/// characters`; only the code before the first space is significant.
fn parse_error(body: &str) -> IdentityError {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return IdentityError::Provider("unexpected response from sign-in service".to_owned());
    };
    let message = envelope.error.message;
    let code = message.split_whitespace().next().unwrap_or_default();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            IdentityError::BadCredentials
        }
        "EMAIL_EXISTS" => IdentityError::EmailInUse,
        "WEAK_PASSWORD" => IdentityError::WeakPassword,
        "USER_DISABLED" => IdentityError::Disabled,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::TooManyAttempts,
        _ => IdentityError::Provider(message),
    }
}
