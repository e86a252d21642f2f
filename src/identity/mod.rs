//! Identity provider bridge.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sign-in with an external identity provider yields an opaque assertion
//! (the provider's ID token). The session store exchanges that assertion
//! with the backend; nothing else here talks to the backend.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures map to [`IdentityError`] variants, each displaying a
//! message fit for the sign-in screen. No call is retried.

pub mod firebase;

use async_trait::async_trait;

pub use firebase::FirebaseIdentity;

/// Result of a successful provider sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityAssertion {
    pub id_token: String,
    /// Email the provider reports for the account, when it has one.
    pub email: Option<String>,
}

/// Credential returned by an external provider consent screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FederatedCredential {
    /// Provider id, e.g. `google.com`.
    pub provider_id: String,
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

/// The provider consent "popup". `None` means the user closed it.
#[async_trait]
pub trait FederatedPrompt: Send + Sync {
    async fn credential(&self) -> Option<FederatedCredential>;
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid email or password.")]
    BadCredentials,
    #[error("Sign-in was cancelled before it completed.")]
    PopupClosed,
    #[error("Network error while contacting the sign-in service: {0}")]
    Network(String),
    #[error("An account already exists for this email.")]
    EmailInUse,
    #[error("Password must be at least 6 characters long")]
    WeakPassword,
    #[error("This account has been disabled.")]
    Disabled,
    #[error("Too many attempts. Try again later.")]
    TooManyAttempts,
    #[error("Sign-in failed: {0}")]
    Provider(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`IdentityError`] describing why sign-in failed.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<IdentityAssertion, IdentityError>;

    /// Create a provider account and sign in to it.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] describing why the account could not be
    /// created.
    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<IdentityAssertion, IdentityError>;

    /// # Errors
    ///
    /// Returns [`IdentityError::PopupClosed`] when the prompt yields nothing,
    /// otherwise the provider failure.
    async fn sign_in_federated(&self, prompt: &dyn FederatedPrompt) -> Result<IdentityAssertion, IdentityError>;
}
