//! Account creation screen.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use super::BusyFlag;
use crate::app::AppContext;
use crate::config::ConfigError;
use crate::gate::{Route, landing_route};
use crate::identity::{FederatedPrompt, IdentityError};
use crate::state::SessionError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("A sign-up is already in progress")]
    Busy,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Clone, Debug, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Form opened from a login that found no account.
    #[must_use]
    pub fn prefilled(email: &str) -> Self {
        Self { email: email.to_owned(), ..Self::default() }
    }

    /// # Errors
    ///
    /// Returns [`SignupError::Validation`] with the first failed rule.
    pub fn validate(&self) -> Result<(), SignupError> {
        if self.email.trim().is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(SignupError::Validation("All fields are required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SignupError::Validation("Password must be at least 6 characters long"));
        }
        if self.password != self.confirm_password {
            return Err(SignupError::Validation("Passwords do not match"));
        }
        Ok(())
    }
}

pub struct SignupFlow<'a> {
    ctx: &'a AppContext,
    busy: BusyFlag,
}

impl<'a> SignupFlow<'a> {
    #[must_use]
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx, busy: BusyFlag::default() }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Create the provider account, sign in to the backend and return the
    /// landing route.
    ///
    /// # Errors
    ///
    /// Returns a [`SignupError`] for invalid input, provider rejection or
    /// backend failure.
    pub async fn submit(&self, form: &SignupForm) -> Result<Route, SignupError> {
        form.validate()?;
        let _busy = self.busy.try_enter().ok_or(SignupError::Busy)?;
        let assertion = self
            .ctx
            .identity()?
            .sign_up_with_password(form.email.trim(), &form.password)
            .await?;
        self.ctx.session.login_with_firebase(&assertion.id_token).await?;
        tracing::info!("vendor account created");
        Ok(landing_route(&self.ctx.session.snapshot()))
    }

    /// # Errors
    ///
    /// Returns a [`SignupError`] when the prompt is dismissed or sign-in fails.
    pub async fn with_federated(&self, prompt: &dyn FederatedPrompt) -> Result<Route, SignupError> {
        let _busy = self.busy.try_enter().ok_or(SignupError::Busy)?;
        let assertion = self.ctx.identity()?.sign_in_federated(prompt).await?;
        self.ctx.session.login_with_firebase(&assertion.id_token).await?;
        Ok(landing_route(&self.ctx.session.snapshot()))
    }
}
