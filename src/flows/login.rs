//! Sign-in screen.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::BusyFlag;
use crate::app::AppContext;
use crate::config::ConfigError;
use crate::gate::{Route, landing_route};
use crate::identity::{FederatedPrompt, IdentityAssertion, IdentityError};
use crate::state::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("A sign-in is already in progress")]
    Busy,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Where sign-in ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Signed in; navigate here.
    Landed(Route),
    /// Identity is valid but has no account: continue on the sign-up screen
    /// with these values prefilled.
    SignupRequired { email: String, id_token: String },
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns [`LoginError::Validation`] when either field is blank.
    pub fn validate(&self) -> Result<(), LoginError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(LoginError::Validation("Please enter your email and password"));
        }
        Ok(())
    }
}

pub struct LoginFlow<'a> {
    ctx: &'a AppContext,
    busy: BusyFlag,
}

impl<'a> LoginFlow<'a> {
    #[must_use]
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx, busy: BusyFlag::default() }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// # Errors
    ///
    /// Returns a [`LoginError`] for invalid input, provider rejection or
    /// backend failure. A missing backend account is not an error; see
    /// [`LoginOutcome::SignupRequired`].
    pub async fn with_password(&self, form: &LoginForm) -> Result<LoginOutcome, LoginError> {
        form.validate()?;
        let _busy = self.busy.try_enter().ok_or(LoginError::Busy)?;
        let email = form.email.trim();
        let assertion = self
            .ctx
            .identity()?
            .sign_in_with_password(email, &form.password)
            .await?;
        self.exchange(assertion, email).await
    }

    /// # Errors
    ///
    /// Returns [`LoginError::Identity`] with [`IdentityError::PopupClosed`]
    /// when the prompt is dismissed; otherwise as
    /// [`Self::with_password`].
    pub async fn with_federated(&self, prompt: &dyn FederatedPrompt) -> Result<LoginOutcome, LoginError> {
        let _busy = self.busy.try_enter().ok_or(LoginError::Busy)?;
        let assertion = self.ctx.identity()?.sign_in_federated(prompt).await?;
        self.exchange(assertion, "").await
    }

    async fn exchange(&self, assertion: IdentityAssertion, typed_email: &str) -> Result<LoginOutcome, LoginError> {
        match self.ctx.session.login_with_firebase(&assertion.id_token).await {
            Ok(()) => Ok(LoginOutcome::Landed(landing_route(&self.ctx.session.snapshot()))),
            Err(SessionError::NewUserRequiresPassword) => Ok(LoginOutcome::SignupRequired {
                email: assertion.email.unwrap_or_else(|| typed_email.to_owned()),
                id_token: assertion.id_token,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
