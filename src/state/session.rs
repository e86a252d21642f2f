//! Authenticated vendor session.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionStore`] is the single owner of "who is signed in": bearer token,
//! user record, cached vendor and server-computed onboarding status. Flows
//! and route guards read it; only its own methods write it.
//!
//! DESIGN
//! ======
//! State lives in a `tokio::sync::watch` channel so every consumer observes
//! each transition. `load_user_data` joins exactly two required reads; the
//! vendor record is fetched afterwards and only when the user has a vendor
//! account, and its failure is logged rather than fatal.
//!
//! Every load, login and logout takes a new generation number. A load whose
//! generation has been superseded when its reads return leaves the session
//! and the persisted token untouched.
//!
//! ERROR HANDLING
//! ==============
//! A failed required read during a current load erases the persisted token
//! and leaves the session logged out with the error message recorded. Token-store
//! failures on logout are logged; the in-memory session is reset regardless.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

use super::storage::{StorageError, TokenStore};
use crate::net::account::SessionApi;
use crate::net::error::{ApiError, ErrorKind};
use crate::net::types::{OnboardingStatus, UserInfo, VendorDetails, VendorPatch};

// =============================================================================
// SESSION
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
    pub vendor: Option<VendorDetails>,
    pub onboarding_status: Option<OnboardingStatus>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set once `initialize` has resolved the persisted token.
    pub initialized: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            user: None,
            vendor: None,
            onboarding_status: None,
            loading: true,
            error: None,
            initialized: false,
        }
    }

    fn logged_out(error: Option<String>) -> Self {
        Self { loading: false, error, initialized: true, ..Self::new() }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Server-reported aggregate flag; never derived from the step flags.
    #[must_use]
    pub fn is_onboarded(&self) -> bool {
        self.onboarding_status.is_some_and(|status| status.is_onboarded)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if !self.initialized {
            SessionPhase::Uninitialized
        } else if self.loading {
            SessionPhase::Loading
        } else if self.is_authenticated() {
            SessionPhase::Authenticated { onboarded: self.is_onboarded() }
        } else {
            SessionPhase::LoggedOut { error: self.error.clone() }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Authenticated { onboarded: bool },
    LoggedOut { error: Option<String> },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity is valid but has no backend account yet.
    #[error("no account exists for this sign-in; complete sign-up first")]
    NewUserRequiresPassword,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("token storage failed: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    api: Arc<dyn SessionApi>,
    storage: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    started: AtomicBool,
    generation: AtomicU64,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn SessionApi>, storage: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::new());
        Self { api, storage, state, started: AtomicBool::new(false), generation: AtomicU64::new(0) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_onboarded(&self) -> bool {
        self.state.borrow().is_onboarded()
    }

    /// Resolve the persisted token once per store. Later calls are no-ops.
    ///
    /// A load failure is recorded on the session, not returned.
    pub async fn initialize(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let stored = self.storage.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "token store unreadable; starting logged out");
            None
        });
        match stored {
            Some(token) => {
                if let Err(e) = self.load_user_data(&token).await {
                    tracing::debug!(error = %e, "stored session rejected");
                }
            }
            None => {
                self.state.send_replace(Session::logged_out(None));
                tracing::debug!("no stored session");
            }
        }
    }

    /// Fetch user info and onboarding status for `token`, then the vendor
    /// record when the user has one.
    ///
    /// # Errors
    ///
    /// Returns the first failing required read. Unless a later load, login
    /// or logout has superseded this one, the persisted token is erased and
    /// the session is left logged out with the message recorded.
    pub async fn load_user_data(&self, token: &str) -> Result<(), SessionError> {
        let generation = self.next_generation();
        self.state.send_modify(|s| {
            s.token = Some(token.to_owned());
            s.loading = true;
            s.error = None;
            s.initialized = true;
        });

        let required = tokio::try_join!(self.api.user_info(token), self.api.onboarding_status(token));
        let (user, onboarding_status) = match required {
            Ok(pair) => pair,
            Err(e) => {
                if !self.is_current(generation) {
                    tracing::debug!(error = %e, "superseded session load failed");
                    return Err(e.into());
                }
                tracing::warn!(error = %e, "session load failed; clearing stored token");
                if let Err(clear_err) = self.storage.clear() {
                    tracing::warn!(error = %clear_err, "failed to erase stored token");
                }
                self.state.send_replace(Session::logged_out(Some(e.to_string())));
                return Err(e.into());
            }
        };

        let vendor = if user.has_vendor_account {
            match self.api.vendor_details(token).await {
                Ok(vendor) => Some(vendor),
                Err(e) => {
                    tracing::warn!(error = %e, "vendor details unavailable");
                    None
                }
            }
        } else {
            None
        };

        if !self.is_current(generation) {
            tracing::debug!("superseded session load discarded");
            return Ok(());
        }
        self.state.send_modify(|s| {
            s.user = Some(user);
            s.vendor = vendor;
            s.onboarding_status = Some(onboarding_status);
            s.loading = false;
        });
        tracing::debug!(onboarded = onboarding_status.is_onboarded, "session loaded");
        Ok(())
    }

    /// Exchange an identity assertion for a backend session, persist the
    /// bearer token and load user data.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NewUserRequiresPassword`] when the backend
    /// has no account for the identity; otherwise the exchange, storage or
    /// load failure.
    pub async fn login_with_firebase(&self, id_token: &str) -> Result<(), SessionError> {
        self.next_generation();
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.initialized = true;
        });

        let response = match self.api.exchange_identity(id_token).await {
            Ok(response) => response,
            Err(e) if e.kind() == ErrorKind::NewUserRequiresPassword => {
                self.state.send_modify(|s| s.loading = false);
                tracing::info!("identity has no vendor account; sign-up required");
                return Err(SessionError::NewUserRequiresPassword);
            }
            Err(e) => {
                self.fail(&e.to_string());
                return Err(e.into());
            }
        };

        let token = response.token.unwrap_or_else(|| id_token.to_owned());
        if let Err(e) = self.storage.save(&token) {
            self.fail(&e.to_string());
            return Err(e.into());
        }
        tracing::info!(user_id = %response.id, "signed in");
        self.load_user_data(&token).await
    }

    /// Erase the persisted token and reset the session. No network call.
    pub fn logout(&self) {
        self.next_generation();
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to erase stored token");
        }
        self.state.send_replace(Session::logged_out(None));
        tracing::info!("signed out");
    }

    /// Reload user data with the current token; no-op without one.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_user_data`].
    pub async fn refresh_user(&self) -> Result<(), SessionError> {
        match self.token() {
            Some(token) => self.load_user_data(&token).await,
            None => Ok(()),
        }
    }

    /// Merge `patch` into the cached vendor. Ignored when no vendor is cached.
    pub fn update_vendor_data(&self, patch: VendorPatch) {
        self.state.send_if_modified(|s| match s.vendor.as_mut() {
            Some(vendor) => {
                vendor.apply(patch);
                true
            }
            None => {
                tracing::debug!("vendor patch ignored: no cached vendor");
                false
            }
        });
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn fail(&self, message: &str) {
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message.to_owned());
        });
    }
}
