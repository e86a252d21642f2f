use std::sync::Mutex;

use tokio::sync::Notify;

use super::*;
use crate::net::types::{FirebaseAuthResponse, ShopTypeRef, StepStatus};
use crate::state::storage::MemoryTokenStore;

// =============================================================
// Fake backend
// =============================================================

struct FakeApi {
    /// `Ok(token)` or `Err((status, body))` for the identity exchange.
    exchange: Result<Option<&'static str>, (u16, &'static str)>,
    user_failure: Option<(u16, &'static str)>,
    /// Limits `user_failure` to this token when set.
    failing_token: Option<&'static str>,
    /// `user_info` for this token parks until `release` is notified.
    held_token: Option<&'static str>,
    release: Notify,
    has_vendor_account: bool,
    vendor_fails: bool,
    onboarding: OnboardingStatus,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            exchange: Ok(Some("backend-tok")),
            user_failure: None,
            failing_token: None,
            held_token: None,
            release: Notify::new(),
            has_vendor_account: true,
            vendor_fails: false,
            onboarding: OnboardingStatus { is_onboarded: true, step_status: StepStatus::default() },
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl SessionApi for FakeApi {
    async fn exchange_identity(&self, id_token: &str) -> Result<FirebaseAuthResponse, ApiError> {
        self.record(format!("exchange:{id_token}"));
        match self.exchange {
            Ok(token) => Ok(FirebaseAuthResponse {
                id: "u-1".to_owned(),
                username: String::new(),
                email: "asha@example.com".to_owned(),
                phone: None,
                first_name: String::new(),
                last_name: String::new(),
                email_verified: true,
                phone_verified: false,
                providers: Vec::new(),
                new_user: false,
                token: token.map(str::to_owned),
            }),
            Err((status, body)) => Err(ApiError::from_response(status, body)),
        }
    }

    async fn user_info(&self, token: &str) -> Result<UserInfo, ApiError> {
        self.record(format!("user_info:{token}"));
        if self.held_token == Some(token) {
            self.release.notified().await;
        }
        if let Some((status, body)) = self.user_failure {
            if self.failing_token.map_or(true, |failing| failing == token) {
                return Err(ApiError::from_response(status, body));
            }
        }
        Ok(UserInfo {
            id: "u-1".to_owned(),
            email: "asha@example.com".to_owned(),
            username: "asha".to_owned(),
            phone_number: None,
            first_name: "Asha".to_owned(),
            middle_name: String::new(),
            last_name: String::new(),
            auth_provider: "password".to_owned(),
            email_verified: true,
            phone_verified: false,
            has_vendor_account: self.has_vendor_account,
            has_customer_account: false,
        })
    }

    async fn onboarding_status(&self, token: &str) -> Result<OnboardingStatus, ApiError> {
        self.record(format!("onboarding_status:{token}"));
        Ok(self.onboarding)
    }

    async fn vendor_details(&self, token: &str) -> Result<VendorDetails, ApiError> {
        self.record(format!("vendor_details:{token}"));
        if self.vendor_fails {
            return Err(ApiError::from_response(500, "{}"));
        }
        Ok(VendorDetails {
            id: "v-1".to_owned(),
            name: "Corner Books".to_owned(),
            contact_number: "98470".to_owned(),
            shop_type: Some(ShopTypeRef::Id("st-1".to_owned())),
            business_type: "Retail".to_owned(),
            owner_name: Some("Asha".to_owned()),
            is_onboarded: self.onboarding.is_onboarded,
            profile: serde_json::Value::Null,
            branches: Vec::new(),
        })
    }
}

/// Yield until the fake has seen `call`.
async fn wait_for_call(api: &FakeApi, call: &str) {
    while !api.calls().iter().any(|c| c == call) {
        tokio::task::yield_now().await;
    }
}

fn store_with(api: FakeApi, storage: MemoryTokenStore) -> (Arc<FakeApi>, SessionStore) {
    let api = Arc::new(api);
    let store = SessionStore::new(api.clone(), Arc::new(storage));
    (api, store)
}

// =============================================================
// initialize
// =============================================================

#[tokio::test]
async fn fresh_session_is_uninitialized_and_loading() {
    let (_api, store) = store_with(FakeApi::default(), MemoryTokenStore::new());
    let session = store.snapshot();
    assert!(session.loading);
    assert_eq!(session.phase(), SessionPhase::Uninitialized);
}

#[tokio::test]
async fn initialize_without_token_is_logged_out_without_network() {
    let (api, store) = store_with(FakeApi::default(), MemoryTokenStore::new());
    store.initialize().await;

    let session = store.snapshot();
    assert!(!session.loading);
    assert!(!session.is_authenticated());
    assert_eq!(session.phase(), SessionPhase::LoggedOut { error: None });
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn initialize_with_stored_token_loads_everything() {
    let (api, store) = store_with(FakeApi::default(), MemoryTokenStore::with_token("tok"));
    store.initialize().await;

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Authenticated { onboarded: true });
    assert_eq!(session.token.as_deref(), Some("tok"));
    assert_eq!(session.vendor.as_ref().map(|v| v.id.as_str()), Some("v-1"));
    assert!(api.calls().contains(&"vendor_details:tok".to_owned()));
}

#[tokio::test]
async fn initialize_runs_once() {
    let (api, store) = store_with(FakeApi::default(), MemoryTokenStore::with_token("tok"));
    store.initialize().await;
    store.initialize().await;

    let user_calls = api.calls().iter().filter(|c| c.starts_with("user_info")).count();
    assert_eq!(user_calls, 1);
}

// =============================================================
// load_user_data
// =============================================================

#[tokio::test]
async fn unauthorized_load_erases_stored_token() {
    let storage = MemoryTokenStore::with_token("expired");
    let api = FakeApi { user_failure: Some((401, r#"{"detail": "Token expired"}"#)), ..FakeApi::default() };
    let (_api, store) = store_with(api, storage.clone());
    store.initialize().await;

    let session = store.snapshot();
    assert_eq!(storage.load().unwrap(), None);
    assert!(session.token.is_none());
    assert!(!session.loading);
    assert_eq!(session.phase(), SessionPhase::LoggedOut { error: Some("Token expired".to_owned()) });
}

#[tokio::test]
async fn vendor_fetch_failure_is_not_fatal() {
    let api = FakeApi { vendor_fails: true, ..FakeApi::default() };
    let (_api, store) = store_with(api, MemoryTokenStore::new());
    store.load_user_data("tok").await.unwrap();

    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert!(session.vendor.is_none());
    assert!(session.error.is_none());
}

#[tokio::test]
async fn vendor_is_not_fetched_without_vendor_account() {
    let api = FakeApi { has_vendor_account: false, ..FakeApi::default() };
    let (api, store) = store_with(api, MemoryTokenStore::new());
    store.load_user_data("tok").await.unwrap();

    assert!(!api.calls().iter().any(|c| c.starts_with("vendor_details")));
    assert!(store.snapshot().vendor.is_none());
}

#[tokio::test]
async fn onboarded_flag_is_independent_of_step_flags() {
    let all_steps = StepStatus { default_branch: true, contact_details: true, store_details: true };
    let api = FakeApi {
        onboarding: OnboardingStatus { is_onboarded: false, step_status: all_steps },
        ..FakeApi::default()
    };
    let (_api, store) = store_with(api, MemoryTokenStore::new());
    store.load_user_data("tok").await.unwrap();

    assert!(!store.is_onboarded());
    assert_eq!(store.snapshot().phase(), SessionPhase::Authenticated { onboarded: false });
}

// =============================================================
// login / logout
// =============================================================

#[tokio::test]
async fn login_persists_token_for_a_fresh_store() {
    let storage = MemoryTokenStore::new();
    let (_api, store) = store_with(FakeApi::default(), storage.clone());
    store.login_with_firebase("id-abc").await.unwrap();
    assert_eq!(store.token().as_deref(), Some("backend-tok"));

    let (_api, reopened) = store_with(FakeApi::default(), storage);
    reopened.initialize().await;
    assert!(reopened.is_authenticated());
    assert_eq!(reopened.token().as_deref(), Some("backend-tok"));
}

#[tokio::test]
async fn login_falls_back_to_identity_token_as_bearer() {
    let storage = MemoryTokenStore::new();
    let api = FakeApi { exchange: Ok(None), ..FakeApi::default() };
    let (api, store) = store_with(api, storage.clone());
    store.login_with_firebase("id-abc").await.unwrap();

    assert_eq!(storage.load().unwrap().as_deref(), Some("id-abc"));
    assert!(api.calls().contains(&"user_info:id-abc".to_owned()));
}

#[tokio::test]
async fn login_new_user_is_a_distinct_error() {
    let storage = MemoryTokenStore::new();
    let api = FakeApi {
        exchange: Err((400, r#"{"message": "Password is required for email sign up"}"#)),
        ..FakeApi::default()
    };
    let (_api, store) = store_with(api, storage.clone());
    let err = store.login_with_firebase("id-abc").await.unwrap_err();

    assert!(matches!(err, SessionError::NewUserRequiresPassword));
    assert_eq!(storage.load().unwrap(), None);
    let session = store.snapshot();
    assert!(!session.loading);
    assert!(session.error.is_none());
}

#[tokio::test]
async fn login_rejection_records_server_message() {
    let api = FakeApi { exchange: Err((401, r#"{"message": "Invalid ID token"}"#)), ..FakeApi::default() };
    let (_api, store) = store_with(api, MemoryTokenStore::new());
    let err = store.login_with_firebase("id-abc").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid ID token");
    assert_eq!(store.snapshot().phase(), SessionPhase::LoggedOut { error: Some("Invalid ID token".to_owned()) });
}

#[tokio::test]
async fn logout_then_initialize_stays_logged_out() {
    let storage = MemoryTokenStore::new();
    let (_api, store) = store_with(FakeApi::default(), storage.clone());
    store.login_with_firebase("id-abc").await.unwrap();
    store.logout();

    let session = store.snapshot();
    assert!(session.token.is_none());
    assert!(session.user.is_none());
    assert!(session.vendor.is_none());

    let (api, reopened) = store_with(FakeApi::default(), storage);
    reopened.initialize().await;
    assert!(!reopened.is_authenticated());
    assert!(api.calls().is_empty());
}

// =============================================================
// refresh / local mutations
// =============================================================

#[tokio::test]
async fn refresh_without_token_is_noop() {
    let (api, store) = store_with(FakeApi::default(), MemoryTokenStore::new());
    store.refresh_user().await.unwrap();
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn refresh_reloads_with_current_token() {
    let (api, store) = store_with(FakeApi::default(), MemoryTokenStore::with_token("tok"));
    store.initialize().await;
    store.refresh_user().await.unwrap();

    let user_calls = api.calls().iter().filter(|c| *c == "user_info:tok").count();
    assert_eq!(user_calls, 2);
}

#[tokio::test]
async fn vendor_patch_preserves_untouched_fields() {
    let (_api, store) = store_with(FakeApi::default(), MemoryTokenStore::with_token("tok"));
    store.initialize().await;
    store.update_vendor_data(VendorPatch { name: Some("Corner Books & Co".to_owned()), ..VendorPatch::default() });

    let vendor = store.snapshot().vendor.unwrap();
    assert_eq!(vendor.name, "Corner Books & Co");
    assert_eq!(vendor.contact_number, "98470");
    assert_eq!(vendor.owner_name.as_deref(), Some("Asha"));
}

#[tokio::test]
async fn vendor_patch_without_cached_vendor_changes_nothing() {
    let (_api, store) = store_with(FakeApi::default(), MemoryTokenStore::new());
    store.initialize().await;
    let before = store.snapshot();
    store.update_vendor_data(VendorPatch { is_onboarded: Some(true), ..VendorPatch::default() });
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn clear_error_resets_only_the_error() {
    let api = FakeApi { user_failure: Some((500, "{}")), ..FakeApi::default() };
    let (_api, store) = store_with(api, MemoryTokenStore::with_token("tok"));
    store.initialize().await;
    assert!(store.snapshot().error.is_some());

    store.clear_error();
    let session = store.snapshot();
    assert!(session.error.is_none());
    assert!(session.initialized);
    assert!(!session.loading);
}

#[tokio::test]
async fn subscribers_observe_transitions() {
    let (_api, store) = store_with(FakeApi::default(), MemoryTokenStore::new());
    let mut rx = store.subscribe();
    store.login_with_firebase("id-abc").await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());
    store.logout();
    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_authenticated());
}

// =============================================================
// superseded loads
// =============================================================

#[tokio::test]
async fn load_finishing_after_logout_is_discarded() {
    let storage = MemoryTokenStore::with_token("old");
    let api = FakeApi { held_token: Some("old"), ..FakeApi::default() };
    let (api, store) = store_with(api, storage.clone());
    let store = Arc::new(store);
    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.initialize().await }
    });
    wait_for_call(&api, "user_info:old").await;

    store.logout();
    api.release.notify_one();
    pending.await.unwrap();

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::LoggedOut { error: None });
    assert!(session.token.is_none());
    assert!(session.user.is_none());
    assert!(session.vendor.is_none());
    assert_eq!(storage.load().unwrap(), None);
}

#[tokio::test]
async fn failed_load_finishing_after_login_keeps_new_session() {
    let storage = MemoryTokenStore::with_token("old");
    let api = FakeApi {
        held_token: Some("old"),
        user_failure: Some((401, r#"{"detail": "Token expired"}"#)),
        failing_token: Some("old"),
        ..FakeApi::default()
    };
    let (api, store) = store_with(api, storage.clone());
    let store = Arc::new(store);
    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.initialize().await }
    });
    wait_for_call(&api, "user_info:old").await;

    store.login_with_firebase("fresh").await.unwrap();
    api.release.notify_one();
    pending.await.unwrap();

    let session = store.snapshot();
    assert_eq!(session.phase(), SessionPhase::Authenticated { onboarded: true });
    assert_eq!(session.token.as_deref(), Some("backend-tok"));
    assert!(session.error.is_none());
    assert_eq!(storage.load().unwrap().as_deref(), Some("backend-tok"));
}
