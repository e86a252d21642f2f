use super::*;
use crate::net::types::{OnboardingStatus, StepStatus, UserInfo};

// =============================================================
// Helpers
// =============================================================

fn make_user() -> UserInfo {
    UserInfo {
        id: "u-1".to_owned(),
        email: "asha@example.com".to_owned(),
        username: String::new(),
        phone_number: None,
        first_name: String::new(),
        middle_name: String::new(),
        last_name: String::new(),
        auth_provider: String::new(),
        email_verified: true,
        phone_verified: false,
        has_vendor_account: true,
        has_customer_account: false,
    }
}

fn resolved(authenticated: bool, onboarded: bool) -> Session {
    let mut session = Session { loading: false, initialized: true, ..Session::new() };
    if authenticated {
        session.token = Some("tok".to_owned());
        session.user = Some(make_user());
        session.onboarding_status =
            Some(OnboardingStatus { is_onboarded: onboarded, step_status: StepStatus::default() });
    }
    session
}

// =============================================================
// decide
// =============================================================

#[test]
fn decide_covers_all_eight_cases() {
    let cases = [
        ((false, false, false), GateDecision::RedirectLogin),
        ((false, false, true), GateDecision::RedirectLogin),
        ((false, true, false), GateDecision::RedirectLogin),
        ((false, true, true), GateDecision::RedirectLogin),
        ((true, false, false), GateDecision::Allow),
        ((true, false, true), GateDecision::RedirectOnboarding),
        ((true, true, false), GateDecision::Allow),
        ((true, true, true), GateDecision::Allow),
    ];
    for ((authenticated, onboarded, require), expected) in cases {
        assert_eq!(
            decide(authenticated, onboarded, require),
            expected,
            "decide({authenticated}, {onboarded}, {require})"
        );
    }
}

// =============================================================
// Route
// =============================================================

#[test]
fn paths_round_trip() {
    for route in Route::ALL {
        assert_eq!(Route::parse(route.path()), route);
    }
}

#[test]
fn vendor_root_lands_on_dashboard() {
    assert_eq!(Route::parse("/vendor"), Route::Dashboard);
    assert_eq!(Route::parse("/vendor/"), Route::Dashboard);
}

#[test]
fn root_and_unknown_paths_land_on_login() {
    assert_eq!(Route::parse("/"), Route::Login);
    assert_eq!(Route::parse("/admin/settings"), Route::Login);
    assert_eq!(Route::parse(""), Route::Login);
}

#[test]
fn query_and_trailing_slash_are_ignored() {
    assert_eq!(Route::parse("/vendor/branches/?page=2"), Route::Branches);
}

#[test]
fn declaration_requires_onboarding() {
    assert_eq!(Route::Declaration.access(), Access::Onboarded);
    assert_eq!(Route::Onboarding.access(), Access::Authenticated);
    assert_eq!(Route::SignUp.access(), Access::Public);
}

// =============================================================
// guard
// =============================================================

#[test]
fn guard_is_pending_until_session_resolves() {
    assert_eq!(guard(&Session::new(), Route::Dashboard), RouteOutcome::Pending);
    let loading = Session { initialized: true, ..Session::new() };
    assert_eq!(guard(&loading, Route::Onboarding), RouteOutcome::Pending);
}

#[test]
fn public_routes_render_while_loading() {
    assert_eq!(guard(&Session::new(), Route::Login), RouteOutcome::Render(Route::Login));
}

#[test]
fn guard_redirects_anonymous_to_login() {
    assert_eq!(guard(&resolved(false, false), Route::Profile), RouteOutcome::Redirect(Route::Login));
    assert_eq!(guard(&resolved(false, false), Route::Onboarding), RouteOutcome::Redirect(Route::Login));
}

#[test]
fn guard_redirects_unfinished_vendor_to_onboarding() {
    let session = resolved(true, false);
    assert_eq!(guard(&session, Route::Discounts), RouteOutcome::Redirect(Route::Onboarding));
    assert_eq!(guard(&session, Route::Onboarding), RouteOutcome::Render(Route::Onboarding));
}

#[test]
fn guard_renders_for_onboarded_vendor() {
    assert_eq!(guard(&resolved(true, true), Route::Declaration), RouteOutcome::Render(Route::Declaration));
}

#[test]
fn landing_route_follows_onboarding() {
    assert_eq!(landing_route(&resolved(true, true)), Route::Dashboard);
    assert_eq!(landing_route(&resolved(true, false)), Route::Onboarding);
}
