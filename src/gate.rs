//! Route access decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`decide`] is the pure core: session flags in, navigation decision out.
//! [`guard`] applies it to a [`Route`] against a session snapshot and adds
//! the pending state a UI shows while the session is still loading.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::fmt;

use crate::state::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectLogin,
    RedirectOnboarding,
}

/// Decide whether a guarded route may render.
#[must_use]
pub fn decide(is_authenticated: bool, is_onboarded: bool, require_onboarding: bool) -> GateDecision {
    if !is_authenticated {
        GateDecision::RedirectLogin
    } else if require_onboarding && !is_onboarded {
        GateDecision::RedirectOnboarding
    } else {
        GateDecision::Allow
    }
}

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    SignUp,
    Onboarding,
    Declaration,
    Dashboard,
    Profile,
    Branches,
    Discounts,
}

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Onboarded,
}

impl Route {
    pub const ALL: [Self; 8] = [
        Self::Login,
        Self::SignUp,
        Self::Onboarding,
        Self::Declaration,
        Self::Dashboard,
        Self::Profile,
        Self::Branches,
        Self::Discounts,
    ];

    /// Resolve a path. `/vendor` lands on the dashboard; `/` and unknown
    /// paths land on login.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed == "/vendor" {
            return Self::Dashboard;
        }
        Self::ALL
            .into_iter()
            .find(|route| route.path() == trimmed)
            .unwrap_or(Self::Login)
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::SignUp => "/sign-up",
            Self::Onboarding => "/vendor/onboarding",
            Self::Declaration => "/vendor/declaration",
            Self::Dashboard => "/vendor/dashboard",
            Self::Profile => "/vendor/profile",
            Self::Branches => "/vendor/branches",
            Self::Discounts => "/vendor/discounts",
        }
    }

    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Self::Login | Self::SignUp => Access::Public,
            Self::Onboarding => Access::Authenticated,
            Self::Declaration | Self::Dashboard | Self::Profile | Self::Branches | Self::Discounts => {
                Access::Onboarded
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Session still resolving; show a spinner.
    Pending,
    Render(Route),
    Redirect(Route),
}

/// Apply the gate to `route` for the given session.
#[must_use]
pub fn guard(session: &Session, route: Route) -> RouteOutcome {
    let require_onboarding = match route.access() {
        Access::Public => return RouteOutcome::Render(route),
        Access::Authenticated => false,
        Access::Onboarded => true,
    };
    if !session.initialized || session.loading {
        return RouteOutcome::Pending;
    }
    match decide(session.is_authenticated(), session.is_onboarded(), require_onboarding) {
        GateDecision::Allow => RouteOutcome::Render(route),
        GateDecision::RedirectLogin => RouteOutcome::Redirect(Route::Login),
        GateDecision::RedirectOnboarding => RouteOutcome::Redirect(Route::Onboarding),
    }
}

/// Where to send a user right after sign-in.
#[must_use]
pub fn landing_route(session: &Session) -> Route {
    if session.is_onboarded() {
        Route::Dashboard
    } else {
        Route::Onboarding
    }
}
