//! Headless screen controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each flow mirrors one portal screen: it validates its form, holds a busy
//! flag for the duration of a backend call, calls the resource clients and
//! pushes results into the session store. A UI or the CLI drives them.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures carry the exact text shown next to the form. Backend
//! failures pass through unchanged. The busy flag is released by a drop
//! guard, so it clears on success, on error and on cancellation.

pub mod branches;
pub mod declaration;
pub mod discounts;
pub mod login;
pub mod profile;
pub mod signup;
pub mod wizard;


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::app::AppContext;
use crate::net::ApiError;
use crate::net::types::VendorPatch;
use crate::state::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required")]
    NotAuthenticated,
    #[error("Vendor profile not found")]
    NoVendor,
    #[error("A request is already in progress")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to format signing time: {0}")]
    Timestamp(#[from] time::error::Format),
}

// =============================================================================
// BUSY FLAG
// =============================================================================

/// In-flight marker for one flow. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark busy until the returned guard drops. `None` if already busy.
    #[must_use]
    pub fn try_enter(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// First blank field as `Please fill in <field name>`.
pub(crate) fn require_filled(fields: &[(&str, &str)]) -> Result<(), FlowError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(FlowError::Validation(format!("Please fill in {}", name.replace('_', " ")))),
        None => Ok(()),
    }
}

/// Trimmed value, `None` when blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

pub(crate) fn session_token(ctx: &AppContext) -> Result<String, FlowError> {
    ctx.session.token().ok_or(FlowError::NotAuthenticated)
}

/// Merge a vendor mutation response into the session. Without a cached
/// vendor the session is reloaded first so the response is not lost.
pub(crate) async fn merge_vendor_echo(ctx: &AppContext, patch: VendorPatch) -> Result<(), FlowError> {
    if ctx.session.snapshot().vendor.is_none() {
        tracing::debug!("no cached vendor; reloading session");
        ctx.session.refresh_user().await?;
    }
    ctx.session.update_vendor_data(patch);
    Ok(())
}

pub(crate) fn session_vendor_id(ctx: &AppContext) -> Option<String> {
    ctx.session.snapshot().vendor.map(|vendor| vendor.id)
}
