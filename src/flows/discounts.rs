//! Discount management.
//!
//! A [`DiscountDraft`] is edited locally (presets, branch toggles) and only
//! reaches the backend through [`DiscountFlow::create`].

#[cfg(test)]
#[path = "discounts_test.rs"]
mod discounts_test;

use super::{BusyFlag, FlowError, non_blank, session_token, session_vendor_id};
use crate::app::AppContext;
use crate::net::types::{Discount, DiscountCreate, DiscountKind, DiscountUpdate, DiscountValueType};

pub const DISCOUNT_ADDED: &str = "Discount added successfully";
const DRAFT_INCOMPLETE: &str = "Please fill in all required fields";

// =============================================================================
// PRESETS
// =============================================================================

/// One-click discount shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscountPreset {
    pub label: &'static str,
    pub value_type: DiscountValueType,
    pub value: &'static str,
}

const fn preset(label: &'static str, value_type: DiscountValueType, value: &'static str) -> DiscountPreset {
    DiscountPreset { label, value_type, value }
}

pub const PRESETS: [DiscountPreset; 10] = [
    preset("5% off for total bill", DiscountValueType::Percentage, "5"),
    preset("10% off for total bill", DiscountValueType::Percentage, "10"),
    preset("15% off for total bill", DiscountValueType::Percentage, "15"),
    preset("20% off for total bill", DiscountValueType::Percentage, "20"),
    preset("25% off for total bill", DiscountValueType::Percentage, "25"),
    preset("₹50 flat off", DiscountValueType::Flat, "50"),
    preset("₹100 flat off", DiscountValueType::Flat, "100"),
    preset("₹500 flat off", DiscountValueType::Flat, "500"),
    preset("₹1000 flat off", DiscountValueType::Flat, "1000"),
    preset("₹500 off for purchase above ₹2500", DiscountValueType::Flat, "500"),
];

// =============================================================================
// DRAFT
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscountDraft {
    pub kind: DiscountKind,
    pub value_type: DiscountValueType,
    pub value: String,
    pub category: String,
    pub description: String,
    pub branches: Vec<String>,
    pub expiry_date: String,
}

impl DiscountDraft {
    /// Copy a preset's value type and value; everything else is kept.
    pub fn apply_preset(&mut self, preset: &DiscountPreset) {
        self.value_type = preset.value_type;
        self.value = preset.value.to_owned();
    }

    /// Add the branch if absent, remove it if present.
    pub fn toggle_branch(&mut self, branch_id: &str) {
        if let Some(pos) = self.branches.iter().position(|id| id == branch_id) {
            self.branches.remove(pos);
        } else {
            self.branches.push(branch_id.to_owned());
        }
    }

    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when the value is blank, no branch
    /// is selected, or the value is not a positive number.
    pub fn validate(&self) -> Result<f64, FlowError> {
        if self.value.trim().is_empty() || self.branches.is_empty() {
            return Err(FlowError::Validation(DRAFT_INCOMPLETE.to_owned()));
        }
        match self.value.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
            _ => Err(FlowError::Validation("Please enter a valid discount value".to_owned())),
        }
    }
}

// =============================================================================
// FLOW
// =============================================================================

pub struct DiscountFlow<'a> {
    ctx: &'a AppContext,
    busy: BusyFlag,
}

impl<'a> DiscountFlow<'a> {
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
    /// Returns [`FlowError`] on missing session or backend failure.
    pub async fn list(&self) -> Result<Vec<Discount>, FlowError> {
        let token = session_token(self.ctx)?;
        Ok(self.ctx.api.discounts(&token).list().await?)
    }

    /// Create an active discount from the draft for the session's vendor.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on an incomplete draft, missing session or
    /// vendor, or backend rejection.
    pub async fn create(&self, draft: &DiscountDraft) -> Result<Discount, FlowError> {
        let value = draft.validate()?;
        let token = session_token(self.ctx)?;
        let vendor = session_vendor_id(self.ctx).ok_or(FlowError::NoVendor)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        let body = DiscountCreate {
            vendor,
            kind: draft.kind,
            value_type: draft.value_type,
            value,
            category: non_blank(&draft.category),
            description: non_blank(&draft.description),
            branches: draft.branches.clone(),
            expiry_date: non_blank(&draft.expiry_date),
            is_active: true,
        };
        let discount = self.ctx.api.discounts(&token).create(&body).await?;
        tracing::info!(discount_id = %discount.id, "discount created");
        Ok(discount)
    }

    /// # Errors
    ///
    /// Returns [`FlowError`] on missing session or backend rejection.
    pub async fn set_active(&self, id: &str, active: bool) -> Result<Discount, FlowError> {
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        let body = DiscountUpdate { is_active: Some(active), ..DiscountUpdate::default() };
        Ok(self.ctx.api.discounts(&token).update(id, &body).await?)
    }

    /// # Errors
    ///
    /// Returns [`FlowError`] on missing session or backend rejection.
    pub async fn delete(&self, id: &str) -> Result<(), FlowError> {
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        self.ctx.api.discounts(&token).delete(id).await?;
        tracing::info!(discount_id = id, "discount deleted");
        Ok(())
    }
}
