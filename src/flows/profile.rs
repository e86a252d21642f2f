//! Vendor profile editing.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use super::{BusyFlag, FlowError, merge_vendor_echo, non_blank, require_filled, session_token};
use crate::app::AppContext;
use crate::net::types::{VendorDetails, VendorUpdate, VerificationStatus};

pub const PROFILE_SAVED: &str = "Profile updated successfully!";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub owner_name: String,
    pub contact_number: String,
    pub website: String,
    pub facebook: String,
    pub instagram: String,
    pub youtube: String,
}

impl ProfileForm {
    /// Prefill from the cached vendor.
    #[must_use]
    pub fn from_vendor(vendor: &VendorDetails) -> Self {
        let link = |key: &str| {
            vendor
                .profile
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            name: vendor.name.clone(),
            owner_name: vendor.owner_name.clone().unwrap_or_default(),
            contact_number: vendor.contact_number.clone(),
            website: link("website"),
            facebook: link("facebook_link"),
            instagram: link("instagram_link"),
            youtube: link("youtube_link"),
        }
    }

    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when name or contact number is blank.
    pub fn validate(&self) -> Result<(), FlowError> {
        require_filled(&[("name", self.name.as_str()), ("contact_number", self.contact_number.as_str())])
    }

    fn to_update(&self) -> VendorUpdate {
        VendorUpdate {
            name: Some(self.name.trim().to_owned()),
            owner_name: non_blank(&self.owner_name),
            contact_number: Some(self.contact_number.trim().to_owned()),
            website: non_blank(&self.website),
            facebook: non_blank(&self.facebook),
            instagram: non_blank(&self.instagram),
            youtube: non_blank(&self.youtube),
            ..VendorUpdate::default()
        }
    }
}

pub struct ProfileFlow<'a> {
    ctx: &'a AppContext,
    busy: BusyFlag,
}

impl<'a> ProfileFlow<'a> {
    #[must_use]
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx, busy: BusyFlag::default() }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Save the profile and merge the response into the cached vendor,
    /// marking it onboarded. The session is reloaded first when no vendor
    /// is cached.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on invalid input, missing session or backend
    /// rejection.
    pub async fn save(&self, form: &ProfileForm) -> Result<(), FlowError> {
        form.validate()?;
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        let mut patch = self.ctx.api.vendors(&token).update(&form.to_update()).await?;
        patch.is_onboarded = Some(true);
        merge_vendor_echo(self.ctx, patch).await
    }

    /// # Errors
    ///
    /// Returns [`FlowError`] on missing session or backend failure.
    pub async fn verification_status(&self) -> Result<VerificationStatus, FlowError> {
        let token = session_token(self.ctx)?;
        Ok(self.ctx.api.vendors(&token).verification_status().await?)
    }
}
