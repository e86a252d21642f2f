//! Onboarding wizard: location, contact details, store details.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reached right after sign-up. A vendor profile must exist first
//! ([`OnboardingWizard::create_vendor`]); each step then validates its own
//! form and saves it before advancing. The last step refreshes the session
//! so the server-computed onboarding status is current before the caller
//! navigates.

#[cfg(test)]
#[path = "wizard_test.rs"]
mod wizard_test;

use std::fmt;

use super::{BusyFlag, FlowError, merge_vendor_echo, non_blank, require_filled, session_token, session_vendor_id};
use crate::app::AppContext;
use crate::gate::{Route, landing_route};
use crate::net::types::{
    BranchCreate, BusinessType, Upload, VendorCreate, VendorDetails, VendorProfileUpdate, VendorUpdate,
};

pub const BRANCH_NEEDS_VENDOR: &str = "Vendor must exist to create a branch";

// =============================================================================
// STEPS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    Location,
    Contact,
    Store,
}

impl WizardStep {
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Location => 1,
            Self::Contact => 2,
            Self::Store => 3,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Contact => "Contact Details",
            Self::Store => "Store Details",
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Location | Self::Contact => Self::Location,
            Self::Store => Self::Contact,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} of 3: {}", self.number(), self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardProgress {
    Advanced(WizardStep),
    Completed(Route),
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct VendorForm {
    pub name: String,
    pub contact_number: String,
    /// Shop type id.
    pub shop_type: String,
    pub business_type: Option<BusinessType>,
    pub owner_name: String,
}

impl VendorForm {
    fn validate(&self) -> Result<BusinessType, FlowError> {
        require_filled(&[
            ("name", self.name.as_str()),
            ("contact_number", self.contact_number.as_str()),
            ("shop_type", self.shop_type.as_str()),
        ])?;
        self.business_type
            .ok_or_else(|| FlowError::Validation("Please fill in business type".to_owned()))
    }
}

/// Default branch location. Everything but `land_phone` is required.
#[derive(Clone, Debug, Default)]
pub struct LocationForm {
    pub country: String,
    pub state: String,
    pub district: String,
    pub shop_locality: String,
    pub nearby_town: String,
    pub pin_code: String,
    pub key_person_name: String,
    pub key_person_contact_number: String,
    pub land_phone: String,
}

impl LocationForm {
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), FlowError> {
        require_filled(&[
            ("country", self.country.as_str()),
            ("state", self.state.as_str()),
            ("district", self.district.as_str()),
            ("shop_locality", self.shop_locality.as_str()),
            ("nearby_town", self.nearby_town.as_str()),
            ("pin_code", self.pin_code.as_str()),
            ("key_person_name", self.key_person_name.as_str()),
            ("key_person_contact_number", self.key_person_contact_number.as_str()),
        ])
    }

    fn to_branch(&self, vendor_id: String) -> BranchCreate {
        BranchCreate {
            vendor: vendor_id,
            country: self.country.trim().to_owned(),
            state: self.state.trim().to_owned(),
            district: self.district.trim().to_owned(),
            shop_locality: self.shop_locality.trim().to_owned(),
            nearby_town: self.nearby_town.trim().to_owned(),
            pin_code: self.pin_code.trim().to_owned(),
            key_person_name: self.key_person_name.trim().to_owned(),
            key_person_contact_number: self.key_person_contact_number.trim().to_owned(),
            land_phone: non_blank(&self.land_phone),
            latitude: None,
            longitude: None,
            status: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    pub registered_address: String,
    pub website: String,
    pub facebook_link: String,
    pub instagram_link: String,
    pub google_map_link: String,
    pub youtube_link: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] when the registered address is blank.
    pub fn validate(&self) -> Result<(), FlowError> {
        require_filled(&[("registered_address", self.registered_address.as_str())])
    }
}

#[derive(Clone, Debug, Default)]
pub struct StoreForm {
    pub working_hours_from: String,
    pub working_hours_to: String,
    pub home_delivery: bool,
    pub logo: Option<Upload>,
    pub store_photo: Option<Upload>,
}

impl StoreForm {
    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] unless both working-hour bounds are set.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.working_hours_from.trim().is_empty() || self.working_hours_to.trim().is_empty() {
            return Err(FlowError::Validation("Please fill in working hours".to_owned()));
        }
        Ok(())
    }
}

// =============================================================================
// WIZARD
// =============================================================================

pub struct OnboardingWizard<'a> {
    ctx: &'a AppContext,
    step: WizardStep,
    pub location: LocationForm,
    pub contact: ContactForm,
    pub store: StoreForm,
    default_branch: Option<String>,
    busy: BusyFlag,
}

impl<'a> OnboardingWizard<'a> {
    #[must_use]
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            step: WizardStep::Location,
            location: LocationForm::default(),
            contact: ContactForm::default(),
            store: StoreForm::default(),
            default_branch: None,
            busy: BusyFlag::default(),
        }
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Id of the branch created by the location step.
    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    /// Create the vendor profile the wizard steps attach to, then refresh the
    /// session so it is cached.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on invalid input, missing session or backend
    /// rejection.
    pub async fn create_vendor(&self, form: &VendorForm) -> Result<VendorDetails, FlowError> {
        let business_type = form.validate()?;
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        let body = VendorCreate {
            name: form.name.trim().to_owned(),
            contact_number: form.contact_number.trim().to_owned(),
            shop_type: form.shop_type.trim().to_owned(),
            business_type,
            owner_name: non_blank(&form.owner_name),
        };
        let vendor = self.ctx.api.vendors(&token).create(&body).await?;
        tracing::info!(vendor_id = %vendor.id, "vendor profile created");
        self.ctx.session.refresh_user().await?;
        Ok(vendor)
    }

    /// Validate and save the current step, then advance.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on invalid input, missing session or vendor, or
    /// backend rejection. The step does not advance on error.
    pub async fn next(&mut self) -> Result<WizardProgress, FlowError> {
        match self.step {
            WizardStep::Location => self.location.validate()?,
            WizardStep::Contact => self.contact.validate()?,
            WizardStep::Store => self.store.validate()?,
        }
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;

        match self.step {
            WizardStep::Location => {
                let branch_id = self.save_location(&token).await?;
                self.default_branch = Some(branch_id);
                self.step = WizardStep::Contact;
            }
            WizardStep::Contact => {
                self.save_contact(&token).await?;
                self.step = WizardStep::Store;
            }
            WizardStep::Store => {
                self.save_store(&token).await?;
                self.ctx.session.refresh_user().await?;
                let route = landing_route(&self.ctx.session.snapshot());
                tracing::info!(%route, "onboarding wizard finished");
                return Ok(WizardProgress::Completed(route));
            }
        }
        tracing::debug!(step = %self.step, "wizard advanced");
        Ok(WizardProgress::Advanced(self.step))
    }

    /// Step back without saving. No-op on the first step.
    pub fn previous(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    async fn save_location(&self, token: &str) -> Result<String, FlowError> {
        let vendor_id =
            session_vendor_id(self.ctx).ok_or_else(|| FlowError::Validation(BRANCH_NEEDS_VENDOR.to_owned()))?;
        let branch = self
            .ctx
            .api
            .branches(token)
            .create(&self.location.to_branch(vendor_id))
            .await?;
        let update = VendorUpdate { land_phone: non_blank(&self.location.land_phone), ..VendorUpdate::default() };
        let echo = self.ctx.api.vendors(token).update(&update).await?;
        merge_vendor_echo(self.ctx, echo).await?;
        Ok(branch.id)
    }

    async fn save_contact(&self, token: &str) -> Result<(), FlowError> {
        let update = VendorUpdate {
            website: non_blank(&self.contact.website),
            facebook: non_blank(&self.contact.facebook_link),
            instagram: non_blank(&self.contact.instagram_link),
            youtube: non_blank(&self.contact.youtube_link),
            google_map: non_blank(&self.contact.google_map_link),
            ..VendorUpdate::default()
        };
        let echo = self.ctx.api.vendors(token).update(&update).await?;
        merge_vendor_echo(self.ctx, echo).await
    }

    async fn save_store(&self, token: &str) -> Result<(), FlowError> {
        let body = VendorProfileUpdate {
            default_branch: self.default_branch.clone(),
            registered_address: non_blank(&self.contact.registered_address),
            website: non_blank(&self.contact.website),
            facebook_link: non_blank(&self.contact.facebook_link),
            instagram_link: non_blank(&self.contact.instagram_link),
            google_map_link: non_blank(&self.contact.google_map_link),
            youtube_link: non_blank(&self.contact.youtube_link),
            working_hours_from: non_blank(&self.store.working_hours_from),
            working_hours_to: non_blank(&self.store.working_hours_to),
            home_delivery: Some(self.store.home_delivery),
            logo: self.store.logo.clone(),
            store_photo: self.store.store_photo.clone(),
        };
        self.ctx.api.vendors(token).update_profile(body).await?;
        Ok(())
    }
}
