//! Branch management screen.

#[cfg(test)]
#[path = "branches_test.rs"]
mod branches_test;

use super::wizard::BRANCH_NEEDS_VENDOR;
use super::{BusyFlag, FlowError, non_blank, require_filled, session_token, session_vendor_id};
use crate::app::AppContext;
use crate::net::types::{Branch, BranchCreate, BranchUpdate};

pub const BRANCH_ADDED: &str = "Branch added successfully";
pub const BRANCH_UPDATED: &str = "Branch updated successfully";
pub const BRANCH_DELETED: &str = "Branch deleted successfully";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchForm {
    pub country: String,
    pub state: String,
    pub district: String,
    pub shop_locality: String,
    pub nearby_town: String,
    pub pin_code: String,
    pub key_person_name: String,
    pub key_person_contact_number: String,
    pub land_phone: String,
    pub latitude: String,
    pub longitude: String,
}

impl BranchForm {
    /// Edit form for an existing branch.
    #[must_use]
    pub fn from_branch(branch: &Branch) -> Self {
        Self {
            country: branch.country.clone(),
            state: branch.state.clone(),
            district: branch.district.clone(),
            shop_locality: branch.shop_locality.clone(),
            nearby_town: branch.nearby_town.clone(),
            pin_code: branch.pin_code.clone(),
            key_person_name: branch.key_person_name.clone().unwrap_or_default(),
            key_person_contact_number: branch.key_person_contact_number.clone().unwrap_or_default(),
            land_phone: branch.land_phone.clone().unwrap_or_default(),
            latitude: branch.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: branch.longitude.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    /// # Errors
    ///
    /// Returns [`FlowError::Validation`] for the first blank required field
    /// or an unparsable coordinate.
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
        ])?;
        parse_coordinate("latitude", &self.latitude)?;
        parse_coordinate("longitude", &self.longitude)?;
        Ok(())
    }

    fn to_create(&self, vendor: String) -> Result<BranchCreate, FlowError> {
        Ok(BranchCreate {
            vendor,
            country: self.country.trim().to_owned(),
            state: self.state.trim().to_owned(),
            district: self.district.trim().to_owned(),
            shop_locality: self.shop_locality.trim().to_owned(),
            nearby_town: self.nearby_town.trim().to_owned(),
            pin_code: self.pin_code.trim().to_owned(),
            key_person_name: self.key_person_name.trim().to_owned(),
            key_person_contact_number: self.key_person_contact_number.trim().to_owned(),
            land_phone: non_blank(&self.land_phone),
            latitude: parse_coordinate("latitude", &self.latitude)?,
            longitude: parse_coordinate("longitude", &self.longitude)?,
            status: None,
        })
    }

    fn to_update(&self) -> Result<BranchUpdate, FlowError> {
        Ok(BranchUpdate {
            country: Some(self.country.trim().to_owned()),
            state: Some(self.state.trim().to_owned()),
            district: Some(self.district.trim().to_owned()),
            shop_locality: Some(self.shop_locality.trim().to_owned()),
            nearby_town: Some(self.nearby_town.trim().to_owned()),
            pin_code: Some(self.pin_code.trim().to_owned()),
            key_person_name: Some(self.key_person_name.trim().to_owned()),
            key_person_contact_number: Some(self.key_person_contact_number.trim().to_owned()),
            land_phone: non_blank(&self.land_phone),
            latitude: parse_coordinate("latitude", &self.latitude)?,
            longitude: parse_coordinate("longitude", &self.longitude)?,
            status: None,
        })
    }
}

fn parse_coordinate(name: &str, raw: &str) -> Result<Option<f64>, FlowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| FlowError::Validation(format!("Please enter a valid {name}")))
}

pub struct BranchFlow<'a> {
    ctx: &'a AppContext,
    busy: BusyFlag,
}

impl<'a> BranchFlow<'a> {
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
    pub async fn list(&self) -> Result<Vec<Branch>, FlowError> {
        let token = session_token(self.ctx)?;
        Ok(self.ctx.api.branches(&token).list().await?)
    }

    /// Create a branch, or update `editing` when given.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on invalid input, missing session or vendor, or
    /// backend rejection.
    pub async fn save(&self, form: &BranchForm, editing: Option<&str>) -> Result<Branch, FlowError> {
        form.validate()?;
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        let client = self.ctx.api.branches(&token);
        let branch = match editing {
            Some(id) => client.update(id, &form.to_update()?).await?,
            None => {
                let vendor = session_vendor_id(self.ctx)
                    .ok_or_else(|| FlowError::Validation(BRANCH_NEEDS_VENDOR.to_owned()))?;
                client.create(&form.to_create(vendor)?).await?
            }
        };
        tracing::info!(branch_id = %branch.id, updated = editing.is_some(), "branch saved");
        Ok(branch)
    }

    /// # Errors
    ///
    /// Returns [`FlowError`] on missing session or backend rejection.
    pub async fn delete(&self, id: &str) -> Result<(), FlowError> {
        let token = session_token(self.ctx)?;
        let _busy = self.busy.try_enter().ok_or(FlowError::Busy)?;
        self.ctx.api.branches(&token).delete(id).await?;
        tracing::info!(branch_id = id, "branch deleted");
        Ok(())
    }
}
