//! Wire DTOs for the vendor backend.
//!
//! DESIGN
//! ======
//! Field names mirror the backend JSON exactly so serde stays lossless.
//! Read models are lenient (`#[serde(default)]` on fields the backend may
//! omit); write models skip `None` fields so partial updates stay partial.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// ACCOUNT
// =============================================================================

/// Identity record returned by `user_info`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub auth_provider: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub phone_verified: bool,
    #[serde(default)]
    pub has_vendor_account: bool,
    #[serde(default)]
    pub has_customer_account: bool,
}

/// A sign-in provider linked to the backend account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderLink {
    pub provider: String,
    pub provider_uid: String,
    #[serde(default)]
    pub extra_data: serde_json::Value,
}

/// Response of the backend identity exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirebaseAuthResponse {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub phone_verified: bool,
    #[serde(default)]
    pub providers: Vec<ProviderLink>,
    #[serde(default)]
    pub new_user: bool,
    /// Backend-issued bearer token. Absent when the backend accepts the
    /// identity assertion itself as the bearer token.
    #[serde(default)]
    pub token: Option<String>,
}

// =============================================================================
// ONBOARDING
// =============================================================================

/// Per-step completion flags. Independent of [`OnboardingStatus::is_onboarded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatus {
    #[serde(default)]
    pub default_branch: bool,
    #[serde(default)]
    pub contact_details: bool,
    #[serde(default)]
    pub store_details: bool,
}

/// Server-computed onboarding state.
///
/// `is_onboarded` is its own field; it is never reduced from `step_status`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStatus {
    pub is_onboarded: bool,
    #[serde(default)]
    pub step_status: StepStatus,
}

// =============================================================================
// VENDOR
// =============================================================================

/// Allowed vendor business types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessType {
    Wholesale,
    Retail,
    #[serde(rename = "Wholesale & Retail")]
    WholesaleAndRetail,
    #[serde(rename = "Service based")]
    ServiceBased,
}

impl BusinessType {
    pub const ALL: [Self; 4] = [Self::Wholesale, Self::Retail, Self::WholesaleAndRetail, Self::ServiceBased];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wholesale => "Wholesale",
            Self::Retail => "Retail",
            Self::WholesaleAndRetail => "Wholesale & Retail",
            Self::ServiceBased => "Service based",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown business type: {trimmed}"))
    }
}

/// Shop category offered by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Shop type as embedded in a vendor: expanded on reads, a bare id in
/// mutation echoes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShopTypeRef {
    Detailed(ShopType),
    Id(String),
}

impl ShopTypeRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Detailed(shop_type) => &shop_type.id,
            Self::Id(id) => id,
        }
    }
}

/// Vendor profile cached in the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VendorDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact_number: String,
    pub shop_type: Option<ShopTypeRef>,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub is_onboarded: bool,
    #[serde(default)]
    pub profile: serde_json::Value,
    #[serde(default)]
    pub branches: Vec<serde_json::Value>,
}

impl VendorDetails {
    /// Overwrite the fields present in `patch`, keeping everything else.
    pub fn apply(&mut self, patch: VendorPatch) {
        let VendorPatch {
            name,
            contact_number,
            shop_type,
            business_type,
            owner_name,
            is_onboarded,
            profile,
            branches,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(contact_number) = contact_number {
            self.contact_number = contact_number;
        }
        if let Some(shop_type) = shop_type {
            self.shop_type = Some(shop_type);
        }
        if let Some(business_type) = business_type {
            self.business_type = business_type;
        }
        if let Some(owner_name) = owner_name {
            self.owner_name = Some(owner_name);
        }
        if let Some(is_onboarded) = is_onboarded {
            self.is_onboarded = is_onboarded;
        }
        if let Some(profile) = profile {
            self.profile = profile;
        }
        if let Some(branches) = branches {
            self.branches = branches;
        }
    }
}

/// Partial vendor record: either a local edit or a mutation response.
///
/// Unknown response fields are ignored; the id is never patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_type: Option<ShopTypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_onboarded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<serde_json::Value>>,
}

/// Body of `vendor/create/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VendorCreate {
    pub name: String,
    pub contact_number: String,
    /// Shop type id.
    pub shop_type: String,
    pub business_type: BusinessType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

/// Body of `vendor/update/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VendorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<BusinessType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_map: Option<String>,
}

/// File attached to a multipart profile update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart body of `vendor/profile/update/`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VendorProfileUpdate {
    pub default_branch: Option<String>,
    pub registered_address: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub instagram_link: Option<String>,
    pub google_map_link: Option<String>,
    pub youtube_link: Option<String>,
    pub working_hours_from: Option<String>,
    pub working_hours_to: Option<String>,
    pub home_delivery: Option<bool>,
    pub logo: Option<Upload>,
    pub store_photo: Option<Upload>,
}

impl VendorProfileUpdate {
    /// Text parts in send order; unset fields are omitted.
    #[must_use]
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("default_branch", self.default_branch.clone()),
            ("registered_address", self.registered_address.clone()),
            ("website", self.website.clone()),
            ("facebook_link", self.facebook_link.clone()),
            ("instagram_link", self.instagram_link.clone()),
            ("google_map_link", self.google_map_link.clone()),
            ("youtube_link", self.youtube_link.clone()),
            ("working_hours_from", self.working_hours_from.clone()),
            ("working_hours_to", self.working_hours_to.clone()),
            ("home_delivery", self.home_delivery.map(|flag| flag.to_string())),
        ];
        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name, value)))
            .collect()
    }
}

/// Admin verification state of the vendor profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub verified: bool,
    #[serde(default)]
    pub pending_changes: bool,
    #[serde(default)]
    pub verification_message: String,
}

// =============================================================================
// LOCATION LOOKUPS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub name: String,
    pub state: String,
}

// =============================================================================
// BRANCH
// =============================================================================

/// A vendor branch (shop location).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    #[serde(default)]
    pub vendor: Option<String>,
    pub country: String,
    pub state: String,
    pub district: String,
    pub shop_locality: String,
    pub nearby_town: String,
    pub pin_code: String,
    #[serde(default)]
    pub key_person_name: Option<String>,
    #[serde(default)]
    pub key_person_contact_number: Option<String>,
    #[serde(default)]
    pub land_phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `branches/` POST.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BranchCreate {
    pub vendor: String,
    pub country: String,
    pub state: String,
    pub district: String,
    pub shop_locality: String,
    pub nearby_town: String,
    pub pin_code: String,
    pub key_person_name: String,
    pub key_person_contact_number: String,
    pub land_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Body of `branches/{id}/` PATCH.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BranchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_town: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_person_contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// =============================================================================
// DISCOUNT
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[default]
    TotalBill,
    CategoryBased,
    SpecialOffer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValueType {
    #[default]
    Flat,
    Percentage,
}

/// A discount offered by the vendor on one or more branches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: String,
    pub vendor: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value_type: DiscountValueType,
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    pub value: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Body of `discounts/` POST.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiscountCreate {
    pub vendor: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value_type: DiscountValueType,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub branches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub is_active: bool,
}

/// Body of `discounts/{id}/` PATCH.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiscountUpdate {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DiscountKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<DiscountValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// DECLARATION
// =============================================================================

/// Signed vendor declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub vendor: String,
    pub agreed_to_terms: bool,
    pub declaration_text: String,
    /// RFC 3339 timestamp of signing.
    pub signed_date: String,
}

// =============================================================================
// HELPERS
// =============================================================================

fn default_true() -> bool {
    true
}

/// Accept a JSON number or a numeric string (decimal fields arrive as
/// `"10.00"`).
fn deserialize_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| D::Error::custom("expected finite number")),
        serde_json::Value::String(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected numeric string, got {raw:?}"))),
        _ => Err(D::Error::custom("expected number")),
    }
}
