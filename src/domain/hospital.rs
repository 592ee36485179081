//! Hospital domain model

use super::errors::WardroomError;
use super::ids::HospitalId;
use super::patch::{double_option, non_blank};
use super::result::Result;
use super::user::User;
use crate::config::SecretString;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Timezone assigned when a hospital is created without one
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// A hospital managed by the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    /// Unique identifier
    pub id: HospitalId,

    /// Display name
    pub name: String,

    /// Country, if known
    pub country: Option<String>,

    /// IANA timezone name
    pub timezone: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Hospital {
    /// Merges the supplied patch fields, leaving omitted fields untouched
    pub fn apply(&mut self, patch: HospitalPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(timezone) = patch.timezone {
            self.timezone = timezone;
        }
    }
}

/// Hospital creation request
///
/// The admin credentials are mandatory: creating a hospital always creates its first
/// `Hospital Admin` account in the same operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHospital {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Country
    #[serde(default)]
    pub country: Option<String>,

    /// Timezone, defaults to [`DEFAULT_TIMEZONE`]
    #[serde(default)]
    pub timezone: Option<String>,

    /// Email of the admin account created alongside the hospital
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Password of the admin account; only checked for presence, never stored
    #[serde(default)]
    pub admin_password: Option<SecretString>,

    /// Display name of the admin account, defaults to "<hospital> Admin"
    #[serde(default)]
    pub admin_name: Option<String>,
}

impl NewHospital {
    /// Creates a request with the three required fields
    pub fn new(
        name: impl Into<String>,
        admin_email: impl Into<String>,
        admin_password: SecretString,
    ) -> Self {
        Self {
            name: name.into(),
            country: None,
            timezone: None,
            admin_email: Some(admin_email.into()),
            admin_password: Some(admin_password),
            admin_name: None,
        }
    }

    /// Sets the country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the timezone
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Validates the name and admin credentials
    pub fn validate(&self) -> Result<()> {
        if non_blank(&self.name).is_none() {
            return Err(WardroomError::validation("hospital name is required"));
        }

        match self.admin_email.as_deref().and_then(non_blank) {
            None => return Err(WardroomError::validation("adminEmail is required")),
            Some(email) if !email.contains('@') => {
                return Err(WardroomError::validation(format!(
                    "adminEmail '{email}' is not a valid email address"
                )))
            }
            Some(_) => {}
        }

        let has_password = self
            .admin_password
            .as_ref()
            .map(|p| !p.expose_secret().is_empty())
            .unwrap_or(false);
        if !has_password {
            return Err(WardroomError::validation("adminPassword is required"));
        }

        Ok(())
    }
}

/// Partial hospital update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HospitalPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,

    /// New country (`null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,

    /// New timezone
    #[serde(default)]
    pub timezone: Option<String>,
}

impl HospitalPatch {
    /// Rejects blank replacement values
    pub fn validate(&self) -> Result<()> {
        if matches!(self.name.as_deref(), Some(name) if non_blank(name).is_none()) {
            return Err(WardroomError::validation("hospital name cannot be blank"));
        }
        if matches!(self.timezone.as_deref(), Some(tz) if non_blank(tz).is_none()) {
            return Err(WardroomError::validation("timezone cannot be blank"));
        }
        Ok(())
    }
}

/// Result of the hospital + admin dual-write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalCreated {
    /// The new hospital
    pub hospital: Hospital,

    /// The linked `Hospital Admin` account
    pub admin: User,
}

/// Hospital listing entry with its derived admin count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalSummary {
    /// The hospital record
    #[serde(flatten)]
    pub hospital: Hospital,

    /// Number of `Hospital Admin` users attached to the hospital
    pub admin_count: usize,
}
