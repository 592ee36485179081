//! User account domain model
//!
//! A `User` is an account record managed by administrators. It is distinct from the
//! signed-in session held by the client-side session store.

use super::errors::WardroomError;
use super::ids::{HospitalId, UserId};
use super::patch::{double_option, non_blank};
use super::result::Result;
use serde::{Deserialize, Serialize};

/// Display value for accounts that never signed in
pub const NEVER_ACTIVE: &str = "Never";

/// An administrator-managed user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Email address, unique across users
    pub email: String,

    /// Role name; references `Role::name`
    pub role: String,

    /// Owning hospital; required unless the role is `Super Admin`
    pub hospital_id: Option<HospitalId>,

    /// Free-form "last active" display string
    pub last_active: String,
}

impl User {
    /// Merges the supplied patch fields, leaving omitted fields untouched
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(role) = patch.role {
            self.role = role.trim().to_string();
        }
        if let Some(hospital_id) = patch.hospital_id {
            self.hospital_id = hospital_id;
        }
        if let Some(last_active) = patch.last_active {
            self.last_active = last_active;
        }
    }
}

/// User creation request
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Role name
    #[serde(default)]
    pub role: String,

    /// Owning hospital
    #[serde(default, alias = "hospitalId")]
    pub hospital_id: Option<HospitalId>,

    /// Initial "last active" display string, defaults to [`NEVER_ACTIVE`]
    #[serde(default, alias = "lastActive")]
    pub last_active: Option<String>,
}

impl NewUser {
    /// Creates a request for a user attached to a hospital
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        hospital_id: Option<HospitalId>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            hospital_id,
            last_active: None,
        }
    }

    /// Checks the fields that do not depend on other collections
    pub fn validate(&self) -> Result<()> {
        if non_blank(&self.name).is_none() {
            return Err(WardroomError::validation("user name is required"));
        }
        validate_email(&self.email)?;
        if non_blank(&self.role).is_none() {
            return Err(WardroomError::validation("user role is required"));
        }
        Ok(())
    }
}

/// Partial user update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,

    /// New email address
    #[serde(default)]
    pub email: Option<String>,

    /// New role name
    #[serde(default)]
    pub role: Option<String>,

    /// New owning hospital (`null` detaches the user)
    #[serde(default, alias = "hospitalId", deserialize_with = "double_option")]
    pub hospital_id: Option<Option<HospitalId>>,

    /// New "last active" display string
    #[serde(default, alias = "lastActive")]
    pub last_active: Option<String>,
}

impl UserPatch {
    /// Rejects blank replacement values
    pub fn validate(&self) -> Result<()> {
        if matches!(self.name.as_deref(), Some(name) if non_blank(name).is_none()) {
            return Err(WardroomError::validation("user name cannot be blank"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if matches!(self.role.as_deref(), Some(role) if non_blank(role).is_none()) {
            return Err(WardroomError::validation("user role cannot be blank"));
        }
        Ok(())
    }
}

pub(crate) fn validate_email(email: &str) -> Result<()> {
    match non_blank(email) {
        None => Err(WardroomError::validation("email is required")),
        Some(email) if !email.contains('@') => Err(WardroomError::validation(format!(
            "'{email}' is not a valid email address"
        ))),
        Some(_) => Ok(()),
    }
}
