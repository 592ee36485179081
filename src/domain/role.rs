//! Role domain model

use super::errors::WardroomError;
use super::ids::RoleId;
use super::patch::non_blank;
use super::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The top-level role; the only role that does not require a hospital
pub const SUPER_ADMIN_ROLE: &str = "Super Admin";

/// Role assigned to the admin account created alongside a hospital
pub const HOSPITAL_ADMIN_ROLE: &str = "Hospital Admin";

/// Returns true if `role` names the top-level role
pub fn is_super_admin(role: &str) -> bool {
    role.trim().eq_ignore_ascii_case(SUPER_ADMIN_ROLE)
}

/// A named set of permissions
///
/// `name` is the key users reference, so it is unique (case-insensitively) across roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier
    pub id: RoleId,

    /// Unique display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Permission labels
    pub permissions: BTreeSet<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Merges the supplied patch fields, leaving omitted fields untouched
    pub fn apply(&mut self, patch: RolePatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
    }
}

/// Role creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRole {
    /// Unique display name
    #[serde(default)]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Permission labels
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl NewRole {
    /// Creates a request with a name and description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            permissions: BTreeSet::new(),
        }
    }

    /// Adds permission labels
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Rejects a blank name
    pub fn validate(&self) -> Result<()> {
        if non_blank(&self.name).is_none() {
            return Err(WardroomError::validation("role name is required"));
        }
        Ok(())
    }
}

/// Partial role update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePatch {
    /// New name; users holding the old name are moved to it
    #[serde(default)]
    pub name: Option<String>,

    /// New description
    #[serde(default)]
    pub description: Option<String>,

    /// Replacement permission set
    #[serde(default)]
    pub permissions: Option<BTreeSet<String>>,
}

impl RolePatch {
    /// Rejects a blank replacement name
    pub fn validate(&self) -> Result<()> {
        if matches!(self.name.as_deref(), Some(name) if non_blank(name).is_none()) {
            return Err(WardroomError::validation("role name cannot be blank"));
        }
        Ok(())
    }
}

/// Role listing entry with its derived usage count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    /// The role record
    #[serde(flatten)]
    pub role: Role,

    /// Number of users holding the role
    pub user_count: usize,
}
