//! Cross-collection integrity rules
//!
//! These checks run inline inside entity store mutations, before any record is written.
//! Counts are derived by linear scan on every call and never cached.

use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use crate::domain::{
    is_super_admin, Hospital, HospitalId, Role, RoleId, User, UserId, HOSPITAL_ADMIN_ROLE,
    SUPER_ADMIN_ROLE,
};

/// Number of `Hospital Admin` users attached to a hospital
pub fn admin_count(users: &[User], hospital_id: &HospitalId) -> usize {
    users
        .iter()
        .filter(|u| {
            u.hospital_id.as_ref() == Some(hospital_id)
                && u.role.eq_ignore_ascii_case(HOSPITAL_ADMIN_ROLE)
        })
        .count()
}

/// Number of users holding the role called `role_name`
pub fn role_usage(users: &[User], role_name: &str) -> usize {
    users
        .iter()
        .filter(|u| u.role.eq_ignore_ascii_case(role_name.trim()))
        .count()
}

/// Number of users whose `hospital_id` points at `hospital_id`
pub fn users_in_hospital(users: &[User], hospital_id: &HospitalId) -> usize {
    users
        .iter()
        .filter(|u| u.hospital_id.as_ref() == Some(hospital_id))
        .count()
}

/// Fails with `PreconditionFailed` while any user still holds the role
pub fn ensure_role_deletable(role: &Role, users: &[User]) -> Result<()> {
    let usage = role_usage(users, &role.name);
    if usage > 0 {
        return Err(WardroomError::PreconditionFailed(format!(
            "role '{}' is assigned to {} user(s); reassign them before deleting it",
            role.name, usage
        )));
    }
    Ok(())
}

/// Fails with `PreconditionFailed` if `role` is `Super Admin` or `Hospital Admin`
///
/// The hospital exemption and hospital creation both look these roles up by name, so they
/// can be neither renamed nor deleted.
pub fn ensure_not_builtin(role: &Role, action: &str) -> Result<()> {
    if role.is_named(SUPER_ADMIN_ROLE) || role.is_named(HOSPITAL_ADMIN_ROLE) {
        return Err(WardroomError::PreconditionFailed(format!(
            "built-in role '{}' cannot be {action}",
            role.name
        )));
    }
    Ok(())
}

/// Resolves a role name to the stored role, failing with `ValidationFailed` if unknown
pub fn ensure_role_exists<'a>(roles: &'a [Role], role_name: &str) -> Result<&'a Role> {
    roles
        .iter()
        .find(|r| r.is_named(role_name))
        .ok_or_else(|| WardroomError::validation(format!("unknown role '{}'", role_name.trim())))
}

/// Enforces the hospital requirement for a user's role
///
/// Every role other than `Super Admin` needs a hospital; a supplied hospital must exist
/// regardless of role.
pub fn ensure_hospital_requirement(
    role: &str,
    hospital_id: Option<&HospitalId>,
    hospitals: &[Hospital],
) -> Result<()> {
    match hospital_id {
        Some(id) => {
            if !hospitals.iter().any(|h| &h.id == id) {
                return Err(WardroomError::validation(format!(
                    "hospital_id '{id}' does not reference an existing hospital"
                )));
            }
            Ok(())
        }
        None if is_super_admin(role) => Ok(()),
        None => Err(WardroomError::validation(format!(
            "hospital_id is required for role '{}'",
            role.trim()
        ))),
    }
}

/// Rejects an email already used by another user
pub fn ensure_unique_email(users: &[User], email: &str, except: Option<&UserId>) -> Result<()> {
    let taken = users
        .iter()
        .any(|u| Some(&u.id) != except && u.email.eq_ignore_ascii_case(email.trim()));
    if taken {
        return Err(WardroomError::validation(format!(
            "email '{}' is already in use",
            email.trim()
        )));
    }
    Ok(())
}

/// Rejects a role name already used by another role
pub fn ensure_unique_role_name(roles: &[Role], name: &str, except: Option<&RoleId>) -> Result<()> {
    if roles
        .iter()
        .any(|r| Some(&r.id) != except && r.is_named(name))
    {
        return Err(WardroomError::validation(format!(
            "role '{}' already exists",
            name.trim()
        )));
    }
    Ok(())
}
