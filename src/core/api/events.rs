//! Notification events derived from entity mutations

use crate::domain::{Hospital, NotificationEvent, NotificationType, Role, User};
use serde_json::json;

/// Console route for a hospital's detail screen
fn hospital_route(hospital: &Hospital) -> String {
    format!("/hospitals/{}", hospital.id)
}

/// Event for a new hospital and its linked admin account
pub fn hospital_created(hospital: &Hospital, admin: &User) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::HospitalCreated,
        "Hospital created",
        format!("{} was added with admin {}", hospital.name, admin.email),
    )
    .with_route(hospital_route(hospital))
    .with_metadata(json!({ "hospitalId": hospital.id, "adminUserId": admin.id }))
}

/// Event for an edited hospital
pub fn hospital_updated(hospital: &Hospital) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::HospitalUpdated,
        "Hospital updated",
        format!("{} was updated", hospital.name),
    )
    .with_route(hospital_route(hospital))
    .with_metadata(json!({ "hospitalId": hospital.id }))
}

/// Event for a removed hospital
pub fn hospital_deleted(hospital: &Hospital) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::HospitalDeleted,
        "Hospital deleted",
        format!("{} was removed", hospital.name),
    )
    .with_route("/hospitals")
    .with_metadata(json!({ "hospitalId": hospital.id }))
}

/// Event for a new user account
pub fn user_created(user: &User) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::UserCreated,
        "User created",
        format!("{} joined as {}", user.name, user.role),
    )
    .with_route(format!("/users/{}", user.id))
    .with_metadata(json!({ "userId": user.id, "role": user.role }))
}

/// Event for an edited user account
pub fn user_updated(user: &User) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::UserUpdated,
        "User updated",
        format!("{}'s account was updated", user.name),
    )
    .with_route(format!("/users/{}", user.id))
    .with_metadata(json!({ "userId": user.id }))
}

/// Event for a removed user account
pub fn user_deleted(user: &User) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::UserDeleted,
        "User deleted",
        format!("{}'s account was removed", user.name),
    )
    .with_route("/users")
    .with_metadata(json!({ "userId": user.id }))
}

/// Event for a new role
pub fn role_created(role: &Role) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::RoleCreated,
        "Role created",
        format!("Role {} was created", role.name),
    )
    .with_route("/roles")
    .with_metadata(json!({ "roleId": role.id }))
}

/// Event for an edited or renamed role
pub fn role_updated(role: &Role) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::RoleUpdated,
        "Role updated",
        format!("Role {} was updated", role.name),
    )
    .with_route("/roles")
    .with_metadata(json!({ "roleId": role.id }))
}

/// Event for a removed role
pub fn role_deleted(role: &Role) -> NotificationEvent {
    NotificationEvent::new(
        NotificationType::RoleDeleted,
        "Role deleted",
        format!("Role {} was deleted", role.name),
    )
    .with_route("/roles")
    .with_metadata(json!({ "roleId": role.id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HospitalId, UserId};
    use chrono::Utc;

    #[test]
    fn test_hospital_created_event() {
        let hospital = Hospital {
            id: HospitalId::from_sequence(4),
            name: "City General".to_string(),
            country: None,
            timezone: "UTC".to_string(),
            created_at: Utc::now(),
        };
        let admin = User {
            id: UserId::from_sequence(9),
            name: "City General Admin".to_string(),
            email: "a@x.com".to_string(),
            role: "Hospital Admin".to_string(),
            hospital_id: Some(hospital.id.clone()),
            last_active: "Never".to_string(),
        };

        let event = hospital_created(&hospital, &admin);
        assert_eq!(event.kind, NotificationType::HospitalCreated);
        assert_eq!(event.route.as_deref(), Some("/hospitals/4"));
        assert!(event.message.contains("a@x.com"));
        assert_eq!(event.metadata.unwrap()["adminUserId"], "9");
    }
}
