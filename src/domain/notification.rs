//! Notification domain model
//!
//! [`NotificationEvent`] is the only inbound shape the notification store accepts; the
//! store stamps it into a [`Notification`] with an id, timestamp and `read = false`.

use super::ids::NotificationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A hospital was created
    HospitalCreated,
    /// A hospital was updated
    HospitalUpdated,
    /// A hospital was deleted
    HospitalDeleted,
    /// A user account was created
    UserCreated,
    /// A user account was updated
    UserUpdated,
    /// A user account was deleted
    UserDeleted,
    /// A role was created
    RoleCreated,
    /// A role was updated
    RoleUpdated,
    /// A role was deleted
    RoleDeleted,
    /// An abnormal system condition was detected
    SystemAbnormal,
    /// A clinical workflow is degraded
    WorkflowDegraded,
    /// A clinical workflow recovered
    WorkflowRecovered,
    /// A security-relevant event occurred
    SecurityAlert,
    /// Two-factor authentication was enabled
    TwoFactorEnabled,
    /// Two-factor authentication was disabled
    TwoFactorDisabled,
}

impl NotificationType {
    /// Every notification kind, in declaration order
    pub const ALL: [NotificationType; 15] = [
        Self::HospitalCreated,
        Self::HospitalUpdated,
        Self::HospitalDeleted,
        Self::UserCreated,
        Self::UserUpdated,
        Self::UserDeleted,
        Self::RoleCreated,
        Self::RoleUpdated,
        Self::RoleDeleted,
        Self::SystemAbnormal,
        Self::WorkflowDegraded,
        Self::WorkflowRecovered,
        Self::SecurityAlert,
        Self::TwoFactorEnabled,
        Self::TwoFactorDisabled,
    ];

    /// Security-relevant kinds that UIs usually highlight
    pub fn is_security(&self) -> bool {
        matches!(
            self,
            Self::SecurityAlert | Self::TwoFactorEnabled | Self::TwoFactorDisabled
        )
    }

    /// Wire name, e.g. `hospital_created`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HospitalCreated => "hospital_created",
            Self::HospitalUpdated => "hospital_updated",
            Self::HospitalDeleted => "hospital_deleted",
            Self::UserCreated => "user_created",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
            Self::RoleCreated => "role_created",
            Self::RoleUpdated => "role_updated",
            Self::RoleDeleted => "role_deleted",
            Self::SystemAbnormal => "system_abnormal",
            Self::WorkflowDegraded => "workflow_degraded",
            Self::WorkflowRecovered => "workflow_recovered",
            Self::SecurityAlert => "security_alert",
            Self::TwoFactorEnabled => "two_factor_enabled",
            Self::TwoFactorDisabled => "two_factor_disabled",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound notification payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Event kind
    #[serde(rename = "type")]
    pub kind: NotificationType,

    /// Short title
    pub title: String,

    /// Body text
    pub message: String,

    /// Console route to open when the notification is clicked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Arbitrary structured context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl NotificationEvent {
    /// Creates an event without route or metadata
    pub fn new(
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            route: None,
            metadata: None,
        }
    }

    /// Sets the console route
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Sets the metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A stored notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Generated identifier
    pub id: NotificationId,

    /// Event kind
    #[serde(rename = "type")]
    pub kind: NotificationType,

    /// Short title
    pub title: String,

    /// Body text
    pub message: String,

    /// When the notification was added
    pub timestamp: DateTime<Utc>,

    /// Whether the user has seen it
    pub read: bool,

    /// Console route to open when the notification is clicked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Arbitrary structured context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Notification {
    /// Stamps an event into an unread notification
    pub fn from_event(event: NotificationEvent) -> Self {
        Self {
            id: NotificationId::generate(),
            kind: event.kind,
            title: event.title,
            message: event.message,
            timestamp: Utc::now(),
            read: false,
            route: event.route,
            metadata: event.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_type_wire_names_match_serde() {
        for kind in NotificationType::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, json!(kind.as_str()));
        }
    }

    #[test]
    fn test_event_deserializes_from_contract_shape() {
        let event: NotificationEvent = serde_json::from_value(json!({
            "type": "role_deleted",
            "title": "Role deleted",
            "message": "Support Staff was removed",
            "route": "/roles"
        }))
        .unwrap();
        assert_eq!(event.kind, NotificationType::RoleDeleted);
        assert_eq!(event.route.as_deref(), Some("/roles"));
        assert!(event.metadata.is_none());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = serde_json::from_value::<NotificationEvent>(json!({
            "type": "coffee_ready",
            "title": "t",
            "message": "m"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_event_is_unread() {
        let event = NotificationEvent::new(NotificationType::SecurityAlert, "Alert", "Login")
            .with_metadata(json!({"ip": "10.0.0.1"}));
        let notification = Notification::from_event(event);
        assert!(!notification.read);
        assert!(notification.kind.is_security());
        assert_eq!(notification.metadata.unwrap()["ip"], "10.0.0.1");
    }
}
