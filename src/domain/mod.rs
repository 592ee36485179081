//! Domain models and types for Wardroom.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`HospitalId`], [`UserId`], [`RoleId`], [`PatientId`],
//!   [`ClinicianId`], [`NotificationId`], [`Mrn`])
//! - **Entity records** ([`Hospital`], [`User`], [`Role`], [`Patient`], [`Clinician`])
//! - **Create and patch inputs** ([`NewHospital`], [`HospitalPatch`], ...)
//! - **Notifications** ([`NotificationEvent`], [`Notification`], [`NotificationType`])
//! - **Error types** ([`WardroomError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Ids are newtypes, so ids from different collections cannot be mixed:
//!
//! ```rust
//! use wardroom::domain::{HospitalId, RoleId};
//!
//! let hospital_id = HospitalId::new("1").unwrap();
//! let role_id = RoleId::new("1").unwrap();
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: HospitalId = role_id;
//! # let _ = (hospital_id, role_id);
//! ```
//!
//! # Partial Updates
//!
//! Patch types leave omitted fields untouched. Optional fields use a double `Option` so an
//! explicit JSON `null` clears a value while an absent key keeps it.

pub mod clinician;
pub mod errors;
pub mod hospital;
pub mod ids;
pub mod notification;
pub mod patch;
pub mod patient;
pub mod result;
pub mod role;
pub mod user;

// Re-export commonly used types for convenience
pub use clinician::{Clinician, ClinicianPatch, ClinicianProfile, MaritalStatus, NewClinician};
pub use errors::{ErrorBody, WardroomError};
pub use hospital::{Hospital, HospitalCreated, HospitalPatch, HospitalSummary, NewHospital};
pub use ids::{ClinicianId, HospitalId, Mrn, NotificationId, PatientId, RoleId, UserId};
pub use notification::{Notification, NotificationEvent, NotificationType};
pub use patient::{NewPatient, Patient, PatientPatch};
pub use result::Result;
pub use role::{
    is_super_admin, NewRole, Role, RolePatch, RoleSummary, HOSPITAL_ADMIN_ROLE, SUPER_ADMIN_ROLE,
};
pub use user::{NewUser, User, UserPatch};
