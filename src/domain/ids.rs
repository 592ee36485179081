//! Domain identifier types with validation
//!
//! Every collection gets its own newtype so a `RoleId` can never be passed where a
//! `HospitalId` is expected. Ids are opaque strings; the entity store happens to mint them
//! from per-collection sequences.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new id, rejecting blank strings
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Creates an id from a store sequence number
            pub fn from_sequence(seq: u64) -> Self {
                Self(seq.to_string())
            }

            /// Returns the id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Hospital identifier
    HospitalId,
    "Hospital ID"
);
define_id!(
    /// User account identifier
    UserId,
    "User ID"
);
define_id!(
    /// Role identifier
    RoleId,
    "Role ID"
);
define_id!(
    /// Patient identifier
    PatientId,
    "Patient ID"
);
define_id!(
    /// Clinician identifier
    ClinicianId,
    "Clinician ID"
);
define_id!(
    /// Notification identifier (UUID v4 when minted by the notification store)
    NotificationId,
    "Notification ID"
);

impl NotificationId {
    /// Generates a fresh random notification id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Medical Record Number
///
/// Format: `MRN-` followed by the zero-padded (six digit minimum) sequence number.
///
/// # Examples
///
/// ```
/// use wardroom::domain::ids::Mrn;
///
/// let mrn = Mrn::from_sequence(42);
/// assert_eq!(mrn.as_str(), "MRN-000042");
/// assert_eq!(mrn.sequence(), 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mrn(String);

impl Mrn {
    const PREFIX: &'static str = "MRN-";

    /// Formats an MRN from its sequence number
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("{}{:06}", Self::PREFIX, seq))
    }

    /// Parses an MRN string, validating the prefix and numeric part
    pub fn parse(value: &str) -> Result<Self, String> {
        let digits = value
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| format!("Invalid MRN '{value}': missing {} prefix", Self::PREFIX))?;
        if digits.len() < 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid MRN '{value}': expected at least six digits"));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the MRN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric sequence part of the MRN
    pub fn sequence(&self) -> u64 {
        self.0[Self::PREFIX.len()..].parse().unwrap_or_default()
    }
}

impl fmt::Display for Mrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Mrn {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mrn {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sequence().cmp(&other.sequence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hospital_id_creation() {
        let id = HospitalId::new("7").unwrap();
        assert_eq!(id.as_str(), "7");
    }

    #[test]
    fn test_id_empty_fails() {
        assert!(HospitalId::new("").is_err());
        assert!(RoleId::new("   ").is_err());
        assert_eq!(UserId::new("").unwrap_err(), "User ID cannot be empty");
    }

    #[test]
    fn test_id_from_sequence() {
        assert_eq!(PatientId::from_sequence(12).as_str(), "12");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ClinicianId::new("c-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"c-1\"");
        let back: ClinicianId = serde_json::from_str("\"c-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_notification_id_generate_is_unique() {
        assert_ne!(NotificationId::generate(), NotificationId::generate());
    }

    #[test]
    fn test_mrn_padding_and_order() {
        let a = Mrn::from_sequence(9);
        let b = Mrn::from_sequence(10);
        let c = Mrn::from_sequence(1_234_567);
        assert_eq!(a.as_str(), "MRN-000009");
        assert_eq!(c.as_str(), "MRN-1234567");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_mrn_parse() {
        assert_eq!(Mrn::parse("MRN-000123").unwrap().sequence(), 123);
        assert!(Mrn::parse("000123").is_err());
        assert!(Mrn::parse("MRN-12").is_err());
        assert!(Mrn::parse("MRN-00012a").is_err());
    }
}
