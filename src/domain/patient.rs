//! Patient domain model

use super::errors::WardroomError;
use super::ids::{HospitalId, Mrn, PatientId};
use super::patch::{double_option, non_blank};
use super::result::Result;
use super::user::validate_email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patient registered at a hospital
///
/// The MRN is assigned once at registration and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier
    pub id: PatientId,

    /// Hospital the patient is registered at
    pub hospital_id: HospitalId,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone
    pub phone: Option<String>,

    /// Medical Record Number
    pub mrn: Mrn,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Merges the supplied patch fields; the MRN is never touched
    pub fn apply(&mut self, patch: PatientPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }
}

/// Patient registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPatient {
    /// Given name
    #[serde(default, alias = "firstName")]
    pub first_name: String,

    /// Family name
    #[serde(default, alias = "lastName")]
    pub last_name: String,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewPatient {
    /// Creates a request with the required names
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
        }
    }

    /// Sets the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the contact phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Checks required names and the optional email format
    pub fn validate(&self) -> Result<()> {
        if non_blank(&self.first_name).is_none() {
            return Err(WardroomError::validation("patient first_name is required"));
        }
        if non_blank(&self.last_name).is_none() {
            return Err(WardroomError::validation("patient last_name is required"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Partial patient update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientPatch {
    /// New given name
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,

    /// New family name
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,

    /// New email (`null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,

    /// New phone (`null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl PatientPatch {
    /// Rejects blank names and malformed emails
    pub fn validate(&self) -> Result<()> {
        if matches!(self.first_name.as_deref(), Some(n) if non_blank(n).is_none()) {
            return Err(WardroomError::validation("patient first_name cannot be blank"));
        }
        if matches!(self.last_name.as_deref(), Some(n) if non_blank(n).is_none()) {
            return Err(WardroomError::validation("patient last_name cannot be blank"));
        }
        if let Some(Some(email)) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient_validation() {
        assert!(NewPatient::new("Ama", "Owusu").validate().is_ok());
        assert!(NewPatient::new("", "Owusu").validate().is_err());
        assert!(NewPatient::new("Ama", " ").validate().is_err());
        assert!(NewPatient::new("Ama", "Owusu")
            .with_email("not-an-email")
            .validate()
            .is_err());
    }

    #[test]
    fn test_patch_keeps_mrn() {
        let mut patient = Patient {
            id: PatientId::from_sequence(1),
            hospital_id: HospitalId::from_sequence(1),
            first_name: "Ama".to_string(),
            last_name: "Owusu".to_string(),
            email: None,
            phone: Some("555-0100".to_string()),
            mrn: Mrn::from_sequence(1),
            created_at: Utc::now(),
        };

        patient.apply(PatientPatch {
            last_name: Some("Mensah".to_string()),
            phone: Some(None),
            ..Default::default()
        });

        assert_eq!(patient.full_name(), "Ama Mensah");
        assert!(patient.phone.is_none());
        assert_eq!(patient.mrn, Mrn::from_sequence(1));
    }
}
