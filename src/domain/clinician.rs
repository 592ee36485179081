//! Clinician domain model

use super::errors::WardroomError;
use super::ids::{ClinicianId, HospitalId};
use super::patch::{double_option, non_blank, one_or_many, option_one_or_many};
use super::result::Result;
use super::user::validate_email;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Marital status recorded on a clinician profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    /// Single
    Single,
    /// Married
    Married,
    /// Divorced
    Divorced,
    /// Widowed
    Widowed,
}

/// Free-form clinician profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicianProfile {
    /// Degrees and certifications
    #[serde(default)]
    pub qualifications: Vec<String>,

    /// Postal address
    #[serde(default)]
    pub address: Option<String>,

    /// Date the clinician joined the hospital
    #[serde(default, alias = "joinDate")]
    pub join_date: Option<NaiveDate>,

    /// Marital status
    #[serde(default, alias = "maritalStatus")]
    pub marital_status: Option<MaritalStatus>,
}

/// A clinician working at a hospital
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clinician {
    /// Unique identifier
    pub id: ClinicianId,

    /// Hospital the clinician works at
    pub hospital_id: HospitalId,

    /// Display name
    pub name: String,

    /// One or more specialties
    pub specialties: Vec<String>,

    /// Contact email
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Optional role name; references `Role::name`
    pub role: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Free-form profile
    #[serde(flatten)]
    pub profile: ClinicianProfile,
}

impl Clinician {
    /// Merges the supplied patch fields, leaving omitted fields untouched
    pub fn apply(&mut self, patch: ClinicianPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(specialties) = patch.specialties {
            self.specialties = specialties;
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(qualifications) = patch.qualifications {
            self.profile.qualifications = qualifications;
        }
        if let Some(address) = patch.address {
            self.profile.address = address;
        }
        if let Some(join_date) = patch.join_date {
            self.profile.join_date = join_date;
        }
        if let Some(marital_status) = patch.marital_status {
            self.profile.marital_status = marital_status;
        }
    }
}

/// Clinician creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewClinician {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// One or more specialties; a bare string is accepted
    #[serde(default, alias = "specialty", deserialize_with = "one_or_many")]
    pub specialties: Vec<String>,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Contact phone
    #[serde(default)]
    pub phone: String,

    /// Optional role name
    #[serde(default)]
    pub role: Option<String>,

    /// Free-form profile
    #[serde(flatten)]
    pub profile: ClinicianProfile,
}

impl NewClinician {
    /// Creates a request with name, specialties and contact details
    pub fn new<I, S>(name: impl Into<String>, specialties: I, email: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            specialties: specialties.into_iter().map(Into::into).collect(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Sets the role name
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Checks fields that do not depend on other collections
    pub fn validate(&self) -> Result<()> {
        if non_blank(&self.name).is_none() {
            return Err(WardroomError::validation("clinician name is required"));
        }
        validate_specialties(&self.specialties)?;
        validate_email(&self.email)
    }
}

/// Partial clinician update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicianPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,

    /// Replacement specialties
    #[serde(
        default,
        alias = "specialty",
        deserialize_with = "option_one_or_many"
    )]
    pub specialties: Option<Vec<String>>,

    /// New email
    #[serde(default)]
    pub email: Option<String>,

    /// New phone
    #[serde(default)]
    pub phone: Option<String>,

    /// New role (`null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub role: Option<Option<String>>,

    /// Replacement qualifications
    #[serde(default)]
    pub qualifications: Option<Vec<String>>,

    /// New address (`null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,

    /// New join date (`null` clears it)
    #[serde(default, alias = "joinDate", deserialize_with = "double_option")]
    pub join_date: Option<Option<NaiveDate>>,

    /// New marital status (`null` clears it)
    #[serde(default, alias = "maritalStatus", deserialize_with = "double_option")]
    pub marital_status: Option<Option<MaritalStatus>>,
}

impl ClinicianPatch {
    /// Rejects blank names, empty specialty lists and malformed emails
    pub fn validate(&self) -> Result<()> {
        if matches!(self.name.as_deref(), Some(n) if non_blank(n).is_none()) {
            return Err(WardroomError::validation("clinician name cannot be blank"));
        }
        if let Some(specialties) = &self.specialties {
            validate_specialties(specialties)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

fn validate_specialties(specialties: &[String]) -> Result<()> {
    if specialties.iter().all(|s| non_blank(s).is_none()) {
        return Err(WardroomError::validation(
            "clinician needs at least one specialty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clinician_accepts_single_specialty() {
        let input: NewClinician = serde_json::from_value(serde_json::json!({
            "name": "Dr. Kofi Boateng",
            "specialty": "Cardiology",
            "email": "kofi@x.com",
            "phone": "555-0101",
            "joinDate": "2021-03-01",
            "marital_status": "married"
        }))
        .unwrap();

        assert_eq!(input.specialties, vec!["Cardiology"]);
        assert_eq!(
            input.profile.join_date,
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(input.profile.marital_status, Some(MaritalStatus::Married));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_clinician_requires_specialty() {
        let input = NewClinician::new("Dr. Who", Vec::<String>::new(), "who@x.com");
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_apply_patch_updates_profile() {
        let mut clinician = Clinician {
            id: ClinicianId::from_sequence(1),
            hospital_id: HospitalId::from_sequence(1),
            name: "Dr. Kofi Boateng".to_string(),
            specialties: vec!["Cardiology".to_string()],
            email: "kofi@x.com".to_string(),
            phone: "555-0101".to_string(),
            role: Some("Clinician".to_string()),
            created_at: Utc::now(),
            profile: ClinicianProfile::default(),
        };

        clinician.apply(ClinicianPatch {
            specialties: Some(vec!["Cardiology".to_string(), "Oncology".to_string()]),
            role: Some(None),
            address: Some(Some("12 Ring Road".to_string())),
            ..Default::default()
        });

        assert_eq!(clinician.specialties.len(), 2);
        assert!(clinician.role.is_none());
        assert_eq!(clinician.profile.address.as_deref(), Some("12 Ring Road"));
    }
}
