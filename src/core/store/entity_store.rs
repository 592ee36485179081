//! In-memory entity store
//!
//! The [`EntityStore`] owns every collection record. Mutations take `&mut self` and run to
//! completion; integrity rules are checked before anything is written, so a rejected call
//! leaves every collection untouched. Reads hand out clones, never references into the
//! collections.

use super::integrity;
use super::query::ListQuery;
use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use crate::domain::{
    Clinician, ClinicianId, ClinicianPatch, Hospital, HospitalCreated, HospitalId, HospitalPatch,
    HospitalSummary, Mrn, NewClinician, NewHospital, NewPatient, NewRole, NewUser, Patient,
    PatientId, PatientPatch, Role, RoleId, RolePatch, RoleSummary, User, UserId, UserPatch,
    HOSPITAL_ADMIN_ROLE, SUPER_ADMIN_ROLE,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeSet;

/// Per-collection id sequences
///
/// Sequences only move forward, so ids and MRNs are never reused after a delete.
#[derive(Debug, Default, Clone)]
struct Sequences {
    hospital: u64,
    user: u64,
    role: u64,
    patient: u64,
    clinician: u64,
    mrn: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Collection sizes for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Number of hospitals
    pub hospitals: usize,
    /// Number of user accounts
    pub users: usize,
    /// Number of roles
    pub roles: usize,
    /// Number of patients across all hospitals
    pub patients: usize,
    /// Number of clinicians across all hospitals
    pub clinicians: usize,
}

/// Canonical in-memory collections of the simulated backend
#[derive(Debug, Clone)]
pub struct EntityStore {
    hospitals: Vec<Hospital>,
    users: Vec<User>,
    roles: Vec<Role>,
    patients: Vec<Patient>,
    clinicians: Vec<Clinician>,
    seq: Sequences,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Creates a store holding only the two built-in roles (`Super Admin`, `Hospital Admin`)
    pub fn new() -> Self {
        let mut store = Self::empty();
        let builtin = [
            (
                SUPER_ADMIN_ROLE,
                "Full access to every hospital and system setting",
                &["hospitals:manage", "users:manage", "roles:manage", "settings:manage"][..],
            ),
            (
                HOSPITAL_ADMIN_ROLE,
                "Administers a single hospital",
                &["users:manage", "patients:manage", "clinicians:manage"][..],
            ),
        ];
        for (name, description, permissions) in builtin {
            let role = Role {
                id: RoleId::from_sequence(next(&mut store.seq.role)),
                name: name.to_string(),
                description: description.to_string(),
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
                created_at: Utc::now(),
            };
            store.roles.push(role);
        }
        store
    }

    /// Creates a store with no records at all, not even the built-in roles
    pub fn empty() -> Self {
        Self {
            hospitals: Vec::new(),
            users: Vec::new(),
            roles: Vec::new(),
            patients: Vec::new(),
            clinicians: Vec::new(),
            seq: Sequences::default(),
        }
    }

    // ---------------------------------------------------------------------------------
    // Hospitals
    // ---------------------------------------------------------------------------------

    /// Creates a hospital together with its `Hospital Admin` account
    ///
    /// Both records are written or neither: name, admin credentials, the admin role and
    /// the admin email's uniqueness are all checked first.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if a required field is missing, the admin email is taken, or the
    /// `Hospital Admin` role does not exist.
    pub fn create_hospital(&mut self, input: NewHospital) -> Result<HospitalCreated> {
        input.validate()?;

        let admin_role = integrity::ensure_role_exists(&self.roles, HOSPITAL_ADMIN_ROLE)?
            .name
            .clone();
        let admin_email = input
            .admin_email
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        integrity::ensure_unique_email(&self.users, &admin_email, None)?;

        let name = input.name.trim().to_string();
        let hospital = Hospital {
            id: HospitalId::from_sequence(next(&mut self.seq.hospital)),
            name: name.clone(),
            country: input.country.clone(),
            timezone: input
                .timezone
                .clone()
                .filter(|tz| !tz.trim().is_empty())
                .unwrap_or_else(|| crate::domain::hospital::DEFAULT_TIMEZONE.to_string()),
            created_at: Utc::now(),
        };
        let admin = User {
            id: UserId::from_sequence(next(&mut self.seq.user)),
            name: input
                .admin_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("{name} Admin")),
            email: admin_email,
            role: admin_role,
            hospital_id: Some(hospital.id.clone()),
            last_active: crate::domain::user::NEVER_ACTIVE.to_string(),
        };

        self.hospitals.push(hospital.clone());
        self.users.push(admin.clone());

        tracing::info!(
            hospital_id = %hospital.id,
            admin_user_id = %admin.id,
            "Created hospital with admin account"
        );

        Ok(HospitalCreated { hospital, admin })
    }

    /// Merges `patch` into an existing hospital
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `ValidationFailed` for blank replacement values.
    pub fn update_hospital(&mut self, id: &HospitalId, patch: HospitalPatch) -> Result<Hospital> {
        patch.validate()?;
        let hospital = self
            .hospitals
            .iter_mut()
            .find(|h| &h.id == id)
            .ok_or_else(|| WardroomError::not_found("hospital", id))?;
        hospital.apply(patch);
        tracing::debug!(hospital_id = %id, "Updated hospital");
        Ok(hospital.clone())
    }

    /// Removes a hospital
    ///
    /// Users, patients and clinicians referencing the hospital are left in place; their
    /// count is logged so the orphans are visible.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub fn delete_hospital(&mut self, id: &HospitalId) -> Result<Hospital> {
        let index = self
            .hospitals
            .iter()
            .position(|h| &h.id == id)
            .ok_or_else(|| WardroomError::not_found("hospital", id))?;
        let removed = self.hospitals.remove(index);

        let orphaned_users = integrity::users_in_hospital(&self.users, id);
        if orphaned_users > 0 {
            tracing::warn!(
                hospital_id = %id,
                orphaned_users,
                "Deleted hospital still referenced by users; no cascade is applied"
            );
        }
        tracing::info!(hospital_id = %id, "Deleted hospital");
        Ok(removed)
    }

    /// Looks up a hospital by id
    pub fn get_hospital(&self, id: &HospitalId) -> Result<Hospital> {
        self.find_hospital(id).cloned()
    }

    /// Lists hospitals with their derived admin counts
    pub fn list_hospitals(&self, query: &ListQuery) -> Result<Vec<HospitalSummary>> {
        query.validate()?;
        Ok(query
            .apply(&self.hospitals)
            .into_iter()
            .map(|hospital| HospitalSummary {
                admin_count: integrity::admin_count(&self.users, &hospital.id),
                hospital,
            })
            .collect())
    }

    /// Number of `Hospital Admin` users attached to a hospital, recomputed on every call
    pub fn admin_count(&self, id: &HospitalId) -> Result<usize> {
        self.find_hospital(id)?;
        Ok(integrity::admin_count(&self.users, id))
    }

    // ---------------------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------------------

    /// Creates a user account
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if a field is missing, the role is unknown, the email is taken,
    /// or the hospital requirement for the role is not met.
    pub fn create_user(&mut self, input: NewUser) -> Result<User> {
        input.validate()?;
        let role = integrity::ensure_role_exists(&self.roles, &input.role)?
            .name
            .clone();
        integrity::ensure_hospital_requirement(&role, input.hospital_id.as_ref(), &self.hospitals)?;
        integrity::ensure_unique_email(&self.users, &input.email, None)?;

        let user = User {
            id: UserId::from_sequence(next(&mut self.seq.user)),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            role,
            hospital_id: input.hospital_id,
            last_active: input
                .last_active
                .unwrap_or_else(|| crate::domain::user::NEVER_ACTIVE.to_string()),
        };
        self.users.push(user.clone());

        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    /// Merges `patch` into an existing user, re-checking every user rule on the result
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `ValidationFailed` as for [`Self::create_user`].
    pub fn update_user(&mut self, id: &UserId, patch: UserPatch) -> Result<User> {
        patch.validate()?;
        let index = self.user_index(id)?;

        let mut candidate = self.users[index].clone();
        candidate.apply(patch);
        candidate.role = integrity::ensure_role_exists(&self.roles, &candidate.role)?
            .name
            .clone();
        integrity::ensure_hospital_requirement(
            &candidate.role,
            candidate.hospital_id.as_ref(),
            &self.hospitals,
        )?;
        integrity::ensure_unique_email(&self.users, &candidate.email, Some(id))?;

        self.users[index] = candidate.clone();
        tracing::debug!(user_id = %id, "Updated user");
        Ok(candidate)
    }

    /// Removes a user account
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub fn delete_user(&mut self, id: &UserId) -> Result<User> {
        let index = self.user_index(id)?;
        let removed = self.users.remove(index);
        tracing::info!(user_id = %id, "Deleted user");
        Ok(removed)
    }

    /// Looks up a user by id
    pub fn get_user(&self, id: &UserId) -> Result<User> {
        let index = self.user_index(id)?;
        Ok(self.users[index].clone())
    }

    /// Lists user accounts
    pub fn list_users(&self, query: &ListQuery) -> Result<Vec<User>> {
        query.validate()?;
        Ok(query.apply(&self.users))
    }

    /// Lists the user accounts attached to one hospital
    pub fn list_hospital_users(
        &self,
        hospital_id: &HospitalId,
        query: &ListQuery,
    ) -> Result<Vec<User>> {
        query.validate()?;
        self.find_hospital(hospital_id)?;
        Ok(query.apply(
            self.users
                .iter()
                .filter(|u| u.hospital_id.as_ref() == Some(hospital_id)),
        ))
    }

    // ---------------------------------------------------------------------------------
    // Roles
    // ---------------------------------------------------------------------------------

    /// Creates a role
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if the name is blank or already used.
    pub fn create_role(&mut self, input: NewRole) -> Result<Role> {
        input.validate()?;
        integrity::ensure_unique_role_name(&self.roles, &input.name, None)?;

        let role = Role {
            id: RoleId::from_sequence(next(&mut self.seq.role)),
            name: input.name.trim().to_string(),
            description: input.description,
            permissions: input.permissions,
            created_at: Utc::now(),
        };
        self.roles.push(role.clone());

        tracing::info!(role_id = %role.id, role = %role.name, "Created role");
        Ok(role)
    }

    /// Merges `patch` into an existing role
    ///
    /// Renaming a role moves every user and clinician holding the old name to the new one.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `ValidationFailed` if the new name is blank or
    /// belongs to another role; `PreconditionFailed` when renaming a built-in role.
    pub fn update_role(&mut self, id: &RoleId, patch: RolePatch) -> Result<Role> {
        patch.validate()?;
        let index = self.role_index(id)?;
        if let Some(name) = &patch.name {
            if name.trim() != self.roles[index].name {
                integrity::ensure_not_builtin(&self.roles[index], "renamed")?;
            }
            integrity::ensure_unique_role_name(&self.roles, name, Some(id))?;
        }

        let old_name = self.roles[index].name.clone();
        self.roles[index].apply(patch);
        let role = self.roles[index].clone();

        if role.name != old_name {
            let mut users_moved = 0usize;
            for user in self.users.iter_mut().filter(|u| u.role.eq_ignore_ascii_case(&old_name)) {
                user.role = role.name.clone();
                users_moved += 1;
            }
            let mut clinicians_moved = 0usize;
            for clinician in self.clinicians.iter_mut() {
                if clinician
                    .role
                    .as_deref()
                    .is_some_and(|r| r.eq_ignore_ascii_case(&old_name))
                {
                    clinician.role = Some(role.name.clone());
                    clinicians_moved += 1;
                }
            }
            tracing::info!(
                role_id = %id,
                from = %old_name,
                to = %role.name,
                users_moved,
                clinicians_moved,
                "Renamed role"
            );
        }

        Ok(role)
    }

    /// Removes a role that no user holds
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `PreconditionFailed` for a built-in role or while
    /// any user holds it.
    pub fn delete_role(&mut self, id: &RoleId) -> Result<Role> {
        let index = self.role_index(id)?;
        integrity::ensure_not_builtin(&self.roles[index], "deleted")?;
        integrity::ensure_role_deletable(&self.roles[index], &self.users)?;
        let removed = self.roles.remove(index);
        tracing::info!(role_id = %id, role = %removed.name, "Deleted role");
        Ok(removed)
    }

    /// Looks up a role by id
    pub fn get_role(&self, id: &RoleId) -> Result<Role> {
        let index = self.role_index(id)?;
        Ok(self.roles[index].clone())
    }

    /// Lists roles with their derived user counts
    pub fn list_roles(&self, query: &ListQuery) -> Result<Vec<RoleSummary>> {
        query.validate()?;
        Ok(query
            .apply(&self.roles)
            .into_iter()
            .map(|role| RoleSummary {
                user_count: integrity::role_usage(&self.users, &role.name),
                role,
            })
            .collect())
    }

    /// Number of users holding a role, recomputed on every call
    pub fn role_usage(&self, id: &RoleId) -> Result<usize> {
        let index = self.role_index(id)?;
        Ok(integrity::role_usage(&self.users, &self.roles[index].name))
    }

    /// Names of every role, sorted
    pub fn role_names(&self) -> BTreeSet<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }

    // ---------------------------------------------------------------------------------
    // Patients
    // ---------------------------------------------------------------------------------

    /// Registers a patient at a hospital and assigns the next MRN
    ///
    /// # Errors
    ///
    /// `NotFound` if the hospital is unknown; `ValidationFailed` for missing names.
    pub fn create_patient(
        &mut self,
        hospital_id: &HospitalId,
        input: NewPatient,
    ) -> Result<Patient> {
        input.validate()?;
        self.find_hospital(hospital_id)?;

        let patient = Patient {
            id: PatientId::from_sequence(next(&mut self.seq.patient)),
            hospital_id: hospital_id.clone(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            mrn: Mrn::from_sequence(next(&mut self.seq.mrn)),
            created_at: Utc::now(),
        };
        self.patients.push(patient.clone());

        tracing::info!(
            hospital_id = %hospital_id,
            patient_id = %patient.id,
            mrn = %patient.mrn,
            "Registered patient"
        );
        Ok(patient)
    }

    /// Merges `patch` into a patient of the given hospital; the MRN never changes
    ///
    /// # Errors
    ///
    /// `NotFound` if the patient is unknown or registered elsewhere.
    pub fn update_patient(
        &mut self,
        hospital_id: &HospitalId,
        id: &PatientId,
        patch: PatientPatch,
    ) -> Result<Patient> {
        patch.validate()?;
        let patient = self
            .patients
            .iter_mut()
            .find(|p| &p.id == id && &p.hospital_id == hospital_id)
            .ok_or_else(|| WardroomError::not_found("patient", id))?;
        patient.apply(patch);
        tracing::debug!(patient_id = %id, "Updated patient");
        Ok(patient.clone())
    }

    /// Looks up a patient of the given hospital
    pub fn get_patient(&self, hospital_id: &HospitalId, id: &PatientId) -> Result<Patient> {
        self.patients
            .iter()
            .find(|p| &p.id == id && &p.hospital_id == hospital_id)
            .cloned()
            .ok_or_else(|| WardroomError::not_found("patient", id))
    }

    /// Lists the patients of a hospital
    pub fn list_patients(
        &self,
        hospital_id: &HospitalId,
        query: &ListQuery,
    ) -> Result<Vec<Patient>> {
        query.validate()?;
        self.find_hospital(hospital_id)?;
        Ok(query.apply(self.patients.iter().filter(|p| &p.hospital_id == hospital_id)))
    }

    // ---------------------------------------------------------------------------------
    // Clinicians
    // ---------------------------------------------------------------------------------

    /// Adds a clinician to a hospital
    ///
    /// # Errors
    ///
    /// `NotFound` if the hospital is unknown; `ValidationFailed` for missing fields or an
    /// unknown role.
    pub fn create_clinician(
        &mut self,
        hospital_id: &HospitalId,
        input: NewClinician,
    ) -> Result<Clinician> {
        input.validate()?;
        self.find_hospital(hospital_id)?;
        let role = self.canonical_optional_role(input.role.as_deref())?;

        let clinician = Clinician {
            id: ClinicianId::from_sequence(next(&mut self.seq.clinician)),
            hospital_id: hospital_id.clone(),
            name: input.name.trim().to_string(),
            specialties: clean_specialties(input.specialties),
            email: input.email.trim().to_string(),
            phone: input.phone,
            role,
            created_at: Utc::now(),
            profile: input.profile,
        };
        self.clinicians.push(clinician.clone());

        tracing::info!(
            hospital_id = %hospital_id,
            clinician_id = %clinician.id,
            "Added clinician"
        );
        Ok(clinician)
    }

    /// Merges `patch` into a clinician of the given hospital
    ///
    /// # Errors
    ///
    /// `NotFound` if the clinician is unknown or works elsewhere; `ValidationFailed` for
    /// blank values or an unknown role.
    pub fn update_clinician(
        &mut self,
        hospital_id: &HospitalId,
        id: &ClinicianId,
        mut patch: ClinicianPatch,
    ) -> Result<Clinician> {
        patch.validate()?;
        let index = self.clinician_index(hospital_id, id)?;
        if let Some(role) = patch.role.take() {
            patch.role = Some(self.canonical_optional_role(role.as_deref())?);
        }
        if let Some(specialties) = patch.specialties.take() {
            patch.specialties = Some(clean_specialties(specialties));
        }

        self.clinicians[index].apply(patch);
        tracing::debug!(clinician_id = %id, "Updated clinician");
        Ok(self.clinicians[index].clone())
    }

    /// Removes a clinician from a hospital
    ///
    /// # Errors
    ///
    /// `NotFound` if the clinician is unknown or works elsewhere.
    pub fn delete_clinician(
        &mut self,
        hospital_id: &HospitalId,
        id: &ClinicianId,
    ) -> Result<Clinician> {
        let index = self.clinician_index(hospital_id, id)?;
        let removed = self.clinicians.remove(index);
        tracing::info!(clinician_id = %id, "Removed clinician");
        Ok(removed)
    }

    /// Looks up a clinician of the given hospital
    pub fn get_clinician(&self, hospital_id: &HospitalId, id: &ClinicianId) -> Result<Clinician> {
        let index = self.clinician_index(hospital_id, id)?;
        Ok(self.clinicians[index].clone())
    }

    /// Lists the clinicians of a hospital
    pub fn list_clinicians(
        &self,
        hospital_id: &HospitalId,
        query: &ListQuery,
    ) -> Result<Vec<Clinician>> {
        query.validate()?;
        self.find_hospital(hospital_id)?;
        Ok(query.apply(self.clinicians.iter().filter(|c| &c.hospital_id == hospital_id)))
    }

    // ---------------------------------------------------------------------------------
    // Dashboard
    // ---------------------------------------------------------------------------------

    /// Collection sizes
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            hospitals: self.hospitals.len(),
            users: self.users.len(),
            roles: self.roles.len(),
            patients: self.patients.len(),
            clinicians: self.clinicians.len(),
        }
    }

    // ---------------------------------------------------------------------------------
    // Lookup helpers
    // ---------------------------------------------------------------------------------

    fn find_hospital(&self, id: &HospitalId) -> Result<&Hospital> {
        self.hospitals
            .iter()
            .find(|h| &h.id == id)
            .ok_or_else(|| WardroomError::not_found("hospital", id))
    }

    fn user_index(&self, id: &UserId) -> Result<usize> {
        self.users
            .iter()
            .position(|u| &u.id == id)
            .ok_or_else(|| WardroomError::not_found("user", id))
    }

    fn role_index(&self, id: &RoleId) -> Result<usize> {
        self.roles
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| WardroomError::not_found("role", id))
    }

    fn clinician_index(&self, hospital_id: &HospitalId, id: &ClinicianId) -> Result<usize> {
        self.clinicians
            .iter()
            .position(|c| &c.id == id && &c.hospital_id == hospital_id)
            .ok_or_else(|| WardroomError::not_found("clinician", id))
    }

    fn canonical_optional_role(&self, role: Option<&str>) -> Result<Option<String>> {
        match role.map(str::trim).filter(|r| !r.is_empty()) {
            Some(name) => Ok(Some(
                integrity::ensure_role_exists(&self.roles, name)?.name.clone(),
            )),
            None => Ok(None),
        }
    }
}

fn clean_specialties(specialties: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(specialties.len());
    for specialty in specialties {
        let specialty = specialty.trim();
        if !specialty.is_empty() && !cleaned.iter().any(|s| s.eq_ignore_ascii_case(specialty)) {
            cleaned.push(specialty.to_string());
        }
    }
    cleaned
}
