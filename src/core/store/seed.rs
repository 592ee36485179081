//! Demo data for a freshly started console

use super::entity_store::EntityStore;
use crate::config::secret_string;
use crate::domain::result::Result;
use crate::domain::{NewClinician, NewHospital, NewPatient, NewRole, NewUser, SUPER_ADMIN_ROLE};

/// Populates `store` with two hospitals, a handful of staff roles, users, patients and
/// clinicians
///
/// Runs through the normal create operations, so every integrity rule applies to the demo
/// data too.
pub fn seed_demo_data(store: &mut EntityStore) -> Result<()> {
    for (name, description, permissions) in [
        ("Clinician", "Doctors and specialists", &["patients:read", "patients:write"][..]),
        ("Nurse", "Ward nursing staff", &["patients:read"][..]),
        ("Support Staff", "Front desk and administration", &[][..]),
    ] {
        store.create_role(
            NewRole::new(name, description).with_permissions(permissions.iter().copied()),
        )?;
    }

    store.create_user(NewUser::new(
        "Platform Owner",
        "owner@wardroom.dev",
        SUPER_ADMIN_ROLE,
        None,
    ))?;

    let general = store
        .create_hospital(
            NewHospital::new(
                "City General",
                "admin@citygeneral.org",
                secret_string("changeme".to_string()),
            )
            .with_country("Ghana")
            .with_timezone("Africa/Accra"),
        )?
        .hospital
        .id;
    let lakeside = store
        .create_hospital(
            NewHospital::new(
                "Lakeside Clinic",
                "admin@lakeside.org",
                secret_string("changeme".to_string()),
            )
            .with_country("Kenya")
            .with_timezone("Africa/Nairobi"),
        )?
        .hospital
        .id;

    for (name, email, role, hospital) in [
        ("Esi Mensah", "esi.mensah@citygeneral.org", "Clinician", &general),
        ("Kwame Boateng", "kwame.boateng@citygeneral.org", "Nurse", &general),
        ("Wanjiru Kamau", "wanjiru.kamau@lakeside.org", "Clinician", &lakeside),
    ] {
        store.create_user(NewUser::new(name, email, role, Some(hospital.clone())))?;
    }

    for (first, last, hospital) in [
        ("Ama", "Owusu", &general),
        ("Yaw", "Asante", &general),
        ("Akinyi", "Otieno", &lakeside),
    ] {
        store.create_patient(
            hospital,
            NewPatient::new(first, last)
                .with_email(format!("{}.{}@mail.test", first.to_lowercase(), last.to_lowercase())),
        )?;
    }

    store.create_clinician(
        &general,
        NewClinician::new("Dr. Esi Mensah", ["Cardiology"], "esi.mensah@citygeneral.org")
            .with_role("Clinician"),
    )?;
    store.create_clinician(
        &lakeside,
        NewClinician::new(
            "Dr. Wanjiru Kamau",
            ["Pediatrics", "Neonatology"],
            "wanjiru.kamau@lakeside.org",
        )
        .with_role("Clinician"),
    )?;

    let stats = store.stats();
    tracing::info!(
        hospitals = stats.hospitals,
        users = stats.users,
        patients = stats.patients,
        clinicians = stats.clinicians,
        "Seeded demo data"
    );
    Ok(())
}
