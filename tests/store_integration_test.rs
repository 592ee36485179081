//! Integration tests for the entity store and its integrity rules

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use wardroom::config::secret_string;
use wardroom::core::store::{seed_demo_data, EntityStore, ListQuery};
use wardroom::domain::{
    HospitalPatch, NewHospital, NewPatient, NewRole, NewUser, RolePatch, UserPatch, WardroomError,
    HOSPITAL_ADMIN_ROLE, SUPER_ADMIN_ROLE,
};

fn hospital(name: &str, admin_email: &str) -> NewHospital {
    NewHospital::new(name, admin_email, secret_string("pw".to_string()))
}

#[test]
fn test_create_hospital_adds_hospital_and_admin() {
    let mut store = EntityStore::new();
    let hospitals_before = store.list_hospitals(&ListQuery::all()).unwrap().len();
    let users_before = store.list_users(&ListQuery::all()).unwrap().len();

    let created = store.create_hospital(hospital("City General", "a@x.com")).unwrap();

    let hospitals = store.list_hospitals(&ListQuery::all()).unwrap();
    let users = store.list_users(&ListQuery::all()).unwrap();
    assert_eq!(hospitals.len(), hospitals_before + 1);
    assert_eq!(users.len(), users_before + 1);

    let admin = users.iter().find(|u| u.email == "a@x.com").unwrap();
    assert_eq!(admin.role, HOSPITAL_ADMIN_ROLE);
    assert_eq!(admin.hospital_id.as_ref(), Some(&created.hospital.id));
    assert_eq!(store.admin_count(&created.hospital.id).unwrap(), 1);
}

#[test]
fn test_failed_hospital_validation_writes_nothing() {
    let mut store = EntityStore::new();
    let before = store.stats();

    let err = store.create_hospital(hospital("   ", "a@x.com")).unwrap_err();
    assert!(matches!(err, WardroomError::ValidationFailed(_)));

    let err = store.create_hospital(hospital("City General", "not-an-email")).unwrap_err();
    assert!(matches!(err, WardroomError::ValidationFailed(_)));

    assert_eq!(store.stats(), before);
}

#[test]
fn test_unused_role_can_be_deleted() {
    let mut store = EntityStore::new();
    let role = store
        .create_role(NewRole::new("Support Staff", "Front desk"))
        .unwrap();
    let before = store.list_roles(&ListQuery::all()).unwrap().len();

    store.delete_role(&role.id).unwrap();

    assert_eq!(store.list_roles(&ListQuery::all()).unwrap().len(), before - 1);
    assert!(matches!(
        store.get_role(&role.id),
        Err(WardroomError::NotFound { .. })
    ));
}

#[test]
fn test_role_in_use_cannot_be_deleted() {
    let mut store = EntityStore::new();
    let hospital = store
        .create_hospital(hospital("City General", "a@x.com"))
        .unwrap()
        .hospital;
    let role = store
        .create_role(NewRole::new("Clinician", "Doctors"))
        .unwrap();

    for i in 0..3 {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        store
            .create_user(NewUser::new(
                name,
                format!("{i}.{email}"),
                "Clinician",
                Some(hospital.id.clone()),
            ))
            .unwrap();
    }
    assert_eq!(store.role_usage(&role.id).unwrap(), 3);

    let before = store.list_roles(&ListQuery::all()).unwrap();
    let err = store.delete_role(&role.id).unwrap_err();
    assert!(matches!(err, WardroomError::PreconditionFailed(_)));
    assert_eq!(store.list_roles(&ListQuery::all()).unwrap(), before);
}

#[test]
fn test_super_admin_role_cannot_be_renamed() {
    let mut store = EntityStore::new();
    seed_demo_data(&mut store).unwrap();
    let owner = store
        .list_users(&ListQuery::all().search("owner@wardroom.dev"))
        .unwrap()
        .remove(0);
    assert_eq!(owner.role, SUPER_ADMIN_ROLE);
    assert!(owner.hospital_id.is_none());
    let super_admin = store
        .list_roles(&ListQuery::all().search(SUPER_ADMIN_ROLE))
        .unwrap()
        .remove(0)
        .role;

    let err = store
        .update_role(
            &super_admin.id,
            RolePatch {
                name: Some("Root".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, WardroomError::PreconditionFailed(_)));

    // The owner keeps the hospital exemption and can still be edited
    let renamed = store
        .update_user(
            &owner.id,
            UserPatch {
                name: Some("Platform Owner".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.role, SUPER_ADMIN_ROLE);
}

#[test]
fn test_hospital_admin_role_cannot_be_deleted_while_unused() {
    let mut store = EntityStore::new();
    let hospital_admin = store
        .list_roles(&ListQuery::all().search(HOSPITAL_ADMIN_ROLE))
        .unwrap()
        .remove(0)
        .role;
    assert_eq!(store.role_usage(&hospital_admin.id).unwrap(), 0);

    let err = store.delete_role(&hospital_admin.id).unwrap_err();
    assert!(matches!(err, WardroomError::PreconditionFailed(_)));

    let created = store.create_hospital(hospital("City General", "a@x.com")).unwrap();
    assert_eq!(created.admin.role, HOSPITAL_ADMIN_ROLE);
}

#[test]
fn test_non_super_admin_needs_hospital() {
    let mut store = EntityStore::new();
    store.create_role(NewRole::new("Nurse", "Ward staff")).unwrap();

    let err = store
        .create_user(NewUser::new("Abena", "abena@example.com", "Nurse", None))
        .unwrap_err();
    assert!(matches!(err, WardroomError::ValidationFailed(_)));

    let owner = store
        .create_user(NewUser::new("Owner", "owner@example.com", "super admin", None))
        .unwrap();
    assert_eq!(owner.role, "Super Admin");

    // Demoting the owner without giving them a hospital must fail
    let err = store
        .update_user(
            &owner.id,
            UserPatch {
                role: Some("Nurse".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, WardroomError::ValidationFailed(_)));
    assert_eq!(store.get_user(&owner.id).unwrap().role, "Super Admin");
}

#[test]
fn test_role_rename_cascades_to_users() {
    let mut store = EntityStore::new();
    seed_demo_data(&mut store).unwrap();
    let nurse = store
        .list_roles(&ListQuery::all().search("nurse"))
        .unwrap()
        .remove(0)
        .role;

    store
        .update_role(
            &nurse.id,
            RolePatch {
                name: Some("Registered Nurse".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let users = store.list_users(&ListQuery::all()).unwrap();
    assert!(users.iter().all(|u| u.role != "Nurse"));
    assert_eq!(
        users.iter().filter(|u| u.role == "Registered Nurse").count(),
        1
    );
}

#[test]
fn test_mrns_are_unique_and_increasing() {
    let mut store = EntityStore::new();
    let a = store.create_hospital(hospital("A", "a@a.com")).unwrap().hospital.id;
    let b = store.create_hospital(hospital("B", "b@b.com")).unwrap().hospital.id;

    let mut mrns = Vec::new();
    for i in 0..6 {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let target = if i % 2 == 0 { &a } else { &b };
        let patient = store
            .create_patient(target, NewPatient::new(first, last))
            .unwrap();
        mrns.push(patient.mrn.as_str().to_string());
    }

    let mut sorted = mrns.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, mrns);
    assert_eq!(mrns[0], "MRN-000001");
}

#[test]
fn test_hospital_delete_leaves_users_in_place() {
    let mut store = EntityStore::new();
    let created = store.create_hospital(hospital("City General", "a@x.com")).unwrap();

    store.delete_hospital(&created.hospital.id).unwrap();

    assert!(store.get_user(&created.admin.id).is_ok());
    assert!(matches!(
        store.update_hospital(&created.hospital.id, HospitalPatch::default()),
        Err(WardroomError::NotFound { .. })
    ));
}

#[test]
fn test_search_and_pagination() {
    let mut store = EntityStore::new();
    seed_demo_data(&mut store).unwrap();

    let city = store
        .list_hospitals(&ListQuery::all().search("CITY"))
        .unwrap();
    assert_eq!(city.len(), 1);
    assert_eq!(city[0].hospital.name, "City General");

    let page = store
        .list_users(&ListQuery::all().paginate(2, 2))
        .unwrap();
    assert_eq!(page.len(), 2);
    let all = store.list_users(&ListQuery::all()).unwrap();
    assert_eq!(page[0], all[2]);
}
