//! Asynchronous facade over the entity store
//!
//! Every call is issued as its own tokio task the moment it is made: the task waits out the
//! artificial latency, locks the store, runs one synchronous operation to completion and
//! pushes any derived notification. The lock is never held across an `.await`, so no caller
//! can observe a half-applied mutation.
//!
//! Calls cannot be cancelled. Dropping the returned [`PendingCall`] detaches the task; the
//! operation still runs. Overlapping mutations of the same record apply in completion order.

use super::events;
use super::latency::Latency;
use crate::config::ApiConfig;
use crate::core::reactive::NotificationStore;
use crate::core::router::{ApiRequest, Router};
use crate::core::store::{seed_demo_data, DashboardStats, EntityStore, ListQuery};
use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use crate::domain::{
    Clinician, ClinicianId, ClinicianPatch, Hospital, HospitalCreated, HospitalId, HospitalPatch,
    HospitalSummary, NewClinician, NewHospital, NewPatient, NewRole, NewUser, NotificationEvent,
    Patient, PatientId, PatientPatch, Role, RoleId, RolePatch, RoleSummary, User, UserId,
    UserPatch,
};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Request-level surface of the backend
///
/// `MockApi` implements it in-process; an HTTP client for a real backend would implement the
/// same trait.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Sends one HTTP-shaped request and returns its JSON response
    ///
    /// Unrouted requests answer with an empty object.
    async fn request(&self, request: ApiRequest) -> Result<Value>;
}

/// A call in flight
///
/// Resolves to the operation's result. Dropping it does not stop the operation.
#[must_use = "the call runs regardless; await it to observe the result"]
pub struct PendingCall<T> {
    operation: &'static str,
    handle: JoinHandle<Result<T>>,
}

impl<T> PendingCall<T> {
    /// Name of the operation being run
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl<T> Future for PendingCall<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let operation = self.operation;
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(WardroomError::State(format!(
                "{operation} task did not complete: {e}"
            ))),
        })
    }
}

/// In-process stand-in for the console's REST backend
#[derive(Clone)]
pub struct MockApi {
    store: Arc<Mutex<EntityStore>>,
    router: Arc<Router>,
    latency: Latency,
    notifications: Option<Arc<NotificationStore>>,
}

impl MockApi {
    /// Wraps `store` with the default router and latency and no notification feed
    pub fn new(store: EntityStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            router: Arc::new(Router::default()),
            latency: Latency::default(),
            notifications: None,
        }
    }

    /// Builds a store (seeded if configured), router and latency from `[api]` settings
    ///
    /// # Errors
    ///
    /// Returns an error if the demo data cannot be seeded.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut store = EntityStore::new();
        if config.seed_demo_data {
            seed_demo_data(&mut store)?;
        }
        Ok(Self::new(store)
            .with_router(Router::new(&config.base_path))
            .with_latency(Latency::from_config(config)))
    }

    /// Replaces the latency model
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the route table
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = Arc::new(router);
        self
    }

    /// Attaches the feed that derived notifications are pushed into
    pub fn with_notifications(mut self, notifications: Arc<NotificationStore>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Route table in use
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Latency model in use
    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Reads the store immediately, without latency
    ///
    /// # Errors
    ///
    /// `State` if a previous operation panicked while holding the store.
    pub fn inspect<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> Result<R> {
        let store = self.store.lock().map_err(|_| poisoned())?;
        Ok(f(&store))
    }

    /// Spawns one mutation; the closure returns the result and an optional derived event
    fn mutate<T, F>(&self, operation: &'static str, f: F) -> PendingCall<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut EntityStore) -> Result<(T, Option<NotificationEvent>)> + Send + 'static,
    {
        let delay = self.latency.sample();
        let store = Arc::clone(&self.store);
        let notifications = self.notifications.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match run_locked(&store, f) {
                Ok((value, event)) => {
                    tracing::debug!(
                        operation,
                        latency_ms = delay.as_millis() as u64,
                        "Simulated call completed"
                    );
                    if let (Some(feed), Some(event)) = (notifications, event) {
                        record_notification(operation, feed, event).await;
                    }
                    Ok(value)
                }
                Err(e) => {
                    tracing::info!(
                        operation,
                        status = e.status_code(),
                        error = %e,
                        "Simulated call rejected"
                    );
                    Err(e)
                }
            }
        });

        PendingCall { operation, handle }
    }

    /// Spawns one read
    fn query<T, F>(&self, operation: &'static str, f: F) -> PendingCall<T>
    where
        T: Send + 'static,
        F: FnOnce(&EntityStore) -> Result<T> + Send + 'static,
    {
        self.mutate(operation, move |store| f(store).map(|value| (value, None)))
    }

    /// Routes an HTTP-shaped request through the table
    pub fn send(&self, request: ApiRequest) -> PendingCall<Value> {
        let router = Arc::clone(&self.router);
        self.mutate("request", move |store| {
            router
                .dispatch(store, &request)
                .map(|outcome| outcome.into_parts())
        })
    }

    // ---------------------------------------------------------------------------------
    // Hospitals
    // ---------------------------------------------------------------------------------

    /// See [`EntityStore::create_hospital`]
    pub fn create_hospital(&self, input: NewHospital) -> PendingCall<HospitalCreated> {
        self.mutate("create_hospital", move |store| {
            let created = store.create_hospital(input)?;
            let event = events::hospital_created(&created.hospital, &created.admin);
            Ok((created, Some(event)))
        })
    }

    /// See [`EntityStore::update_hospital`]
    pub fn update_hospital(&self, id: HospitalId, patch: HospitalPatch) -> PendingCall<Hospital> {
        self.mutate("update_hospital", move |store| {
            let hospital = store.update_hospital(&id, patch)?;
            let event = events::hospital_updated(&hospital);
            Ok((hospital, Some(event)))
        })
    }

    /// See [`EntityStore::delete_hospital`]
    pub fn delete_hospital(&self, id: HospitalId) -> PendingCall<Hospital> {
        self.mutate("delete_hospital", move |store| {
            let hospital = store.delete_hospital(&id)?;
            let event = events::hospital_deleted(&hospital);
            Ok((hospital, Some(event)))
        })
    }

    /// See [`EntityStore::get_hospital`]
    pub fn get_hospital(&self, id: HospitalId) -> PendingCall<Hospital> {
        self.query("get_hospital", move |store| store.get_hospital(&id))
    }

    /// See [`EntityStore::list_hospitals`]
    pub fn list_hospitals(&self, query: ListQuery) -> PendingCall<Vec<HospitalSummary>> {
        self.query("list_hospitals", move |store| store.list_hospitals(&query))
    }

    // ---------------------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------------------

    /// See [`EntityStore::create_user`]
    pub fn create_user(&self, input: NewUser) -> PendingCall<User> {
        self.mutate("create_user", move |store| {
            let user = store.create_user(input)?;
            let event = events::user_created(&user);
            Ok((user, Some(event)))
        })
    }

    /// See [`EntityStore::update_user`]
    pub fn update_user(&self, id: UserId, patch: UserPatch) -> PendingCall<User> {
        self.mutate("update_user", move |store| {
            let user = store.update_user(&id, patch)?;
            let event = events::user_updated(&user);
            Ok((user, Some(event)))
        })
    }

    /// See [`EntityStore::delete_user`]
    pub fn delete_user(&self, id: UserId) -> PendingCall<User> {
        self.mutate("delete_user", move |store| {
            let user = store.delete_user(&id)?;
            let event = events::user_deleted(&user);
            Ok((user, Some(event)))
        })
    }

    /// See [`EntityStore::get_user`]
    pub fn get_user(&self, id: UserId) -> PendingCall<User> {
        self.query("get_user", move |store| store.get_user(&id))
    }

    /// See [`EntityStore::list_users`]
    pub fn list_users(&self, query: ListQuery) -> PendingCall<Vec<User>> {
        self.query("list_users", move |store| store.list_users(&query))
    }

    /// See [`EntityStore::list_hospital_users`]
    pub fn list_hospital_users(
        &self,
        hospital_id: HospitalId,
        query: ListQuery,
    ) -> PendingCall<Vec<User>> {
        self.query("list_hospital_users", move |store| {
            store.list_hospital_users(&hospital_id, &query)
        })
    }

    // ---------------------------------------------------------------------------------
    // Roles
    // ---------------------------------------------------------------------------------

    /// See [`EntityStore::create_role`]
    pub fn create_role(&self, input: NewRole) -> PendingCall<Role> {
        self.mutate("create_role", move |store| {
            let role = store.create_role(input)?;
            let event = events::role_created(&role);
            Ok((role, Some(event)))
        })
    }

    /// See [`EntityStore::update_role`]
    pub fn update_role(&self, id: RoleId, patch: RolePatch) -> PendingCall<Role> {
        self.mutate("update_role", move |store| {
            let role = store.update_role(&id, patch)?;
            let event = events::role_updated(&role);
            Ok((role, Some(event)))
        })
    }

    /// See [`EntityStore::delete_role`]
    pub fn delete_role(&self, id: RoleId) -> PendingCall<Role> {
        self.mutate("delete_role", move |store| {
            let role = store.delete_role(&id)?;
            let event = events::role_deleted(&role);
            Ok((role, Some(event)))
        })
    }

    /// See [`EntityStore::get_role`]
    pub fn get_role(&self, id: RoleId) -> PendingCall<Role> {
        self.query("get_role", move |store| store.get_role(&id))
    }

    /// See [`EntityStore::list_roles`]
    pub fn list_roles(&self, query: ListQuery) -> PendingCall<Vec<RoleSummary>> {
        self.query("list_roles", move |store| store.list_roles(&query))
    }

    // ---------------------------------------------------------------------------------
    // Patients
    // ---------------------------------------------------------------------------------

    /// See [`EntityStore::create_patient`]
    pub fn create_patient(
        &self,
        hospital_id: HospitalId,
        input: NewPatient,
    ) -> PendingCall<Patient> {
        self.mutate("create_patient", move |store| {
            Ok((store.create_patient(&hospital_id, input)?, None))
        })
    }

    /// See [`EntityStore::update_patient`]
    pub fn update_patient(
        &self,
        hospital_id: HospitalId,
        id: PatientId,
        patch: PatientPatch,
    ) -> PendingCall<Patient> {
        self.mutate("update_patient", move |store| {
            Ok((store.update_patient(&hospital_id, &id, patch)?, None))
        })
    }

    /// See [`EntityStore::get_patient`]
    pub fn get_patient(&self, hospital_id: HospitalId, id: PatientId) -> PendingCall<Patient> {
        self.query("get_patient", move |store| store.get_patient(&hospital_id, &id))
    }

    /// See [`EntityStore::list_patients`]
    pub fn list_patients(
        &self,
        hospital_id: HospitalId,
        query: ListQuery,
    ) -> PendingCall<Vec<Patient>> {
        self.query("list_patients", move |store| {
            store.list_patients(&hospital_id, &query)
        })
    }

    // ---------------------------------------------------------------------------------
    // Clinicians
    // ---------------------------------------------------------------------------------

    /// See [`EntityStore::create_clinician`]
    pub fn create_clinician(
        &self,
        hospital_id: HospitalId,
        input: NewClinician,
    ) -> PendingCall<Clinician> {
        self.mutate("create_clinician", move |store| {
            Ok((store.create_clinician(&hospital_id, input)?, None))
        })
    }

    /// See [`EntityStore::update_clinician`]
    pub fn update_clinician(
        &self,
        hospital_id: HospitalId,
        id: ClinicianId,
        patch: ClinicianPatch,
    ) -> PendingCall<Clinician> {
        self.mutate("update_clinician", move |store| {
            Ok((store.update_clinician(&hospital_id, &id, patch)?, None))
        })
    }

    /// See [`EntityStore::delete_clinician`]
    pub fn delete_clinician(
        &self,
        hospital_id: HospitalId,
        id: ClinicianId,
    ) -> PendingCall<Clinician> {
        self.mutate("delete_clinician", move |store| {
            Ok((store.delete_clinician(&hospital_id, &id)?, None))
        })
    }

    /// See [`EntityStore::get_clinician`]
    pub fn get_clinician(
        &self,
        hospital_id: HospitalId,
        id: ClinicianId,
    ) -> PendingCall<Clinician> {
        self.query("get_clinician", move |store| {
            store.get_clinician(&hospital_id, &id)
        })
    }

    /// See [`EntityStore::list_clinicians`]
    pub fn list_clinicians(
        &self,
        hospital_id: HospitalId,
        query: ListQuery,
    ) -> PendingCall<Vec<Clinician>> {
        self.query("list_clinicians", move |store| {
            store.list_clinicians(&hospital_id, &query)
        })
    }

    /// See [`EntityStore::stats`]
    pub fn stats(&self) -> PendingCall<DashboardStats> {
        self.query("stats", |store| Ok(store.stats()))
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        self.send(request).await
    }
}

fn poisoned() -> WardroomError {
    WardroomError::State("entity store lock poisoned".to_string())
}

/// Prepends a derived event to the feed on the blocking pool
///
/// The feed persists through [`crate::adapters::storage::StateStorage`], which does
/// synchronous file I/O with the file backend.
async fn record_notification(
    operation: &'static str,
    feed: Arc<NotificationStore>,
    event: NotificationEvent,
) {
    if let Err(e) = tokio::task::spawn_blocking(move || feed.add(event)).await {
        tracing::warn!(operation, error = %e, "Failed to record derived notification");
    }
}

fn run_locked<T, F>(store: &Mutex<EntityStore>, f: F) -> Result<T>
where
    F: FnOnce(&mut EntityStore) -> Result<T>,
{
    let mut guard = store.lock().map_err(|_| poisoned())?;
    f(&mut guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::config::secret_string;
    use crate::domain::NotificationType;
    use serde_json::json;
    use std::time::Duration;

    fn api() -> MockApi {
        MockApi::new(EntityStore::new()).with_latency(Latency::none())
    }

    #[tokio::test]
    async fn test_typed_call_round_trip() {
        let api = api();
        let role = api.create_role(NewRole::new("Nurse", "Ward staff")).await.unwrap();
        let fetched = api.get_role(role.id.clone()).await.unwrap();
        assert_eq!(fetched, role);
    }

    #[tokio::test]
    async fn test_rejections_surface_as_errors() {
        let api = api();
        let err = api.delete_role(RoleId::from_sequence(99)).await.unwrap_err();
        assert!(matches!(err, WardroomError::NotFound { entity: "role", .. }));
    }

    #[tokio::test]
    async fn test_derived_notifications_are_pushed() {
        let feed = Arc::new(NotificationStore::load(Arc::new(MemoryStorage::new()), "test", 0));
        let api = api().with_notifications(feed.clone());

        api.create_hospital(NewHospital::new("City General", "a@x.com", secret_string("pw".to_string())))
            .await
            .unwrap();
        api.create_patient(HospitalId::from_sequence(1), NewPatient::new("Ama", "Owusu"))
            .await
            .unwrap();

        let feed = feed.list();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationType::HospitalCreated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_derived_notifications_persist_to_file_storage() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage: Arc<dyn crate::adapters::storage::StateStorage> =
            Arc::new(crate::adapters::storage::JsonFileStorage::open(dir.path()).unwrap());
        let feed = Arc::new(NotificationStore::load(storage.clone(), "test", 0));
        let api = api().with_notifications(feed);

        api.create_role(NewRole::new("Porter", "Moves patients"))
            .await
            .unwrap();

        let reloaded = NotificationStore::load(storage, "test", 0);
        let persisted = reloaded.list();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].kind, NotificationType::RoleCreated);
    }

    #[tokio::test]
    async fn test_api_client_request() {
        let api = api();
        let client: &dyn ApiClient = &api;
        let roles = client.request(ApiRequest::get("/collection/roles")).await.unwrap();
        assert_eq!(roles.as_array().unwrap().len(), 2);

        let unrouted = client
            .request(ApiRequest::post("/collection/nowhere", json!({})))
            .await
            .unwrap();
        assert_eq!(unrouted, json!({}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let api = MockApi::new(EntityStore::new())
            .with_latency(Latency::fixed(Duration::from_millis(300)));
        let started = tokio::time::Instant::now();
        api.stats().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
