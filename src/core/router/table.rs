//! Route table and dispatch
//!
//! Each route binds a method and a [`PathPattern`] to exactly one entity store operation.
//! Routes are tried in table order and the first match wins. `GET` handlers receive a shared
//! borrow of the store, so a read route cannot mutate anything.

use super::pattern::{PathPattern, RouteParams};
use super::request::{ApiRequest, Method};
use crate::core::api::events;
use crate::core::store::EntityStore;
use crate::domain::errors::WardroomError;
use crate::domain::result::Result;
use crate::domain::{
    ClinicianId, ClinicianPatch, HospitalId, HospitalPatch, NewClinician, NewHospital, NewPatient,
    NewRole, NewUser, NotificationEvent, PatientId, PatientPatch, RoleId, RolePatch, UserId,
    UserPatch,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Default mount point of every route
pub const DEFAULT_BASE_PATH: &str = "/collection";

/// Result of a mutating handler
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// JSON returned to the caller
    pub response: Value,
    /// Notification derived from the mutation, if the entity kind produces one
    pub event: Option<NotificationEvent>,
}

impl Mutation {
    fn quiet(response: Value) -> Self {
        Self {
            response,
            event: None,
        }
    }

    fn notify(response: Value, event: NotificationEvent) -> Self {
        Self {
            response,
            event: Some(event),
        }
    }
}

/// Read-only handler
pub type ReadHandler = fn(&EntityStore, &RouteParams, &ApiRequest) -> Result<Value>;

/// Mutating handler
pub type WriteHandler = fn(&mut EntityStore, &RouteParams, &ApiRequest) -> Result<Mutation>;

/// Handler kinds, split by whether they may mutate
#[derive(Clone, Copy)]
pub enum Handler {
    /// `GET` routes
    Read(ReadHandler),
    /// `POST`, `PUT` and `DELETE` routes
    Write(WriteHandler),
}

/// One row of the route table
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: PathPattern,
    operation: &'static str,
    handler: Handler,
}

impl Route {
    /// Request method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Full path pattern, base path included
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Name of the entity store operation the route calls
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.to_string())
            .field("operation", &self.operation)
            .finish()
    }
}

/// What dispatching a request produced
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// A route matched and its operation succeeded
    Handled {
        /// Operation that ran
        operation: &'static str,
        /// JSON returned to the caller
        response: Value,
        /// Derived notification, for hospital, user and role mutations
        event: Option<NotificationEvent>,
    },
    /// No route matched; callers see an empty object
    Unrouted,
}

impl RouteOutcome {
    /// Response body as seen by the caller
    pub fn response(&self) -> Value {
        match self {
            RouteOutcome::Handled { response, .. } => response.clone(),
            RouteOutcome::Unrouted => json!({}),
        }
    }

    /// Splits into the response body and the derived event
    pub fn into_parts(self) -> (Value, Option<NotificationEvent>) {
        match self {
            RouteOutcome::Handled {
                response, event, ..
            } => (response, event),
            RouteOutcome::Unrouted => (json!({}), None),
        }
    }
}

/// Maps HTTP-shaped requests onto entity store operations
#[derive(Debug, Clone)]
pub struct Router {
    base_path: String,
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}

impl Router {
    /// Builds the route table mounted under `base_path`
    pub fn new(base_path: &str) -> Self {
        let base_path = format!("/{}", base_path.trim_matches('/'));
        let base = base_path.trim_end_matches('/');

        let table: Vec<(Method, &str, &'static str, Handler)> = vec![
            (Method::Get, "/hospitals", "list_hospitals", Handler::Read(list_hospitals)),
            (Method::Post, "/hospitals", "create_hospital", Handler::Write(create_hospital)),
            (Method::Get, "/hospitals/{id}", "get_hospital", Handler::Read(get_hospital)),
            (Method::Put, "/hospitals/{id}", "update_hospital", Handler::Write(update_hospital)),
            (Method::Delete, "/hospitals/{id}", "delete_hospital", Handler::Write(delete_hospital)),
            (Method::Get, "/hospitals/{id}/users", "list_hospital_users", Handler::Read(list_hospital_users)),
            (Method::Get, "/users", "list_users", Handler::Read(list_users)),
            (Method::Post, "/users", "create_user", Handler::Write(create_user)),
            (Method::Get, "/users/{id}", "get_user", Handler::Read(get_user)),
            (Method::Put, "/users/{id}", "update_user", Handler::Write(update_user)),
            (Method::Delete, "/users/{id}", "delete_user", Handler::Write(delete_user)),
            (Method::Get, "/roles", "list_roles", Handler::Read(list_roles)),
            (Method::Post, "/roles", "create_role", Handler::Write(create_role)),
            (Method::Get, "/roles/{id}", "get_role", Handler::Read(get_role)),
            (Method::Put, "/roles/{id}", "update_role", Handler::Write(update_role)),
            (Method::Delete, "/roles/{id}", "delete_role", Handler::Write(delete_role)),
            (Method::Get, "/stats", "stats", Handler::Read(stats)),
            (Method::Get, "/{hospital_id}/patients", "list_patients", Handler::Read(list_patients)),
            (Method::Post, "/{hospital_id}/patients", "create_patient", Handler::Write(create_patient)),
            (Method::Get, "/{hospital_id}/patients/{id}", "get_patient", Handler::Read(get_patient)),
            (Method::Put, "/{hospital_id}/patients/{id}", "update_patient", Handler::Write(update_patient)),
            (Method::Get, "/{hospital_id}/clinicians", "list_clinicians", Handler::Read(list_clinicians)),
            (Method::Post, "/{hospital_id}/clinicians", "create_clinician", Handler::Write(create_clinician)),
            (Method::Get, "/{hospital_id}/clinicians/{id}", "get_clinician", Handler::Read(get_clinician)),
            (Method::Put, "/{hospital_id}/clinicians/{id}", "update_clinician", Handler::Write(update_clinician)),
            (Method::Delete, "/{hospital_id}/clinicians/{id}", "delete_clinician", Handler::Write(delete_clinician)),
        ];

        let routes = table
            .into_iter()
            .map(|(method, suffix, operation, handler)| Route {
                method,
                pattern: PathPattern::parse(&format!("{base}{suffix}")),
                operation,
                handler,
            })
            .collect();

        Self {
            base_path: base.to_string(),
            routes,
        }
    }

    /// Mount point of the table
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Every route, in match order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the first route matching the request's method and path
    pub fn resolve(&self, method: Method, path: &str) -> Option<(&Route, RouteParams)> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    /// Runs the request against the store
    ///
    /// An unmatched request is logged and reported as [`RouteOutcome::Unrouted`] rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// Whatever the matched operation rejects with: `NotFound`, `ValidationFailed` or
    /// `PreconditionFailed`.
    pub fn dispatch(&self, store: &mut EntityStore, request: &ApiRequest) -> Result<RouteOutcome> {
        let Some((route, params)) = self.resolve(request.method(), request.path()) else {
            let unrouted = WardroomError::UnroutedRequest {
                method: request.method().to_string(),
                path: request.path().to_string(),
            };
            crate::log_unrouted_request!(&unrouted);
            return Ok(RouteOutcome::Unrouted);
        };

        crate::log_api_request!(request.method(), request.path(), route.operation);

        let (response, event) = match route.handler {
            Handler::Read(handler) => (handler(store, &params, request)?, None),
            Handler::Write(handler) => {
                let mutation = handler(store, &params, request)?;
                (mutation.response, mutation.event)
            }
        };

        Ok(RouteOutcome::Handled {
            operation: route.operation,
            response,
            event,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn ok() -> Value {
    json!({ "ok": true })
}

// -------------------------------------------------------------------------------------
// Hospitals
// -------------------------------------------------------------------------------------

fn list_hospitals(store: &EntityStore, _: &RouteParams, request: &ApiRequest) -> Result<Value> {
    to_json(&store.list_hospitals(&request.list_query()?)?)
}

fn create_hospital(
    store: &mut EntityStore,
    _: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    let created = store.create_hospital(request.body_as::<NewHospital>()?)?;
    Ok(Mutation::notify(
        json!({ "id": created.hospital.id, "name": created.hospital.name }),
        events::hospital_created(&created.hospital, &created.admin),
    ))
}

fn get_hospital(store: &EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Value> {
    to_json(&store.get_hospital(&params.id::<HospitalId>("id")?)?)
}

fn update_hospital(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    let hospital = store.update_hospital(&params.id("id")?, request.body_as::<HospitalPatch>()?)?;
    Ok(Mutation::notify(ok(), events::hospital_updated(&hospital)))
}

fn delete_hospital(
    store: &mut EntityStore,
    params: &RouteParams,
    _: &ApiRequest,
) -> Result<Mutation> {
    let hospital = store.delete_hospital(&params.id("id")?)?;
    Ok(Mutation::notify(ok(), events::hospital_deleted(&hospital)))
}

fn list_hospital_users(
    store: &EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Value> {
    to_json(&store.list_hospital_users(&params.id("id")?, &request.list_query()?)?)
}

// -------------------------------------------------------------------------------------
// Users
// -------------------------------------------------------------------------------------

fn list_users(store: &EntityStore, _: &RouteParams, request: &ApiRequest) -> Result<Value> {
    to_json(&store.list_users(&request.list_query()?)?)
}

fn create_user(store: &mut EntityStore, _: &RouteParams, request: &ApiRequest) -> Result<Mutation> {
    let user = store.create_user(request.body_as::<NewUser>()?)?;
    let event = events::user_created(&user);
    Ok(Mutation::notify(to_json(&user)?, event))
}

fn get_user(store: &EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Value> {
    to_json(&store.get_user(&params.id::<UserId>("id")?)?)
}

fn update_user(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    let user = store.update_user(&params.id("id")?, request.body_as::<UserPatch>()?)?;
    Ok(Mutation::notify(ok(), events::user_updated(&user)))
}

fn delete_user(store: &mut EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Mutation> {
    let user = store.delete_user(&params.id("id")?)?;
    Ok(Mutation::notify(ok(), events::user_deleted(&user)))
}

// -------------------------------------------------------------------------------------
// Roles
// -------------------------------------------------------------------------------------

fn list_roles(store: &EntityStore, _: &RouteParams, request: &ApiRequest) -> Result<Value> {
    to_json(&store.list_roles(&request.list_query()?)?)
}

fn create_role(store: &mut EntityStore, _: &RouteParams, request: &ApiRequest) -> Result<Mutation> {
    let role = store.create_role(request.body_as::<NewRole>()?)?;
    let event = events::role_created(&role);
    Ok(Mutation::notify(to_json(&role)?, event))
}

fn get_role(store: &EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Value> {
    to_json(&store.get_role(&params.id::<RoleId>("id")?)?)
}

fn update_role(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    let role = store.update_role(&params.id("id")?, request.body_as::<RolePatch>()?)?;
    Ok(Mutation::notify(ok(), events::role_updated(&role)))
}

fn delete_role(store: &mut EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Mutation> {
    let role = store.delete_role(&params.id("id")?)?;
    Ok(Mutation::notify(ok(), events::role_deleted(&role)))
}

fn stats(store: &EntityStore, _: &RouteParams, _: &ApiRequest) -> Result<Value> {
    to_json(&store.stats())
}

// -------------------------------------------------------------------------------------
// Patients
// -------------------------------------------------------------------------------------

fn list_patients(store: &EntityStore, params: &RouteParams, request: &ApiRequest) -> Result<Value> {
    to_json(&store.list_patients(&params.id("hospital_id")?, &request.list_query()?)?)
}

fn create_patient(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    let hospital_id: HospitalId = params.id("hospital_id")?;
    let patient = store.create_patient(&hospital_id, request.body_as::<NewPatient>()?)?;
    Ok(Mutation::quiet(to_json(&patient)?))
}

fn get_patient(store: &EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Value> {
    to_json(&store.get_patient(&params.id("hospital_id")?, &params.id::<PatientId>("id")?)?)
}

fn update_patient(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    store.update_patient(
        &params.id("hospital_id")?,
        &params.id("id")?,
        request.body_as::<PatientPatch>()?,
    )?;
    Ok(Mutation::quiet(ok()))
}

// -------------------------------------------------------------------------------------
// Clinicians
// -------------------------------------------------------------------------------------

fn list_clinicians(
    store: &EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Value> {
    to_json(&store.list_clinicians(&params.id("hospital_id")?, &request.list_query()?)?)
}

fn create_clinician(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    let hospital_id: HospitalId = params.id("hospital_id")?;
    let clinician = store.create_clinician(&hospital_id, request.body_as::<NewClinician>()?)?;
    Ok(Mutation::quiet(to_json(&clinician)?))
}

fn get_clinician(store: &EntityStore, params: &RouteParams, _: &ApiRequest) -> Result<Value> {
    to_json(&store.get_clinician(&params.id("hospital_id")?, &params.id::<ClinicianId>("id")?)?)
}

fn update_clinician(
    store: &mut EntityStore,
    params: &RouteParams,
    request: &ApiRequest,
) -> Result<Mutation> {
    store.update_clinician(
        &params.id("hospital_id")?,
        &params.id("id")?,
        request.body_as::<ClinicianPatch>()?,
    )?;
    Ok(Mutation::quiet(ok()))
}

fn delete_clinician(
    store: &mut EntityStore,
    params: &RouteParams,
    _: &ApiRequest,
) -> Result<Mutation> {
    store.delete_clinician(&params.id("hospital_id")?, &params.id("id")?)?;
    Ok(Mutation::quiet(ok()))
}
