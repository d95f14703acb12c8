//! In-memory implementation of the Resources API.
//!
//! The caller is identified by its bearer token, taken verbatim as an email.
//! A resource the caller holds no policy on is reported as missing; a
//! visible resource without the required action answers 403.

pub mod model;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub use model::{
    default_catalog, AccessPolicyMembership, AccessPolicyResponseEntry, ErrorReport, ResourceAndAccessPolicy,
    ResourceRole, ResourceType,
};

type Policies = BTreeMap<String, AccessPolicyMembership>;

#[derive(Debug, Default)]
struct Store {
    catalog: Vec<ResourceType>,
    resources: BTreeMap<(String, String), Policies>,
}

type Db = Arc<RwLock<Store>>;

/// Roles and actions one caller holds on one resource.
#[derive(Debug, Default)]
struct Grant {
    roles: BTreeSet<String>,
    actions: BTreeSet<String>,
}

impl Grant {
    fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.actions.is_empty()
    }
}

/// An error answered as an `ErrorReport` body.
#[derive(Debug)]
struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let report = ErrorReport {
            source: "sam".to_string(),
            message: self.message,
            status_code: Some(self.status.as_u16()),
            causes: Vec::new(),
        };
        (self.status, Json(report)).into_response()
    }
}

impl Store {
    fn resource_type(&self, name: &str) -> Result<&ResourceType, Failure> {
        self.catalog
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, format!("resource type {name} not found")))
    }

    /// Type and grant for a resource the caller can see.
    fn authorize(&self, type_name: &str, id: &str, caller: &str) -> Result<(ResourceType, Grant), Failure> {
        let ty = self.resource_type(type_name)?;
        let not_found = || Failure::new(StatusCode::NOT_FOUND, format!("resource {type_name}/{id} not found"));
        let policies = self
            .resources
            .get(&(type_name.to_string(), id.to_string()))
            .ok_or_else(not_found)?;
        let grant = grant(ty, policies, caller);
        if grant.is_empty() {
            return Err(not_found());
        }
        Ok((ty.clone(), grant))
    }
}

fn grant(ty: &ResourceType, policies: &Policies, caller: &str) -> Grant {
    let mut grant = Grant::default();
    for policy in policies.values().filter(|p| p.member_emails.contains(caller)) {
        grant.actions.extend(policy.actions.iter().cloned());
        for role in &policy.roles {
            grant.roles.insert(role.clone());
            if let Some(def) = ty.roles.iter().find(|r| r.role_name == *role) {
                grant.actions.extend(def.actions.iter().cloned());
            }
        }
    }
    grant
}

fn require_action(grant: &Grant, action: &str, type_name: &str, id: &str) -> Result<(), Failure> {
    if grant.actions.contains(action) {
        return Ok(());
    }
    Err(Failure::new(
        StatusCode::FORBIDDEN,
        format!("caller may not {action} resource {type_name}/{id}"),
    ))
}

fn caller(headers: &HeaderMap) -> Result<String, Failure> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Failure::new(StatusCode::UNAUTHORIZED, "missing bearer token"))
}

fn policy_email(type_name: &str, id: &str, policy_name: &str) -> String {
    format!("policy-{policy_name}@{id}.{type_name}.mock")
}

pub fn app() -> Router {
    app_with_catalog(default_catalog())
}

pub fn app_with_catalog(catalog: Vec<ResourceType>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        catalog,
        resources: BTreeMap::new(),
    }));
    Router::new()
        .route("/api/resourceTypes", get(list_resource_types))
        .route("/api/resource/{type_name}", get(list_resources_and_policies))
        .route("/api/resource/{type_name}/{id}", post(create_resource).delete(delete_resource))
        .route("/api/resource/{type_name}/{id}/policies", get(list_resource_policies))
        .route("/api/resource/{type_name}/{id}/policies/{policy_name}", put(overwrite_policy))
        .route("/api/resource/{type_name}/{id}/action/{action}", get(resource_action))
        .route("/api/resource/{type_name}/{id}/roles", get(resource_roles))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn list_resource_types(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<ResourceType>>, Failure> {
    caller(&headers)?;
    Ok(Json(db.read().await.catalog.clone()))
}

async fn list_resources_and_policies(
    State(db): State<Db>,
    Path(type_name): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<ResourceAndAccessPolicy>>, Failure> {
    let caller = caller(&headers)?;
    let caller = caller.as_str();
    let store = db.read().await;
    store.resource_type(&type_name)?;
    let pairs = store
        .resources
        .iter()
        .filter(|((t, _), _)| *t == type_name)
        .flat_map(|((_, id), policies)| {
            policies
                .iter()
                .filter(move |(_, p)| p.member_emails.contains(caller))
                .map(move |(name, _)| ResourceAndAccessPolicy {
                    resource_id: id.clone(),
                    access_policy_name: name.clone(),
                })
        })
        .collect();
    Ok(Json(pairs))
}

async fn create_resource(
    State(db): State<Db>,
    Path((type_name, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, Failure> {
    let caller = caller(&headers)?;
    let mut store = db.write().await;
    let owner_role = store.resource_type(&type_name)?.owner_role_name.clone();
    let key = (type_name, id);
    if store.resources.contains_key(&key) {
        return Err(Failure::new(
            StatusCode::CONFLICT,
            format!("resource {}/{} already exists", key.0, key.1),
        ));
    }
    let owner = AccessPolicyMembership {
        member_emails: BTreeSet::from([caller.clone()]),
        actions: BTreeSet::new(),
        roles: BTreeSet::from([owner_role.clone()]),
    };
    info!(%caller, type_name = %key.0, id = %key.1, "resource created");
    store.resources.insert(key, BTreeMap::from([(owner_role, owner)]));
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_resource(
    State(db): State<Db>,
    Path((type_name, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, Failure> {
    let caller = caller(&headers)?;
    let mut store = db.write().await;
    let (_, grant) = store.authorize(&type_name, &id, &caller)?;
    require_action(&grant, "delete", &type_name, &id)?;
    info!(%caller, %type_name, %id, "resource deleted");
    store.resources.remove(&(type_name, id));
    Ok(StatusCode::NO_CONTENT)
}

async fn list_resource_policies(
    State(db): State<Db>,
    Path((type_name, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Vec<AccessPolicyResponseEntry>>, Failure> {
    let caller = caller(&headers)?;
    let store = db.read().await;
    let (_, grant) = store.authorize(&type_name, &id, &caller)?;
    require_action(&grant, "read_policies", &type_name, &id)?;
    let entries = store.resources[&(type_name.clone(), id.clone())]
        .iter()
        .map(|(name, policy)| AccessPolicyResponseEntry {
            policy_name: name.clone(),
            policy: policy.clone(),
            email: policy_email(&type_name, &id, name),
        })
        .collect();
    Ok(Json(entries))
}

async fn overwrite_policy(
    State(db): State<Db>,
    Path((type_name, id, policy_name)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(policy): Json<AccessPolicyMembership>,
) -> Result<(StatusCode, Json<Vec<String>>), Failure> {
    let caller = caller(&headers)?;
    let mut store = db.write().await;
    let (ty, grant) = store.authorize(&type_name, &id, &caller)?;
    require_action(&grant, "alter_policies", &type_name, &id)?;

    let unknown_roles: Vec<_> = policy
        .roles
        .iter()
        .filter(|r| !ty.roles.iter().any(|d| d.role_name == **r))
        .map(String::as_str)
        .collect();
    if !unknown_roles.is_empty() {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            format!("unknown roles for {type_name}: {}", unknown_roles.join(", ")),
        ));
    }
    let unknown_actions: Vec<_> = policy
        .actions
        .iter()
        .filter(|a| !ty.actions.contains(*a))
        .map(String::as_str)
        .collect();
    if !unknown_actions.is_empty() {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            format!("unknown actions for {type_name}: {}", unknown_actions.join(", ")),
        ));
    }

    let roles: Vec<String> = policy.roles.iter().cloned().collect();
    info!(%caller, %type_name, %id, %policy_name, "policy overwritten");
    if let Some(policies) = store.resources.get_mut(&(type_name, id)) {
        policies.insert(policy_name, policy);
    }
    Ok((StatusCode::CREATED, Json(roles)))
}

async fn resource_action(
    State(db): State<Db>,
    Path((type_name, id, action)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<bool>, Failure> {
    let caller = caller(&headers)?;
    let store = db.read().await;
    let ty = store.resource_type(&type_name)?;
    let allowed = store
        .resources
        .get(&(type_name.clone(), id))
        .is_some_and(|policies| grant(ty, policies, &caller).actions.contains(&action));
    Ok(Json(allowed))
}

async fn resource_roles(
    State(db): State<Db>,
    Path((type_name, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, Failure> {
    let caller = caller(&headers)?;
    let store = db.read().await;
    let (_, grant) = store.authorize(&type_name, &id, &caller)?;
    Ok(Json(grant.roles.into_iter().collect()))
}
