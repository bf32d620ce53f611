//! In-process Microsoft Graph stand-in for integration tests.
//!
//! Serves a token endpoint under `/auth/{tenant}/oauth2/v2.0/token` and the
//! handful of Graph routes the client uses under `/v1.0`.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use graph::{ClientSecretCredential, GraphClient, TokenCache, GRAPH_SCOPE};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use utils::{ClientConfig, HttpClient};

pub const SITES_READ_ALL_ID: &str = "332a536c-c7ef-4017-ab91-336970924f0d";
pub const USER_READ_ID: &str = "e1fe6dd8-ba31-4d61-89e7-88639da4683d";
pub const USER_READ_ALL_ID: &str = "df021288-bdef-4463-88db-98f22de89214";

#[derive(Default)]
pub struct StubState {
    pub next_id: usize,
    pub applications: HashMap<String, Value>,
    /// `(METHOD, path)` of every Graph call, in order.
    pub calls: Vec<(String, String)>,
    pub token_requests: usize,
    pub token_lifetime_secs: i64,
    /// Route label that answers 403 instead of succeeding.
    pub fail_on: Option<&'static str>,
    /// Number of consent grants to accept before failing.
    pub consent_budget: Option<usize>,
    pub consent_grants: Vec<Value>,
    pub last_authorization: Option<String>,
}

pub type Shared = Arc<Mutex<StubState>>;

pub struct GraphStub {
    pub base_url: String,
    pub authority: String,
    pub state: Shared,
}

impl GraphStub {
    pub fn client(&self) -> GraphClient {
        let http = HttpClient::new(ClientConfig::default()).unwrap();
        let credential = ClientSecretCredential::new(http.clone(), "tenant-1", "client-1", "secret-1")
            .with_authority_host(self.authority.clone());
        GraphClient::new(http, TokenCache::new(Arc::new(credential), GRAPH_SCOPE))
            .with_base_url(self.base_url.clone())
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn set_fail_on(&self, label: &'static str) {
        self.state.lock().unwrap().fail_on = Some(label);
    }
}

fn record(state: &Shared, method: &str, path: String, label: &str) -> Result<(), StatusCode> {
    let mut state = state.lock().unwrap();
    state.calls.push((method.to_string(), path));
    if state.fail_on == Some(label) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(())
}

fn forbidden() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"error": {"code": "Authorization_RequestDenied", "message": "Insufficient privileges"}})),
    )
}

async fn token(
    State(state): State<Shared>,
    Path(_tenant): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    if form.get("grant_type").map(String::as_str) != Some("client_credentials")
        || form.get("scope").map(String::as_str) != Some(GRAPH_SCOPE)
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_request"})));
    }
    state.token_requests += 1;
    let lifetime = if state.token_lifetime_secs == 0 {
        3600
    } else {
        state.token_lifetime_secs
    };
    (
        StatusCode::OK,
        Json(json!({
            "token_type": "Bearer",
            "expires_in": lifetime,
            "access_token": format!("stub-token-{}", state.token_requests),
        })),
    )
}

async fn create_application(
    State(state): State<Shared>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "POST", "/applications".into(), "create_application").is_err() {
        return forbidden();
    }
    let mut state = state.lock().unwrap();
    state.last_authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.next_id += 1;
    let id = format!("obj-{}", state.next_id);
    let app = json!({
        "id": id,
        "appId": format!("app-{}", state.next_id),
        "displayName": body["displayName"],
        "notes": body.get("notes").cloned().unwrap_or(Value::Null),
        "signInAudience": body["signInAudience"],
        "web": body["web"],
        "requiredResourceAccess": [],
    });
    state.applications.insert(id, app.clone());
    (StatusCode::CREATED, Json(app))
}

async fn get_application(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "GET", format!("/applications/{}", id), "get_application").is_err() {
        return forbidden();
    }
    match state.lock().unwrap().applications.get(&id) {
        Some(app) => (StatusCode::OK, Json(app.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": "Request_ResourceNotFound"}})),
        ),
    }
}

async fn patch_application(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "PATCH", format!("/applications/{}", id), "patch_application").is_err() {
        return forbidden();
    }
    let mut state = state.lock().unwrap();
    match state.applications.get_mut(&id) {
        Some(app) => {
            app["requiredResourceAccess"] = body["requiredResourceAccess"].clone();
            (StatusCode::NO_CONTENT, Json(Value::Null))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn add_password(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "POST", format!("/applications/{}/addPassword", id), "add_password").is_err()
    {
        return forbidden();
    }
    if !state.lock().unwrap().applications.contains_key(&id) {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "keyId": format!("key-for-{}", id),
            "id": format!("credential-{}", id),
            "displayName": body["passwordCredential"]["displayName"],
            "endDateTime": body["passwordCredential"]["endDateTime"],
            "secretText": "Abc1~stub-generated-secret-value-xyZ9",
        })),
    )
}

async fn list_service_principals(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "GET", "/servicePrincipals".into(), "catalog").is_err() {
        return forbidden();
    }
    let filter = query.get("$filter").cloned().unwrap_or_default();
    if filter != "appId eq '00000003-0000-0000-c000-000000000000'" {
        return (StatusCode::OK, Json(json!({"value": []})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "value": [{
                "appRoles": [
                    {"id": SITES_READ_ALL_ID, "value": "Sites.Read.All"},
                    {"id": USER_READ_ALL_ID, "value": "User.Read.All"}
                ],
                "oauth2PermissionScopes": [
                    {"id": USER_READ_ID, "value": "User.Read"}
                ]
            }]
        })),
    )
}

async fn create_service_principal(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "POST", "/servicePrincipals".into(), "service_principal").is_err() {
        return forbidden();
    }
    let app_id = body["appId"].as_str().unwrap_or_default().to_string();
    (
        StatusCode::CREATED,
        Json(json!({"id": format!("sp-for-{}", app_id), "appId": app_id})),
    )
}

async fn grant_consent(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if record(&state, "POST", "/oauth2PermissionGrants".into(), "consent").is_err() {
        return forbidden();
    }
    let mut state = state.lock().unwrap();
    if let Some(budget) = state.consent_budget {
        if state.consent_grants.len() >= budget {
            return forbidden();
        }
    }
    state.consent_grants.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

pub async fn spawn_graph_stub() -> GraphStub {
    let state: Shared = Arc::new(Mutex::new(StubState::default()));

    let app = Router::new()
        .route("/auth/:tenant/oauth2/v2.0/token", post(token))
        .route("/v1.0/applications", post(create_application))
        .route(
            "/v1.0/applications/:id",
            get(get_application).patch(patch_application),
        )
        .route("/v1.0/applications/:id/addPassword", post(add_password))
        .route(
            "/v1.0/servicePrincipals",
            get(list_service_principals).post(create_service_principal),
        )
        .route("/v1.0/oauth2PermissionGrants", post(grant_consent))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    GraphStub {
        base_url: format!("http://{}/v1.0", addr),
        authority: format!("http://{}/auth", addr),
        state,
    }
}
