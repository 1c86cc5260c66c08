//! In-process stand-in for the remote product API, plus config helpers.
//!
//! ```text
//! GET    /api/produtos          seeded items (or the list body override)
//! POST   /api/produtos          stores the body with a fresh numeric Id
//! PUT    /api/produtos/{id}     merges the body, returns the item
//! DELETE /api/produtos/{id}     204, or 404 for unknown ids
//! POST   /api/auth/login        { token: "token-{Email}" }, 401 for "errada"
//!
//! `fail_with` and `set_delay` apply to every route.
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::ClientConfig;

/// One request as the mock API saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    items: Vec<Value>,
    list_body: Option<Value>,
    empty_updates: bool,
    fail_with: Option<u16>,
    delay: Option<Duration>,
    requests: Vec<RecordedRequest>,
    next_id: u64,
}

type Shared = Arc<Mutex<MockState>>;

/// Handle to a running mock API. The server lives until the test ends.
pub struct MockApi {
    pub base_url: String,
    state: Shared,
}

impl MockApi {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            next_id: 100,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/produtos", get(list_products).post(create_product))
            .route(
                "/api/produtos/{id}",
                put(update_product).delete(delete_product),
            )
            .route("/api/auth/login", post(login))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockApi {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Replaces the stored items (PascalCase wire objects).
    pub async fn seed(&self, items: Vec<Value>) {
        self.state.lock().await.items = items;
    }

    /// Makes GET return this body verbatim instead of the items.
    pub async fn set_list_body(&self, body: Value) {
        self.state.lock().await.list_body = Some(body);
    }

    /// Makes PUT answer 200 with an empty body.
    pub async fn set_empty_updates(&self, empty: bool) {
        self.state.lock().await.empty_updates = empty;
    }

    /// Makes every route answer with this status.
    pub async fn fail_with(&self, status: u16) {
        self.state.lock().await.fail_with = Some(status);
    }

    /// Makes every route wait this long before answering.
    pub async fn set_delay(&self, delay: Duration) {
        self.state.lock().await.delay = Some(delay);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

/// A config pointed at `base_url` with the remote API enabled.
pub fn client_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::new();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 2;
    config.api.use_api = true;
    config
}

/// A base URL on a port nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// =============================================================================
// Handlers
// =============================================================================

fn record(
    state: &mut MockState,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> Option<Response> {
    state.requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(body).ok(),
    });

    state.fail_with.map(|code| {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, "forced failure").into_response()
    })
}

async fn pause(state: &Shared) {
    let delay = state.lock().await.delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

fn item_id(item: &Value) -> Option<String> {
    match item.get("Id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

async fn list_products(State(state): State<Shared>, uri: Uri, headers: HeaderMap) -> Response {
    pause(&state).await;
    let mut state = state.lock().await;
    if let Some(failure) = record(&mut state, Method::GET, &uri, &headers, &[]) {
        return failure;
    }

    let body = state
        .list_body
        .clone()
        .unwrap_or_else(|| Value::Array(state.items.clone()));
    Json(body).into_response()
}

async fn create_product(
    State(state): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    pause(&state).await;
    let mut state = state.lock().await;
    if let Some(failure) = record(&mut state, Method::POST, &uri, &headers, &body) {
        return failure;
    }

    let mut item: Map<String, Value> = serde_json::from_slice(&body).unwrap_or_default();
    state.next_id += 1;
    item.insert("Id".to_string(), json!(state.next_id));

    let item = Value::Object(item);
    state.items.push(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    pause(&state).await;
    let mut state = state.lock().await;
    if let Some(failure) = record(&mut state, Method::PUT, &uri, &headers, &body) {
        return failure;
    }
    if state.empty_updates {
        return StatusCode::OK.into_response();
    }

    let changes: Map<String, Value> = serde_json::from_slice(&body).unwrap_or_default();
    let Some(item) = state
        .items
        .iter_mut()
        .find(|item| item_id(item).as_deref() == Some(id.as_str()))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Value::Object(fields) = &mut *item {
        for (key, value) in changes {
            if key != "Id" {
                fields.insert(key, value);
            }
        }
    }
    Json(item.clone()).into_response()
}

async fn delete_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    pause(&state).await;
    let mut state = state.lock().await;
    if let Some(failure) = record(&mut state, Method::DELETE, &uri, &headers, &[]) {
        return failure;
    }

    let before = state.items.len();
    state
        .items
        .retain(|item| item_id(item).as_deref() != Some(id.as_str()));

    if state.items.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn login(
    State(state): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    pause(&state).await;
    let mut state = state.lock().await;
    if let Some(failure) = record(&mut state, Method::POST, &uri, &headers, &body) {
        return failure;
    }

    let credentials: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    if credentials["Senha"] == "errada" {
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }

    let email = credentials["Email"].as_str().unwrap_or_default();
    Json(json!({ "token": format!("token-{email}") })).into_response()
}
