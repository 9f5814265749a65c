//! Axum-based mock of the Fultang REST backend
//!
//! Each test starts its own server on an ephemeral port so tests never
//! contend for a fixed port.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};

/// Shared state for the mock backend
#[derive(Clone)]
pub struct MockBackendState {
    pub login_response: Arc<Mutex<(u16, Value)>>,
    pub me_response: Arc<Mutex<(u16, Value)>>,
    /// JSON bodies received on `login/`
    pub login_requests: Arc<Mutex<Vec<Value>>>,
    /// `Authorization` headers received on `me/`
    pub me_authorizations: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBackendState {
    fn default() -> Self {
        Self {
            login_response: Arc::new(Mutex::new((
                401,
                json!({"error": "invalid_credentials", "detail": "Identifiants invalides."}),
            ))),
            me_response: Arc::new(Mutex::new((
                401,
                json!({"detail": "Authentication credentials were not provided."}),
            ))),
            login_requests: Arc::new(Mutex::new(Vec::new())),
            me_authorizations: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

pub struct MockBackend {
    /// Base URL of the API, ending in `/api/`
    pub base_url: String,
    pub state: MockBackendState,
    server: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockBackendState::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener
            .local_addr()
            .expect("Mock backend has no local address");

        let app = create_mock_app(state.clone());
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                println!("Mock backend error: {e}");
            }
        });

        Self {
            base_url: format!("http://{addr}/api/"),
            state,
            server,
        }
    }

    pub fn respond_to_login(&self, status: u16, body: Value) {
        *self.state.login_response.lock().unwrap() = (status, body);
    }

    pub fn respond_to_me(&self, status: u16, body: Value) {
        *self.state.me_response.lock().unwrap() = (status, body);
    }

    pub fn login_requests(&self) -> Vec<Value> {
        self.state.login_requests.lock().unwrap().clone()
    }

    pub fn me_authorizations(&self) -> Vec<String> {
        self.state.me_authorizations.lock().unwrap().clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn create_mock_app(state: MockBackendState) -> Router {
    Router::new()
        .route("/api/login/", post(login))
        .route("/api/me/", get(me))
        .with_state(state)
}

fn reply(response: &Mutex<(u16, Value)>) -> (StatusCode, Json<Value>) {
    let (status, body) = response.lock().unwrap().clone();
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(body),
    )
}

async fn login(
    State(state): State<MockBackendState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_requests.lock().unwrap().push(body);
    reply(&state.login_response)
}

async fn me(State(state): State<MockBackendState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state
            .me_authorizations
            .lock()
            .unwrap()
            .push(value.to_string());
    }
    reply(&state.me_response)
}
