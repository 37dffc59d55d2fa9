#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};

use portfolio_frontend::api::ApiClient;
use portfolio_frontend::config::FrontendConfig;
use portfolio_frontend::routes::AppState;
use portfolio_frontend::store::MemoryStore;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<HashMap<String, (u16, Value)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Stand-in for the portfolio API: canned responses keyed by `"METHOD /path"`,
/// with every request recorded. Unknown routes answer 404.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
}

async fn record(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    };
    let key = format!("{} {}", recorded.method, recorded.path);
    state.requests.lock().unwrap().push(recorded);

    let canned = state.responses.lock().unwrap().get(&key).cloned();
    match canned {
        Some((status, value)) => {
            let status = StatusCode::from_u16(status).unwrap();
            if value.is_null() {
                (status, Body::empty()).into_response()
            } else {
                (status, Json(value)).into_response()
            }
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Registers a response for `method` on the API path (without the `/api` prefix).
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(format!("{} /api{}", method, path), (status, body));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        let full = format!("/api{}", path);
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == full)
            .collect()
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> FrontendConfig {
        FrontendConfig {
            api_url: self.origin(),
            environment: "test".to_string(),
            revalidate_secs: 3600,
            request_timeout_secs: Some(5),
            ..FrontendConfig::default()
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::from_config(&self.config()).unwrap()
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.client(), Arc::new(MemoryStore::new()), self.config())
    }
}

/// Collects a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
