#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.all().pop().expect("no request recorded")
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<HashMap<(String, String), (u16, String)>>,
    recorder: Recorder,
}

/// Canned-response API server mounted under `/api`.
#[derive(Default)]
pub struct MockApi {
    routes: HashMap<(String, String), (u16, String)>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.respond_raw(method, path, status, &body.to_string())
    }

    pub fn respond_raw(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Bind to an ephemeral port and return the API base URL.
    pub async fn start(self) -> (String, Recorder) {
        let recorder = Recorder::default();
        let state = MockState {
            routes: Arc::new(self.routes),
            recorder: recorder.clone(),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/api"), recorder)
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = (!body.is_empty())
        .then(|| serde_json::from_slice(&body).ok())
        .flatten();

    state.recorder.0.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        authorization,
        body,
    });

    match state.routes.get(&(method.to_string(), path)) {
        Some((status, text)) => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            text.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#).into_response(),
    }
}

/// A base URL nothing is listening on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

pub fn case_json(id: &str, risk: &str) -> Value {
    serde_json::json!({
        "id": id,
        "patient_id": "patient-42",
        "chw_id": "chw-1",
        "triage_data": format!(r#"{{"timestamp":"2025-03-01T09:30:00Z","risk_level":"{risk}","images_count":1}}"#),
        "ai_analysis": null,
        "status": "TRIAGED",
        "risk_level": risk,
        "image_urls": r#"["file:///photos/0.jpg"]"#,
        "sync_status": "synced",
        "created_at": "2025-03-01T09:30:01",
        "last_modified_at": "2025-03-01T09:30:01"
    })
}
