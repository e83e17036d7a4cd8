#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const TOKEN: &str = "tok-chw-1";

/// Requests that reached the server, as `(route, authorization)`.
#[derive(Clone, Default)]
pub struct Seen(pub Arc<Mutex<Vec<(String, Option<String>)>>>);

impl Seen {
    fn push(&self, route: &str, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.0.lock().unwrap().push((route.to_string(), auth));
    }

    pub fn all(&self) -> Vec<(String, Option<String>)> {
        self.0.lock().unwrap().clone()
    }
}

async fn login(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.push("login", &headers);
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect email or password" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": TOKEN,
            "token_type": "bearer",
            "user": { "id": "chw-1", "name": "Amina Yusuf", "role": body["role"] }
        })),
    )
}

async fn me(State(seen): State<Seen>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    seen.push("me", &headers);
    let expected = format!("Bearer {TOKEN}");
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": "chw-1",
            "name": "Amina Yusuf",
            "email": "amina@example.org",
            "role": "chw",
            "stats": { "patients": 4, "cases": 9, "this_week": 2 }
        })),
    )
}

async fn create_case(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.push("cases", &headers);
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "case-1",
            "patient_id": body["patient_id"],
            "status": "TRIAGED",
            "risk_level": body["risk_level"],
            "triage_data": body["triage_data"],
            "image_urls": body["image_urls"]
        })),
    )
}

async fn pending(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.push("pending", &headers);
    Json(json!([
        {
            "id": "case-1",
            "patient_id": "p-1",
            "status": "TRIAGED",
            "risk_level": "high",
            "patient": { "id": "p-1", "demographics": r#"{"firstName":"Amina","lastName":"Yusuf"}"# }
        },
        {
            "id": "case-2",
            "patient_id": "p-2",
            "status": "PENDING_DIAGNOSIS",
            "risk_level": "medium",
            "patient": { "id": "p-2", "demographics": { "name": "Kofi Mensah" } }
        },
        {
            "id": "case-3",
            "patient_id": "p-3",
            "status": "REQUIRES_MEDGEMMA",
            "risk_level": "high",
            "patient": { "id": "p-3", "demographics": "not json at all" }
        }
    ]))
}

async fn diagnose(
    State(seen): State<Seen>,
    Path(case_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.push("diagnosis", &headers);
    Json(json!({
        "id": "d-1",
        "case_id": case_id,
        "doctor_id": "doc-1",
        "diagnosis_text": body["diagnosis_text"],
        "prescription": body["prescription"]
    }))
}

async fn sync(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.push("sync", &headers);
    Json(json!({
        "new_sync_timestamp": "2025-03-01T10:00:00",
        "server_updates": { "patients": [] }
    }))
}

/// Serve a minimal DermaDetect API under `/api` and return its base URL.
pub async fn spawn_api() -> (String, Seen) {
    let seen = Seen::default();
    let api = Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/cases", post(create_case))
        .route("/cases/pending", get(pending))
        .route("/cases/{id}/diagnosis", post(diagnose))
        .route("/sync", post(sync))
        .with_state(seen.clone());
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), seen)
}
