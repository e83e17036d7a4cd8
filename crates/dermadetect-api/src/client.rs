//! Blocking HTTP client for the DermaDetect REST API.
//!
//! Every request carries `Content-Type: application/json` and, once a token
//! has been set, `Authorization: Bearer <token>`. Non-2xx responses become
//! [`ApiError::Status`] with the response body attached. Nothing is retried.
//!
//! Async callers go through [`ApiClient::run`], which moves a clone of the
//! client onto tokio's blocking pool.

use dermadetect_core::endpoints;
use dermadetect_core::models::case::{CasePayload, CaseRecord};
use dermadetect_core::models::diagnosis::{DiagnosisRecord, DiagnosisRequest};
use dermadetect_core::models::patient::{NewPatient, PatientRecord};
use dermadetect_core::models::sync::{SyncEnvelope, SyncResponse};
use dermadetect_core::models::user::{LoginRequest, LoginResponse, Profile, Role};
use dermadetect_core::models::vitals::{VitalsInput, VitalsRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::error::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let config = Agent::config_builder().http_status_as_error(false).build();
        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Run a blocking call on tokio's blocking pool with a clone of this
    /// client.
    pub async fn run<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: FnOnce(ApiClient) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.clone();
        tokio::task::spawn_blocking(move || call(client))
            .await
            .map_err(|e| ApiError::Join(e.to_string()))?
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    /// Exchange credentials for an access token. The token is returned,
    /// not installed; the caller decides where it lives.
    pub fn login(&self, email: &str, password: &str, role: Role) -> Result<LoginResponse, ApiError> {
        info!(email, ?role, "logging in");
        let request = LoginRequest {
            email,
            password,
            role,
        };
        self.post(endpoints::LOGIN, &request)
    }

    pub fn current_user(&self) -> Result<Profile, ApiError> {
        self.get(endpoints::ME)
    }

    // ── Patients ─────────────────────────────────────────────────────────

    pub fn list_patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
        self.get(endpoints::PATIENTS)
    }

    pub fn get_patient(&self, patient_id: &str) -> Result<PatientRecord, ApiError> {
        self.get(&endpoints::patient(patient_id))
    }

    pub fn create_patient(&self, patient: NewPatient) -> Result<PatientRecord, ApiError> {
        let request = patient.into_request()?;
        self.post(endpoints::PATIENTS, &request)
    }

    pub fn list_vitals(&self, patient_id: &str) -> Result<Vec<VitalsRecord>, ApiError> {
        self.get(&endpoints::patient_vitals(patient_id))
    }

    pub fn create_vitals(
        &self,
        patient_id: &str,
        vitals: &VitalsInput,
    ) -> Result<VitalsRecord, ApiError> {
        vitals.validate()?;
        self.post(&endpoints::patient_vitals(patient_id), vitals)
    }

    // ── Cases ────────────────────────────────────────────────────────────

    pub fn create_case(&self, payload: &CasePayload) -> Result<CaseRecord, ApiError> {
        self.post(endpoints::CASES, payload)
    }

    /// Send a case and ignore the response body. Any 2xx is success.
    pub fn submit_case(&self, payload: &CasePayload) -> Result<(), ApiError> {
        self.post_raw(endpoints::CASES, payload).map(|_| ())
    }

    pub fn list_cases(&self) -> Result<Vec<CaseRecord>, ApiError> {
        self.get(endpoints::CASES)
    }

    pub fn get_case(&self, case_id: &str) -> Result<CaseRecord, ApiError> {
        self.get(&endpoints::case(case_id))
    }

    /// High-risk cases waiting for a doctor.
    pub fn pending_cases(&self) -> Result<Vec<CaseRecord>, ApiError> {
        self.get(endpoints::PENDING_CASES)
    }

    pub fn create_diagnosis(
        &self,
        case_id: &str,
        diagnosis: &DiagnosisRequest,
    ) -> Result<DiagnosisRecord, ApiError> {
        self.post(&endpoints::case_diagnosis(case_id), diagnosis)
    }

    // ── Sync ─────────────────────────────────────────────────────────────

    pub fn sync(&self, envelope: &SyncEnvelope) -> Result<SyncResponse, ApiError> {
        self.post(endpoints::SYNC, envelope)
    }

    // ── Transport ────────────────────────────────────────────────────────

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = endpoints::join(&self.base_url, path);
        debug!(%url, "GET");

        let mut request = self
            .agent
            .get(&url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.call()?;
        let text = read_success(response, path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub(crate) fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.post_raw(path, body)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn post_raw<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let url = endpoints::join(&self.base_url, path);
        let body = serde_json::to_string(body)?;
        debug!(%url, bytes = body.len(), "POST");

        let mut request = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send(body)?;
        read_success(response, path)
    }
}

/// Return the body of a 2xx response, or the status and body as an error.
fn read_success(
    mut response: ureq::http::Response<ureq::Body>,
    path: &str,
) -> Result<String, ApiError> {
    let status = response.status();
    let text = response.body_mut().read_to_string()?;
    if status.is_success() {
        return Ok(text);
    }
    warn!(path, status = status.as_u16(), "API request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        body: text,
    })
}
