//! Server-side risk analysis.
//!
//! Posts the captured images to the analysis endpoint and takes the
//! `risk_level` from the response. The request carries the local
//! image-count rule's answer as a preliminary level. Errors are returned as
//! [`TriageError::Analysis`]; the flow controller turns them into the
//! fallback level.

use dermadetect_core::endpoints;
use dermadetect_core::models::case::{CasePayload, TriageData};
use dermadetect_core::models::risk::RiskLevel;
use dermadetect_triage::classifier::{AnalysisRequest, RiskAnalyzer, classify};
use dermadetect_triage::error::TriageError;
use serde::Deserialize;
use tracing::info;

use crate::client::ApiClient;

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    risk_level: RiskLevel,
}

#[derive(Debug, Clone)]
pub struct RemoteAnalyzer {
    client: ApiClient,
    path: String,
}

impl RemoteAnalyzer {
    pub fn new(client: ApiClient) -> Self {
        Self::with_path(client, endpoints::DEFAULT_ANALYSIS)
    }

    pub fn with_path(client: ApiClient, path: &str) -> Self {
        Self {
            client,
            path: path.to_string(),
        }
    }
}

impl RiskAnalyzer for RemoteAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<RiskLevel, TriageError> {
        let preliminary = classify(request.images.len())?;
        let triage_data = TriageData {
            timestamp: jiff::Timestamp::now(),
            risk_level: preliminary,
            images_count: request.images.len(),
            enrichment_data: None,
        };
        let payload = CasePayload::new(request.patient_id, &triage_data, request.images)?;
        let path = self.path.clone();

        let response: AnalysisResponse = self
            .client
            .run(move |client| client.post(&path, &payload))
            .await
            .map_err(|e| TriageError::Analysis(e.to_string()))?;

        info!(
            session_id = %request.session_id,
            preliminary = %preliminary,
            risk_level = %response.risk_level,
            "remote analysis complete"
        );
        Ok(response.risk_level)
    }
}
