use dermadetect_core::models::case::CasePayload;
use dermadetect_triage::error::TriageError;
use dermadetect_triage::gateway::CaseGateway;

use crate::client::ApiClient;

impl CaseGateway for ApiClient {
    async fn persist_case(&self, payload: &CasePayload) -> Result<(), TriageError> {
        let payload = payload.clone();
        self.run(move |client| client.submit_case(&payload))
            .await
            .map_err(|e| TriageError::Persistence(e.to_string()))
    }
}
