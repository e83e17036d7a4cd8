//! Doctor review: the pending queue and diagnosis submission.

use dermadetect_api::client::ApiClient;
use dermadetect_core::models::case::CaseRecord;
use dermadetect_core::models::diagnosis::{DiagnosisRecord, DiagnosisRequest};
use dermadetect_core::models::risk::RiskLevel;
use tracing::info;

/// Cases awaiting a diagnosis, as the server reports them.
pub async fn pending_cases(client: &ApiClient) -> eyre::Result<Vec<CaseRecord>> {
    let cases = client.run(|client| client.pending_cases()).await?;
    info!(count = cases.len(), "loaded pending cases");
    Ok(cases)
}

/// Case-insensitive substring match on the patient's display name, with an
/// optional risk-level filter. A blank query matches everything.
pub fn filter_cases<'a>(
    cases: &'a [CaseRecord],
    query: &str,
    risk: Option<RiskLevel>,
) -> Vec<&'a CaseRecord> {
    let query = query.trim().to_lowercase();
    cases
        .iter()
        .filter(|case| risk.is_none_or(|level| case.risk_level == Some(level)))
        .filter(|case| query.is_empty() || case.patient_name().to_lowercase().contains(&query))
        .collect()
}

/// Validate and send a diagnosis. A blank diagnosis is rejected before any
/// request is made; a blank prescription is sent as `null`.
pub async fn submit_diagnosis(
    client: &ApiClient,
    case_id: &str,
    diagnosis: &str,
    prescription: &str,
) -> eyre::Result<DiagnosisRecord> {
    let request = DiagnosisRequest::new(diagnosis, prescription)?;
    let case_id = case_id.to_string();
    let record = client
        .run(move |client| client.create_diagnosis(&case_id, &request))
        .await?;
    info!(case_id = %record.case_id, diagnosis_id = %record.id, "diagnosis submitted");
    Ok(record)
}
