use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::enrichment::EnrichmentPayload;
use super::patient::PatientRecord;
use super::risk::RiskLevel;
use crate::error::CoreError;
use crate::lenient;

/// Metadata blob describing one triage, JSON-encoded into
/// [`CasePayload::triage_data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriageData {
    pub timestamp: jiff::Timestamp,
    pub risk_level: RiskLevel,
    pub images_count: usize,
    /// Absent (not `null`) for low and medium risk cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_data: Option<EnrichmentPayload>,
}

/// Body of `POST /cases`.
///
/// `triage_data` and `image_urls` are JSON strings rather than nested
/// objects; the server stores them verbatim in text columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CasePayload {
    pub patient_id: String,
    pub triage_data: String,
    pub risk_level: RiskLevel,
    pub image_urls: String,
}

impl CasePayload {
    pub fn new(
        patient_id: &str,
        triage_data: &TriageData,
        images: &[String],
    ) -> Result<Self, CoreError> {
        Ok(Self {
            patient_id: patient_id.to_string(),
            triage_data: serde_json::to_string(triage_data)?,
            risk_level: triage_data.risk_level,
            image_urls: serde_json::to_string(images)?,
        })
    }

    /// Decode the embedded triage metadata.
    pub fn decode_triage_data(&self) -> Result<TriageData, CoreError> {
        Ok(serde_json::from_str(&self.triage_data)?)
    }

    pub fn decode_image_urls(&self) -> Result<Vec<String>, CoreError> {
        Ok(serde_json::from_str(&self.image_urls)?)
    }
}

/// Server-side case lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Triaged,
    PendingDiagnosis,
    RequiresMedgemma,
    Diagnosed,
    #[serde(other)]
    Unknown,
}

impl CaseStatus {
    /// Statuses that appear in a doctor's pending queue.
    pub fn awaits_diagnosis(&self) -> bool {
        matches!(
            self,
            CaseStatus::Triaged | CaseStatus::PendingDiagnosis | CaseStatus::RequiresMedgemma
        )
    }
}

/// A case as returned by the server.
///
/// The embedded JSON columns are parsed once here; malformed values become
/// `None` (or empty) and are logged rather than failing the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub chw_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::embedded")]
    pub triage_data: Option<TriageData>,
    #[serde(default, deserialize_with = "lenient::embedded")]
    pub ai_analysis: Option<serde_json::Value>,
    pub status: CaseStatus,
    /// `None` when the stored value is not a known level.
    #[serde(default, deserialize_with = "lenient::risk_level")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, deserialize_with = "lenient::embedded_list")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub sync_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<jiff::Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub patient: Option<PatientRecord>,
}

impl CaseRecord {
    pub fn patient_name(&self) -> String {
        self.patient
            .as_ref()
            .map(PatientRecord::display_name)
            .unwrap_or_else(|| super::patient::UNKNOWN_PATIENT.to_string())
    }
}
