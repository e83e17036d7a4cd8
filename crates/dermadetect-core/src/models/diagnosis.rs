use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Body of `POST /cases/{id}/diagnosis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisRequest {
    pub diagnosis_text: String,
    pub prescription: Option<String>,
}

impl DiagnosisRequest {
    /// Trim the doctor's input. The diagnosis is required; a blank
    /// prescription is sent as `null`.
    pub fn new(diagnosis: &str, prescription: &str) -> Result<Self, CoreError> {
        let diagnosis_text = diagnosis.trim();
        if diagnosis_text.is_empty() {
            return Err(CoreError::MissingField("diagnosis_text".to_string()));
        }
        let prescription = prescription.trim();
        Ok(Self {
            diagnosis_text: diagnosis_text.to_string(),
            prescription: (!prescription.is_empty()).then(|| prescription.to_string()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosisRecord {
    pub id: String,
    pub case_id: String,
    pub doctor_id: String,
    pub diagnosis_text: String,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub sync_status: Option<String>,
}
