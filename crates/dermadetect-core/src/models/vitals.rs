use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::lenient;

/// Body of `POST /patients/{id}/vitals`. Readings are free text as typed
/// by the CHW (e.g. `"120/80"`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VitalsInput {
    pub temperature: String,
    pub blood_pressure: String,
    pub weight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VitalsInput {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("temperature", &self.temperature),
            ("blood_pressure", &self.blood_pressure),
            ("weight", &self.weight),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::MissingField(name.to_string()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VitalsRecord {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub chw_id: Option<String>,
    pub temperature: String,
    pub blood_pressure: String,
    pub weight: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified_at: Option<jiff::Timestamp>,
}
