use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::lenient;

/// Placeholder shown when a patient's demographics are missing or malformed.
pub const UNKNOWN_PATIENT: &str = "Unknown Patient";

/// Patient demographics.
///
/// Older records carry a single `name`; newer ones split first and last name.
/// Both camelCase and snake_case keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Demographics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, alias = "contactInfo", skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
}

impl Demographics {
    pub fn full_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return Some(name.to_string());
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    }

    /// Age in whole calendar years between the year of birth and `today`.
    pub fn age_on(&self, today: jiff::civil::Date) -> Option<i16> {
        let dob: jiff::civil::Date = self.dob.as_deref()?.trim().parse().ok()?;
        Some(today.year() - dob.year())
    }
}

/// A patient as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::embedded")]
    pub demographics: Option<Demographics>,
    #[serde(default)]
    pub chw_id: Option<String>,
    #[serde(default)]
    pub sync_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified_at: Option<jiff::Timestamp>,
}

impl PatientRecord {
    pub fn display_name(&self) -> String {
        self.demographics
            .as_ref()
            .and_then(Demographics::full_name)
            .unwrap_or_else(|| UNKNOWN_PATIENT.to_string())
    }
}

/// Registration form for a new patient. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub dob: jiff::civil::Date,
    pub gender: String,
    pub contact_info: String,
}

/// Body of `POST /patients`; the server keeps demographics as a JSON string.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePatientRequest {
    pub demographics: String,
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("gender", &self.gender),
            ("contact_info", &self.contact_info),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CoreError::MissingField(name.to_string()));
            }
        }
        Ok(())
    }

    pub fn into_request(self) -> Result<CreatePatientRequest, CoreError> {
        self.validate()?;
        let demographics = Demographics {
            name: None,
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            dob: Some(self.dob.to_string()),
            gender: Some(self.gender.trim().to_string()),
            contact_info: Some(self.contact_info.trim().to_string()),
        };
        Ok(CreatePatientRequest {
            demographics: serde_json::to_string(&demographics)?,
        })
    }
}
