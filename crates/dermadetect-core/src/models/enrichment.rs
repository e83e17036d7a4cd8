use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// How urgently a high-risk case should be seen, as judged by the CHW.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UrgencyLevel {
    Moderate,
    #[default]
    High,
    Severe,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Moderate => "moderate",
            UrgencyLevel::High => "high",
            UrgencyLevel::Severe => "severe",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moderate" => Ok(UrgencyLevel::Moderate),
            "high" => Ok(UrgencyLevel::High),
            "severe" => Ok(UrgencyLevel::Severe),
            other => Err(CoreError::InvalidUrgencyLevel(other.to_string())),
        }
    }
}

/// Supplementary data collected for high-risk cases only.
///
/// Symptom and characteristic selections are sets; an empty selection is a
/// valid submission. The default value is what the enrichment form opens with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EnrichmentData {
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    #[serde(default)]
    pub lesion_characteristics: BTreeSet<String>,
    #[serde(default)]
    pub urgency_level: UrgencyLevel,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub additional_images: Vec<String>,
}

impl EnrichmentData {
    /// Select the symptom if absent, deselect it if present.
    pub fn toggle_symptom(&mut self, symptom: &str) {
        toggle(&mut self.symptoms, symptom);
    }

    pub fn toggle_characteristic(&mut self, characteristic: &str) {
        toggle(&mut self.lesion_characteristics, characteristic);
    }

    /// The shape embedded in a case's `triage_data` blob.
    pub fn to_payload(&self) -> EnrichmentPayload {
        EnrichmentPayload {
            symptoms: self.symptoms.iter().cloned().collect(),
            lesion_characteristics: self.lesion_characteristics.iter().cloned().collect(),
            urgency_level: self.urgency_level,
            notes: self.notes.clone(),
            additional_images_count: self.additional_images.len(),
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Enrichment as it travels inside `triage_data.enrichment_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EnrichmentPayload {
    pub symptoms: Vec<String>,
    pub lesion_characteristics: Vec<String>,
    pub urgency_level: UrgencyLevel,
    pub notes: String,
    pub additional_images_count: usize,
}
