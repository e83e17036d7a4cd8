use dermadetect_core::models::enrichment::EnrichmentData;
use dermadetect_core::models::risk::RiskLevel;
use uuid::Uuid;

use crate::error::TriageError;

/// Proof that the patient consented to imaging. A triage session can only
/// be started from one.
#[derive(Debug, Clone)]
pub struct Consent {
    patient_id: String,
    given_at: jiff::Timestamp,
}

impl Consent {
    pub fn record(patient_id: &str) -> Result<Self, TriageError> {
        let patient_id = patient_id.trim();
        if patient_id.is_empty() {
            return Err(TriageError::MissingPatientId);
        }
        Ok(Self {
            patient_id: patient_id.to_string(),
            given_at: jiff::Timestamp::now(),
        })
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn given_at(&self) -> jiff::Timestamp {
        self.given_at
    }
}

/// Ephemeral state of one capture-and-triage flow.
///
/// Nothing here is persisted locally; abandoning the flow simply drops it.
#[derive(Debug, Clone)]
pub struct TriageSession {
    id: Uuid,
    patient_id: String,
    started_at: jiff::Timestamp,
    images: Vec<String>,
    risk_level: Option<RiskLevel>,
    enrichment: Option<EnrichmentData>,
}

impl TriageSession {
    pub fn begin(consent: Consent) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id: consent.patient_id,
            started_at: jiff::Timestamp::now(),
            images: Vec::new(),
            risk_level: None,
            enrichment: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn started_at(&self) -> jiff::Timestamp {
        self.started_at
    }

    /// Captured image URIs in capture order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_level
    }

    pub fn enrichment(&self) -> Option<&EnrichmentData> {
        self.enrichment.as_ref()
    }

    pub(crate) fn add_image(&mut self, uri: String) {
        self.images.push(uri);
    }

    pub(crate) fn remove_image(&mut self, index: usize) -> Result<String, TriageError> {
        if index >= self.images.len() {
            return Err(TriageError::ImageIndex {
                index,
                len: self.images.len(),
            });
        }
        Ok(self.images.remove(index))
    }

    /// Set the risk level. It can only be assigned once.
    pub(crate) fn assign_risk(&mut self, level: RiskLevel) -> Result<(), TriageError> {
        if let Some(existing) = self.risk_level {
            return Err(TriageError::RiskAlreadyAssigned(existing));
        }
        self.risk_level = Some(level);
        Ok(())
    }

    pub(crate) fn set_enrichment(&mut self, data: EnrichmentData) -> Result<(), TriageError> {
        match self.risk_level {
            Some(level) if level.requires_enrichment() => {
                self.enrichment = Some(data);
                Ok(())
            }
            Some(level) => Err(TriageError::EnrichmentNotApplicable(level)),
            None => Err(TriageError::NotClassified),
        }
    }
}
