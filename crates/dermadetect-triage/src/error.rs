use dermadetect_core::error::CoreError;
use dermadetect_core::models::risk::RiskLevel;
use thiserror::Error;

use crate::flow::TriageState;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("patient id is required before capture starts")]
    MissingPatientId,

    #[error("at least one photo is required before classification")]
    NoImages,

    #[error("image index {index} out of range ({len} captured)")]
    ImageIndex { index: usize, len: usize },

    #[error("risk level already assigned: {0}")]
    RiskAlreadyAssigned(RiskLevel),

    #[error("session has not been classified")]
    NotClassified,

    #[error("enrichment does not apply to {0} risk cases")]
    EnrichmentNotApplicable(RiskLevel),

    #[error("high risk case is missing enrichment data")]
    MissingEnrichment,

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: TriageState,
        action: &'static str,
    },

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("case persistence failed: {0}")]
    Persistence(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
