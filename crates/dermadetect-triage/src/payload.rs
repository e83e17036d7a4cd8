//! Assembly of the `POST /cases` body from a classified session.

use dermadetect_core::models::case::{CasePayload, TriageData};

use crate::error::TriageError;
use crate::session::TriageSession;

/// Build the case payload for `session` stamped with `timestamp`.
///
/// Low and medium sessions carry no enrichment; a high session must have
/// its enrichment set before it can be assembled.
pub fn assemble(
    session: &TriageSession,
    timestamp: jiff::Timestamp,
) -> Result<CasePayload, TriageError> {
    let risk_level = session.risk_level().ok_or(TriageError::NotClassified)?;

    let enrichment_data = if risk_level.requires_enrichment() {
        let enrichment = session.enrichment().ok_or(TriageError::MissingEnrichment)?;
        Some(enrichment.to_payload())
    } else {
        None
    };

    let triage_data = TriageData {
        timestamp,
        risk_level,
        images_count: session.images().len(),
        enrichment_data,
    };

    Ok(CasePayload::new(
        session.patient_id(),
        &triage_data,
        session.images(),
    )?)
}
