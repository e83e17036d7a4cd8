//! Risk classification.
//!
//! Two interchangeable variants implement [`RiskAnalyzer`]: the local
//! image-count rule below, and a remote analysis call (in `dermadetect-api`).
//! Whatever the variant, an analyzer error is never surfaced: the flow
//! controller substitutes [`FALLBACK_RISK`] and logs the failure.

use std::future::Future;
use std::time::Duration;

use dermadetect_core::models::risk::RiskLevel;
use tracing::debug;
use uuid::Uuid;

use crate::error::TriageError;

/// Risk level used when an analyzer call fails.
pub const FALLBACK_RISK: RiskLevel = RiskLevel::Medium;

/// How long the local classifier pretends to analyze before answering.
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(2000);

/// Map the number of captured images to a risk bucket.
///
/// `1 → low`, `2 → medium`, `3+ → high`. Zero images cannot be classified.
pub fn classify(image_count: usize) -> Result<RiskLevel, TriageError> {
    match image_count {
        0 => Err(TriageError::NoImages),
        1 => Ok(RiskLevel::Low),
        2 => Ok(RiskLevel::Medium),
        _ => Ok(RiskLevel::High),
    }
}

/// Everything an analyzer may look at for one session.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub session_id: Uuid,
    pub patient_id: &'a str,
    pub images: &'a [String],
}

/// A source of risk classifications.
pub trait RiskAnalyzer {
    fn analyze(
        &self,
        request: &AnalysisRequest<'_>,
    ) -> impl Future<Output = Result<RiskLevel, TriageError>> + Send;
}

/// The local count-based rule, with an optional simulated processing delay.
#[derive(Debug, Clone, Copy)]
pub struct ImageCountClassifier {
    delay: Duration,
}

impl ImageCountClassifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No simulated delay.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for ImageCountClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

impl RiskAnalyzer for ImageCountClassifier {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<RiskLevel, TriageError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let level = classify(request.images.len())?;
        debug!(
            session_id = %request.session_id,
            images = request.images.len(),
            risk_level = %level,
            "classified by image count"
        );
        Ok(level)
    }
}
