#![allow(dead_code)]

use std::sync::{Arc, Mutex, OnceLock};

use dermadetect_core::models::case::CasePayload;
use dermadetect_core::models::risk::RiskLevel;
use dermadetect_triage::classifier::{
    AnalysisRequest, ImageCountClassifier, RiskAnalyzer, classify,
};
use dermadetect_triage::error::TriageError;
use dermadetect_triage::flow::{ProcessingIndicator, TriageController};
use dermadetect_triage::gateway::CaseGateway;
use dermadetect_triage::session::Consent;

/// Records every payload it receives; optionally rejects them all.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub sent: Arc<Mutex<Vec<CasePayload>>>,
    pub fail: bool,
}

impl RecordingGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<CasePayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl CaseGateway for RecordingGateway {
    async fn persist_case(&self, payload: &CasePayload) -> Result<(), TriageError> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail {
            Err(TriageError::Persistence("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Always fails, as an unreachable analysis endpoint would.
pub struct UnreachableAnalyzer;

impl RiskAnalyzer for UnreachableAnalyzer {
    async fn analyze(&self, _request: &AnalysisRequest<'_>) -> Result<RiskLevel, TriageError> {
        Err(TriageError::Analysis("network unreachable".to_string()))
    }
}

pub fn controller(
    gateway: RecordingGateway,
) -> TriageController<ImageCountClassifier, RecordingGateway> {
    let consent = Consent::record("patient-42").unwrap();
    TriageController::new(consent, ImageCountClassifier::immediate(), gateway)
}

/// A controller with permission granted and `n` images captured.
pub fn captured(
    n: usize,
    gateway: RecordingGateway,
) -> TriageController<ImageCountClassifier, RecordingGateway> {
    let mut flow = controller(gateway);
    flow.on_camera_permission(true).unwrap();
    for i in 0..n {
        flow.capture(format!("file:///photos/{i}.jpg")).unwrap();
    }
    flow
}

/// Analyzer and gateway that note whether the controller reported itself
/// busy while each call was in flight.
#[derive(Clone, Default)]
pub struct BusyObserver {
    pub indicator: Arc<OnceLock<ProcessingIndicator>>,
    pub seen: Arc<Mutex<Vec<(&'static str, bool)>>>,
}

impl BusyObserver {
    fn note(&self, call: &'static str) {
        let busy = self.indicator.get().is_some_and(ProcessingIndicator::is_active);
        self.seen.lock().unwrap().push((call, busy));
    }

    pub fn seen(&self) -> Vec<(&'static str, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

impl RiskAnalyzer for BusyObserver {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<RiskLevel, TriageError> {
        self.note("analyze");
        classify(request.images.len())
    }
}

impl CaseGateway for BusyObserver {
    async fn persist_case(&self, _payload: &CasePayload) -> Result<(), TriageError> {
        self.note("persist");
        Ok(())
    }
}
