//! The triage flow controller.
//!
//! After capture and classification, a case either goes straight to the
//! server (low and medium risk) or walks the high-risk referral wizard:
//!
//! ```text
//! AwaitingPermission ─denied─▶ PermissionDenied ─ack─▶ Abandoned
//!        │ granted
//!        ▼
//!    Capturing ─classify─▶ Classified ─proceed(low/medium)─▶ Persisted | PersistFailed
//!                              │ proceed(high)
//!                              ▼
//!                         AlertShown ─ack─▶ EnrichmentOpen ◀─edit─┐
//!                                               │ submit          │
//!                                               ▼                 │
//!                                        ConfirmationOpen ────────┘
//!                                               │ confirm
//!                                               ▼
//!                                     Persisted | PersistFailed
//! ```
//!
//! Any non-terminal state can be cancelled into `Abandoned`. At most one
//! sheet is visible at a time and it is derived from the state alone.
//!
//! Every event method takes `&mut self`, so while classification or
//! persistence is awaited no other event can reach the controller. The view
//! keeps a [`ProcessingIndicator`] to show that it is busy.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dermadetect_core::models::enrichment::EnrichmentData;
use dermadetect_core::models::risk::RiskLevel;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::classifier::{AnalysisRequest, FALLBACK_RISK, RiskAnalyzer};
use crate::error::TriageError;
use crate::gateway::CaseGateway;
use crate::payload;
use crate::session::{Consent, TriageSession};

/// Number of photos after which the capture screen advances to results.
pub const RECOMMENDED_IMAGE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageState {
    AwaitingPermission,
    PermissionDenied,
    Capturing,
    Classified,
    AlertShown,
    EnrichmentOpen,
    ConfirmationOpen,
    Persisted,
    PersistFailed,
    Abandoned,
}

impl TriageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageState::AwaitingPermission => "awaiting_permission",
            TriageState::PermissionDenied => "permission_denied",
            TriageState::Capturing => "capturing",
            TriageState::Classified => "classified",
            TriageState::AlertShown => "alert_shown",
            TriageState::EnrichmentOpen => "enrichment_open",
            TriageState::ConfirmationOpen => "confirmation_open",
            TriageState::Persisted => "persisted",
            TriageState::PersistFailed => "persist_failed",
            TriageState::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TriageState::Persisted | TriageState::PersistFailed | TriageState::Abandoned
        )
    }
}

impl fmt::Display for TriageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled message with a single acknowledgement action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn camera_permission_required() -> Self {
        Self {
            title: "Camera Permission Required".to_string(),
            message: "Camera access is required to capture skin lesions for analysis."
                .to_string(),
        }
    }

    pub fn case_submitted() -> Self {
        Self {
            title: "Case Submitted Successfully".to_string(),
            message: "Your high-risk case has been submitted for detailed assessment. \
                      The doctor will be notified once analysis is complete."
                .to_string(),
        }
    }
}

/// The modal sheet currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "sheet", rename_all = "snake_case")]
pub enum Sheet {
    PermissionAlert { notice: Notice },
    /// Blocking high-risk interstitial; its only action is "proceed".
    TriageAlert,
    /// Enrichment form, pre-filled with these values.
    Enrichment { form: EnrichmentData },
    /// Read-only summary with "edit" and "confirm" actions.
    Confirmation { enrichment: EnrichmentData },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// Pop back to the screen that opened the capture flow.
    Back,
    /// Reset the stack to the CHW home list.
    ReturnHome,
}

/// What the view layer should do after an event has been handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Nothing to navigate; re-render from the controller state.
    Stay,
    Present { sheet: Sheet },
    Navigate { to: Navigation },
    /// Show a notice; acknowledging it navigates.
    Notify { notice: Notice, then: Navigation },
}

/// Capture progress toward [`RECOMMENDED_IMAGE_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureProgress {
    pub captured: usize,
    pub recommended: usize,
    pub ready_for_results: bool,
}

impl CaptureProgress {
    fn of(captured: usize) -> Self {
        Self {
            captured,
            recommended: RECOMMENDED_IMAGE_COUNT,
            ready_for_results: captured >= RECOMMENDED_IMAGE_COUNT,
        }
    }

    pub fn message(&self) -> String {
        if self.ready_for_results {
            return format!("{} photos captured.", self.captured);
        }
        format!(
            "Photo {} of {} captured. Take {} more for best results.",
            self.captured,
            self.recommended,
            self.recommended - self.captured,
        )
    }
}

/// Shared view of whether the controller is awaiting classification or
/// persistence. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct ProcessingIndicator(Arc<AtomicBool>);

impl ProcessingIndicator {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag until the returned guard is dropped.
    fn begin(&self) -> ProcessingGuard {
        self.0.store(true, Ordering::Release);
        ProcessingGuard(Arc::clone(&self.0))
    }
}

/// Clears the flag on drop, including when the awaiting future is dropped.
struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one [`TriageSession`] from camera permission to persistence.
pub struct TriageController<A, G> {
    session: TriageSession,
    state: TriageState,
    analyzer: A,
    gateway: G,
    /// Values the enrichment form shows while it is open.
    form: EnrichmentData,
    trail: Vec<TriageState>,
    processing: ProcessingIndicator,
}

impl<A, G> TriageController<A, G>
where
    A: RiskAnalyzer,
    G: CaseGateway,
{
    pub fn new(consent: Consent, analyzer: A, gateway: G) -> Self {
        let session = TriageSession::begin(consent);
        info!(
            session_id = %session.id(),
            patient_id = session.patient_id(),
            "triage session started"
        );
        Self {
            session,
            state: TriageState::AwaitingPermission,
            analyzer,
            gateway,
            form: EnrichmentData::default(),
            trail: vec![TriageState::AwaitingPermission],
            processing: ProcessingIndicator::default(),
        }
    }

    pub fn state(&self) -> TriageState {
        self.state
    }

    pub fn session(&self) -> &TriageSession {
        &self.session
    }

    /// Every state the controller has been in, in order.
    pub fn trail(&self) -> &[TriageState] {
        &self.trail
    }

    /// A handle the view can poll while an event is being awaited.
    pub fn processing(&self) -> ProcessingIndicator {
        self.processing.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_active()
    }

    pub fn has_visited(&self, state: TriageState) -> bool {
        self.trail.contains(&state)
    }

    pub fn visible_sheet(&self) -> Option<Sheet> {
        match self.state {
            TriageState::PermissionDenied => Some(Sheet::PermissionAlert {
                notice: Notice::camera_permission_required(),
            }),
            TriageState::AlertShown => Some(Sheet::TriageAlert),
            TriageState::EnrichmentOpen => Some(Sheet::Enrichment {
                form: self.form.clone(),
            }),
            TriageState::ConfirmationOpen => {
                self.session
                    .enrichment()
                    .cloned()
                    .map(|enrichment| Sheet::Confirmation { enrichment })
            }
            _ => None,
        }
    }

    // ── Capture ──────────────────────────────────────────────────────────

    pub fn on_camera_permission(&mut self, granted: bool) -> Result<Effect, TriageError> {
        self.expect(TriageState::AwaitingPermission, "resolve camera permission")?;
        if granted {
            self.enter(TriageState::Capturing);
            return Ok(Effect::Stay);
        }
        warn!(session_id = %self.session.id(), "camera permission denied");
        self.enter(TriageState::PermissionDenied);
        Ok(Effect::Present {
            sheet: Sheet::PermissionAlert {
                notice: Notice::camera_permission_required(),
            },
        })
    }

    /// The permission alert's only action leaves the flow.
    pub fn acknowledge_permission_alert(&mut self) -> Result<Effect, TriageError> {
        self.expect(TriageState::PermissionDenied, "acknowledge permission alert")?;
        self.enter(TriageState::Abandoned);
        Ok(Effect::Navigate {
            to: Navigation::Back,
        })
    }

    pub fn capture(&mut self, uri: impl Into<String>) -> Result<CaptureProgress, TriageError> {
        self.expect(TriageState::Capturing, "capture")?;
        self.session.add_image(uri.into());
        Ok(CaptureProgress::of(self.session.images().len()))
    }

    pub fn remove_image(&mut self, index: usize) -> Result<CaptureProgress, TriageError> {
        self.expect(TriageState::Capturing, "remove image")?;
        self.session.remove_image(index)?;
        Ok(CaptureProgress::of(self.session.images().len()))
    }

    // ── Classification ───────────────────────────────────────────────────

    /// Run the analyzer once. An analyzer failure is logged and replaced by
    /// [`FALLBACK_RISK`]; it never aborts the flow.
    pub async fn classify(&mut self) -> Result<RiskLevel, TriageError> {
        self.expect(TriageState::Capturing, "classify")?;
        if self.session.images().is_empty() {
            return Err(TriageError::NoImages);
        }

        let request = AnalysisRequest {
            session_id: self.session.id(),
            patient_id: self.session.patient_id(),
            images: self.session.images(),
        };
        let busy = self.processing.begin();
        let analyzed = self.analyzer.analyze(&request).await;
        drop(busy);
        let level = match analyzed {
            Ok(level) => level,
            Err(e) => {
                warn!(
                    session_id = %self.session.id(),
                    error = %e,
                    fallback = %FALLBACK_RISK,
                    "risk analysis failed, using fallback"
                );
                FALLBACK_RISK
            }
        };

        self.session.assign_risk(level)?;
        self.enter(TriageState::Classified);
        info!(
            session_id = %self.session.id(),
            risk_level = %level,
            images = self.session.images().len(),
            "session classified"
        );
        Ok(level)
    }

    /// Continue from the result screen.
    ///
    /// Low and medium cases are persisted right away and the flow returns
    /// home whether or not the call succeeded. High cases open the alert.
    pub async fn proceed(&mut self) -> Result<Effect, TriageError> {
        self.expect(TriageState::Classified, "proceed")?;
        let level = self.session.risk_level().ok_or(TriageError::NotClassified)?;

        if level.requires_enrichment() {
            self.enter(TriageState::AlertShown);
            return Ok(Effect::Present {
                sheet: Sheet::TriageAlert,
            });
        }

        self.persist().await;
        Ok(Effect::Navigate {
            to: Navigation::ReturnHome,
        })
    }

    // ── High-risk wizard ─────────────────────────────────────────────────

    pub fn acknowledge_alert(&mut self) -> Result<Effect, TriageError> {
        self.expect(TriageState::AlertShown, "acknowledge alert")?;
        self.form = self.session.enrichment().cloned().unwrap_or_default();
        self.enter(TriageState::EnrichmentOpen);
        Ok(Effect::Present {
            sheet: Sheet::Enrichment {
                form: self.form.clone(),
            },
        })
    }

    /// Attach an extra photo from the enrichment form.
    pub fn add_enrichment_photo(
        &mut self,
        uri: impl Into<String>,
    ) -> Result<&EnrichmentData, TriageError> {
        self.expect(TriageState::EnrichmentOpen, "add enrichment photo")?;
        self.form.additional_images.push(uri.into());
        Ok(&self.form)
    }

    /// Accept the form as submitted. Empty selections are valid.
    pub fn submit_enrichment(&mut self, data: EnrichmentData) -> Result<Effect, TriageError> {
        self.expect(TriageState::EnrichmentOpen, "submit enrichment")?;
        self.session.set_enrichment(data.clone())?;
        self.form = data.clone();
        self.enter(TriageState::ConfirmationOpen);
        Ok(Effect::Present {
            sheet: Sheet::Confirmation { enrichment: data },
        })
    }

    /// Reopen the form with the previously submitted values.
    pub fn edit(&mut self) -> Result<Effect, TriageError> {
        self.expect(TriageState::ConfirmationOpen, "edit enrichment")?;
        self.form = self.session.enrichment().cloned().unwrap_or_default();
        self.enter(TriageState::EnrichmentOpen);
        Ok(Effect::Present {
            sheet: Sheet::Enrichment {
                form: self.form.clone(),
            },
        })
    }

    /// Persist the enriched case. On success a notice precedes the return
    /// home; on failure the sheet is dismissed and the flow returns home
    /// without a retry.
    pub async fn confirm(&mut self) -> Result<Effect, TriageError> {
        self.expect(TriageState::ConfirmationOpen, "confirm")?;
        if self.persist().await {
            Ok(Effect::Notify {
                notice: Notice::case_submitted(),
                then: Navigation::ReturnHome,
            })
        } else {
            Ok(Effect::Navigate {
                to: Navigation::ReturnHome,
            })
        }
    }

    // ── Exit ─────────────────────────────────────────────────────────────

    /// Abandon the flow. Nothing has been sent, so nothing is undone.
    pub fn cancel(&mut self) -> Result<Effect, TriageError> {
        if self.state.is_terminal() {
            return Err(TriageError::InvalidTransition {
                state: self.state,
                action: "cancel",
            });
        }
        info!(session_id = %self.session.id(), state = %self.state, "triage abandoned");
        self.enter(TriageState::Abandoned);
        Ok(Effect::Navigate {
            to: Navigation::Back,
        })
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Assemble and send the case exactly once. Returns whether the
    /// gateway accepted it; failures are logged, never raised.
    async fn persist(&mut self) -> bool {
        let session_id = self.session.id();
        let payload = match payload::assemble(&self.session, jiff::Timestamp::now()) {
            Ok(payload) => payload,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "failed to assemble case payload");
                self.enter(TriageState::PersistFailed);
                return false;
            }
        };

        let busy = self.processing.begin();
        let persisted = self.gateway.persist_case(&payload).await;
        drop(busy);
        match persisted {
            Ok(()) => {
                info!(
                    session_id = %session_id,
                    risk_level = %payload.risk_level,
                    "case persisted"
                );
                self.enter(TriageState::Persisted);
                true
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "failed to save case");
                self.enter(TriageState::PersistFailed);
                false
            }
        }
    }

    fn expect(&self, state: TriageState, action: &'static str) -> Result<(), TriageError> {
        if self.state == state {
            Ok(())
        } else {
            Err(TriageError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    fn enter(&mut self, next: TriageState) {
        tracing::debug!(
            session_id = %self.session.id(),
            from = %self.state,
            to = %next,
            "triage transition"
        );
        self.state = next;
        self.trail.push(next);
    }
}
