//! dermadetect-triage
//!
//! Risk classification and the post-capture triage flow: the state machine
//! that decides whether a case is persisted immediately or routed through
//! the high-risk alert, enrichment and confirmation steps.
//!
//! Network access is abstracted behind [`classifier::RiskAnalyzer`] and
//! [`gateway::CaseGateway`]; this crate has no HTTP dependency.

pub mod classifier;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod payload;
pub mod session;
