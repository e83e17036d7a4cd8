//! dermadetect-app library root.
//!
//! Everything the mobile shell needs around the triage core: configuration,
//! device storage, the signed-in context, and the doctor review helpers.
//! Exposed as a library so examples and integration tests can drive it
//! without a UI.

pub mod config;
pub mod context;
pub mod review;
pub mod storage;
pub mod telemetry;
