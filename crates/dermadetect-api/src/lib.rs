//! dermadetect-api
//!
//! Client for the DermaDetect REST API, plus the adapters that let the
//! triage flow persist cases and request remote risk analysis through it.

pub mod analysis;
pub mod client;
pub mod error;
pub mod gateway;
