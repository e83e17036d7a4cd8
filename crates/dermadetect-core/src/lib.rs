//! dermadetect-core
//!
//! Pure domain types, wire schemas, and REST path conventions.
//! No network or storage dependency; this is the shared vocabulary of the
//! DermaDetect triage system, exported to the app's view layer via `ts-rs`.

pub mod catalog;
pub mod endpoints;
pub mod error;
pub mod lenient;
pub mod models;
