//! REST path conventions.
//!
//! Pure string functions with no HTTP dependency. These define the canonical
//! layout of the DermaDetect API relative to its base URL.

pub const LOGIN: &str = "/login";

pub const ME: &str = "/me";

pub const PATIENTS: &str = "/patients";

pub fn patient(id: &str) -> String {
    format!("/patients/{id}")
}

pub fn patient_vitals(id: &str) -> String {
    format!("/patients/{id}/vitals")
}

pub const CASES: &str = "/cases";

pub const PENDING_CASES: &str = "/cases/pending";

pub fn case(id: &str) -> String {
    format!("/cases/{id}")
}

pub fn case_diagnosis(id: &str) -> String {
    format!("/cases/{id}/diagnosis")
}

pub const SYNC: &str = "/sync";

/// The remote classifier posts to the case-creation endpoint unless
/// configured otherwise.
pub const DEFAULT_ANALYSIS: &str = CASES;

/// Join a base URL and an endpoint path without doubling the slash.
pub fn join(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
