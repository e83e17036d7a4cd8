use std::future::Future;

use dermadetect_core::models::case::CasePayload;

use crate::error::TriageError;

/// Where assembled cases are sent.
///
/// Any 2xx response is success; every other outcome is a
/// [`TriageError::Persistence`]. Callers make exactly one attempt.
pub trait CaseGateway {
    fn persist_case(
        &self,
        payload: &CasePayload,
    ) -> impl Future<Output = Result<(), TriageError>> + Send;
}
