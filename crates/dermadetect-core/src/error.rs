use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid risk level: {0}")]
    InvalidRiskLevel(String),

    #[error("invalid urgency level: {0}")]
    InvalidUrgencyLevel(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid date: {0}")]
    InvalidDate(#[from] jiff::Error),
}
