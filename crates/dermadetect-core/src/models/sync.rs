use serde::{Deserialize, Serialize};

/// Body of `POST /sync`: local changes keyed by table name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncEnvelope {
    pub last_sync_timestamp: Option<jiff::Timestamp>,
    pub changes: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    pub new_sync_timestamp: String,
    #[serde(default)]
    pub server_updates: serde_json::Map<String, serde_json::Value>,
}
