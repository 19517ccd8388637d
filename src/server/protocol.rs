use serde::{Deserialize, Serialize};

/// Header carrying the client's negotiated protocol version, e.g. `3.10`.
pub const VERSION_HEADER: &str = "x-cluster-version";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTask {
    pub message_type: u16,
    pub operation_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub node_id: String,
    pub partition_count: u32,
    pub message_types: Vec<RegisteredTask>,
}
