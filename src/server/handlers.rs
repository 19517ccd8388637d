use super::node::Node;
use super::protocol::*;
use crate::protocol::message::UNKNOWN_CORRELATION_ID;
use crate::protocol::{ClientMessage, TaskError};
use crate::versioning::Version;

use axum::{
    Extension, Json,
    body::Bytes,
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

/// One request frame in, one response frame out.
///
/// Operation and permission failures are ordinary response frames (`200`); only a request
/// whose header or version cannot be read is answered with `400`.
pub async fn handle_client_frame(
    Extension(node): Extension<Arc<Node>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Bytes) {
    let message = match ClientMessage::decode(body) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Rejecting frame with unreadable header: {}", e);
            let response = TaskError::from(e).into_response(UNKNOWN_CORRELATION_ID);
            return (StatusCode::BAD_REQUEST, response.encode());
        }
    };

    let version = match negotiated_version(&headers, node.cluster_version) {
        Ok(version) => version,
        Err(reason) => {
            tracing::debug!(
                "Rejecting request {} with bad version header: {}",
                message.correlation_id,
                reason
            );
            let response =
                TaskError::MalformedRequest(reason).into_response(message.correlation_id);
            return (StatusCode::BAD_REQUEST, response.encode());
        }
    };

    let response = node.registry.handle(message, version, &node.ctx).await;
    (StatusCode::OK, response.encode())
}

pub async fn handle_health(
    Extension(node): Extension<Arc<Node>>,
) -> (StatusCode, Json<HealthResponse>) {
    let message_types = node
        .registry
        .list_tasks()
        .into_iter()
        .map(|(message_type, operation_name)| RegisteredTask {
            message_type,
            operation_name: operation_name.to_string(),
        })
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            node_id: node.node_id.to_string(),
            partition_count: node.ctx.partitioner.partition_count(),
            message_types,
        }),
    )
}

fn negotiated_version(headers: &HeaderMap, default: Version) -> Result<Version, String> {
    let Some(raw) = headers.get(VERSION_HEADER) else {
        return Ok(default);
    };

    let raw = raw
        .to_str()
        .map_err(|_| format!("{VERSION_HEADER} is not ASCII"))?;
    raw.trim()
        .parse()
        .map_err(|e| format!("{VERSION_HEADER}: {e}"))
}
