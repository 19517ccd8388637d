use super::message::{ClientResponse, CorrelationId, HeaderError};
use crate::partition::{OperationFailure, RoutingError};
use crate::security::RequiredPermission;
use crate::versioning::RecordError;
use crate::wire::WireError;

use thiserror::Error;

pub const MALFORMED_REQUEST: i32 = 1;
pub const ACCESS_DENIED: i32 = 2;
pub const ROUTING_FAILURE: i32 = 3;
pub const TRUNCATED_RECORD: i32 = 4;
pub const UNKNOWN_MESSAGE_TYPE: i32 = 5;

/// Why a client request did not produce a success response.
///
/// Every variant except `OperationFailure` is raised before the request reaches partition
/// state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("unknown message type {0:#06x}")]
    UnknownMessageType(u16),
    #[error("access denied: {0}")]
    AccessDenied(RequiredPermission),
    #[error("routing failure: {0}")]
    RoutingFailure(#[from] RoutingError),
    #[error("truncated record: {0}")]
    TruncatedRecord(RecordError),
    #[error("operation failed: {0}")]
    OperationFailure(#[from] OperationFailure),
}

impl TaskError {
    pub fn error_code(&self) -> i32 {
        match self {
            TaskError::MalformedRequest(_) => MALFORMED_REQUEST,
            TaskError::UnknownMessageType(_) => UNKNOWN_MESSAGE_TYPE,
            TaskError::AccessDenied(_) => ACCESS_DENIED,
            TaskError::RoutingFailure(_) => ROUTING_FAILURE,
            TaskError::TruncatedRecord(_) => TRUNCATED_RECORD,
            TaskError::OperationFailure(failure) => failure.code,
        }
    }

    /// Client-side problems, as opposed to failures raised by an operation.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TaskError::OperationFailure(_))
    }

    pub fn into_response(self, correlation_id: CorrelationId) -> ClientResponse {
        let error_code = self.error_code();
        let message = match self {
            TaskError::OperationFailure(failure) => failure.message,
            other => other.to_string(),
        };
        ClientResponse::Error {
            correlation_id,
            error_code,
            message,
        }
    }
}

impl From<WireError> for TaskError {
    fn from(err: WireError) -> Self {
        TaskError::MalformedRequest(err.to_string())
    }
}

impl From<HeaderError> for TaskError {
    fn from(err: HeaderError) -> Self {
        TaskError::MalformedRequest(err.to_string())
    }
}

impl From<RecordError> for TaskError {
    fn from(err: RecordError) -> Self {
        if err.is_truncated() {
            TaskError::TruncatedRecord(err)
        } else {
            TaskError::MalformedRequest(err.to_string())
        }
    }
}
