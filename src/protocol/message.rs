use crate::partition::PartitionId;
use crate::wire::{WireError, WireReader, WireWriter};
use bytes::Bytes;

pub type CorrelationId = i64;

/// Message type of every error response.
pub const ERROR_MESSAGE_TYPE: u16 = 0xFFFF;
/// Partition field value meaning "no partition pinned".
pub const NO_PARTITION: i32 = -1;
/// Correlation id used when the request header itself could not be read.
pub const UNKNOWN_CORRELATION_ID: CorrelationId = -1;

const HEADER_LEN: usize = 8 + 2 + 4;

/// One inbound client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    pub correlation_id: CorrelationId,
    pub message_type: u16,
    pub partition_id: Option<PartitionId>,
    pub payload: Bytes,
}

/// Header could not be read, so no correlation id is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("request header needs 14 bytes, got {0}")]
    TooShort(usize),
    #[error("invalid partition id {0}")]
    InvalidPartition(i32),
}

impl ClientMessage {
    pub fn new(
        correlation_id: CorrelationId,
        message_type: u16,
        partition_id: Option<PartitionId>,
        payload: Bytes,
    ) -> Self {
        Self {
            correlation_id,
            message_type,
            partition_id,
            payload,
        }
    }

    /// Splits a frame into header fields and the still-encoded payload.
    pub fn decode(frame: Bytes) -> Result<Self, HeaderError> {
        if frame.len() < HEADER_LEN {
            return Err(HeaderError::TooShort(frame.len()));
        }

        let short = |_: WireError| HeaderError::TooShort(HEADER_LEN);
        let mut input = WireReader::new(frame);
        let correlation_id = input.read_i64().map_err(short)?;
        let message_type = input.read_u16().map_err(short)?;
        let raw_partition = input.read_i32().map_err(short)?;

        let partition_id = match raw_partition {
            NO_PARTITION => None,
            p if p >= 0 => Some(p as PartitionId),
            p => return Err(HeaderError::InvalidPartition(p)),
        };

        Ok(Self {
            correlation_id,
            message_type,
            partition_id,
            payload: input.into_remaining(),
        })
    }

    pub fn encode(&self) -> Bytes {
        let mut out = WireWriter::new();
        out.write_i64(self.correlation_id);
        out.write_u16(self.message_type);
        out.write_i32(
            self.partition_id
                .map(|p| p as i32)
                .unwrap_or(NO_PARTITION),
        );
        out.put_raw(&self.payload);
        out.freeze()
    }

    pub fn payload_reader(&self) -> WireReader {
        WireReader::new(self.payload.clone())
    }
}

/// One outbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientResponse {
    Success {
        correlation_id: CorrelationId,
        message_type: u16,
        payload: Bytes,
    },
    Error {
        correlation_id: CorrelationId,
        error_code: i32,
        message: String,
    },
}

impl ClientResponse {
    pub fn correlation_id(&self) -> CorrelationId {
        match self {
            ClientResponse::Success { correlation_id, .. } => *correlation_id,
            ClientResponse::Error { correlation_id, .. } => *correlation_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ClientResponse::Error { .. })
    }

    pub fn encode(&self) -> Bytes {
        let mut out = WireWriter::new();
        match self {
            ClientResponse::Success {
                correlation_id,
                message_type,
                payload,
            } => {
                out.write_i64(*correlation_id);
                out.write_u16(*message_type);
                out.put_raw(payload);
            }
            ClientResponse::Error {
                correlation_id,
                error_code,
                message,
            } => {
                out.write_i64(*correlation_id);
                out.write_u16(ERROR_MESSAGE_TYPE);
                out.write_i32(*error_code);
                out.write_string(message);
            }
        }
        out.freeze()
    }

    pub fn decode(frame: Bytes) -> Result<Self, WireError> {
        let mut input = WireReader::new(frame);
        let correlation_id = input.read_i64()?;
        let message_type = input.read_u16()?;

        if message_type == ERROR_MESSAGE_TYPE {
            let error_code = input.read_i32()?;
            let message = input.read_string()?;
            input.finish()?;
            return Ok(ClientResponse::Error {
                correlation_id,
                error_code,
                message,
            });
        }

        Ok(ClientResponse::Success {
            correlation_id,
            message_type,
            payload: input.into_remaining(),
        })
    }
}
