//! Client Protocol
//!
//! Frames exchanged with clients and the error taxonomy mapped onto them.
//!
//! Request: `correlation_id i64 | message_type u16 | partition_id i32 (-1 = none) | payload`.
//! Success: `correlation_id i64 | message_type u16 | payload`.
//! Error: `correlation_id i64 | 0xFFFF | error_code i32 | message string`.
//!
//! Payload layouts are owned by the message task registered for each message type.

pub mod error;
pub mod message;

pub use error::TaskError;
pub use message::{ClientMessage, ClientResponse, CorrelationId};
