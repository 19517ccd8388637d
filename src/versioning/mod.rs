//! Versioned Record Encoding
//!
//! Keeps configuration and statistics records readable across a rolling upgrade, where
//! nodes on adjacent protocol versions exchange the same records.
//!
//! ## Core Concepts
//! - **`Version`**: the negotiated protocol version of a stream, fixed for its lifetime.
//! - **`FieldSpec`**: a named field plus the version that introduced it.
//! - **`VersionedRecord`**: a record described by an ordered field list; one shared routine
//!   applies the version gates on both encode and decode.
//! - **`TaggedValue`**: the closed set of primitive kinds a record property may hold.

pub mod record;
pub mod value;
pub mod version;

pub use record::{
    FieldSpec, RecordError, SchemaError, VersionedRecord, decode_record, encode_record,
    read_record, validate_schema, write_record,
};
pub use value::TaggedValue;
pub use version::Version;
