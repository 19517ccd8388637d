//! Version-gated record codec.
//!
//! A record declares its fields once, as an ordered `&'static [FieldSpec]`. The single
//! encode/decode routine in this module walks that list in order and consults each field's
//! `since` gate against the negotiated version, so writers and readers can never disagree
//! about which fields are on the wire.
//!
//! ## Schema rules
//! - Declaration order is wire order.
//! - Fields introduced at or before [`Version::BASELINE`] are always written.
//! - Later fields are written iff `negotiated >= since`, otherwise they take zero bytes and
//!   decode to the record's `Default`.
//! - `since` never decreases along the list: a new field is appended after every existing
//!   field, never inserted.

use super::version::Version;
use crate::wire::{WireError, WireReader, WireWriter};
use bytes::Bytes;
use std::collections::HashSet;
use thiserror::Error;

/// One entry of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub since: Version,
}

impl FieldSpec {
    pub const fn baseline(name: &'static str) -> Self {
        Self {
            name,
            since: Version::BASELINE,
        }
    }

    pub const fn since(name: &'static str, since: Version) -> Self {
        Self { name, since }
    }

    pub fn is_baseline(&self) -> bool {
        self.since <= Version::BASELINE
    }

    /// Whether this field is on the wire for a stream at `version`.
    pub fn is_present(&self, version: Version) -> bool {
        self.is_baseline() || version >= self.since
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("{record}.{field} truncated ({source})")]
    Truncated {
        record: &'static str,
        field: &'static str,
        source: WireError,
    },
    #[error("{record}.{field} is corrupt: {source}")]
    Corrupt {
        record: &'static str,
        field: &'static str,
        source: WireError,
    },
    #[error("{record} followed by {extra} unexpected bytes")]
    TrailingBytes { record: &'static str, extra: usize },
}

impl RecordError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, RecordError::Truncated { .. })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field '{field}' (since {since}) declared after a field gated at {previous}")]
    OutOfOrder {
        field: &'static str,
        since: Version,
        previous: Version,
    },
    #[error("field '{0}' declared twice")]
    Duplicate(&'static str),
}

/// A flat record with a declarative, version-gated field list.
///
/// Implementors only describe how to move one field at a time; gating and ordering are
/// owned by [`write_record`] and [`read_record`].
pub trait VersionedRecord: Default {
    const RECORD_NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    /// Writes field `index` of [`Self::FIELDS`].
    fn write_field(&self, index: usize, out: &mut WireWriter);

    /// Reads field `index` of [`Self::FIELDS`] into `self`.
    fn read_field(&mut self, index: usize, input: &mut WireReader) -> Result<(), WireError>;
}

/// Checks the append-only rules for a field list.
pub fn validate_schema(fields: &[FieldSpec]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    let mut previous = Version::UNKNOWN;

    for field in fields {
        if !seen.insert(field.name) {
            return Err(SchemaError::Duplicate(field.name));
        }
        // Baseline fields all share one gate regardless of the exact version declared.
        let since = field.since.max(Version::BASELINE);
        if since < previous {
            return Err(SchemaError::OutOfOrder {
                field: field.name,
                since: field.since,
                previous,
            });
        }
        previous = since;
    }

    Ok(())
}

/// Writes the fields of `record` present at `version`, in declaration order.
///
/// # Arguments
/// * `record` - The record to write.
/// * `version` - The version negotiated with the peer; fields introduced later are skipped.
/// * `out` - Destination buffer; nothing else is written around the fields.
pub fn write_record<R: VersionedRecord>(record: &R, version: Version, out: &mut WireWriter) {
    debug_assert!(validate_schema(R::FIELDS).is_ok());

    for (index, field) in R::FIELDS.iter().enumerate() {
        if field.is_present(version) {
            record.write_field(index, out);
        }
    }
}

/// Reads one record from `input`, leaving any following bytes in place.
pub fn read_record<R: VersionedRecord>(
    input: &mut WireReader,
    version: Version,
) -> Result<R, RecordError> {
    let mut record = R::default();

    for (index, field) in R::FIELDS.iter().enumerate() {
        if !field.is_present(version) {
            continue;
        }
        record
            .read_field(index, input)
            .map_err(|source| field_error::<R>(field, source))?;
    }

    Ok(record)
}

/// [`write_record`] into a fresh buffer.
pub fn encode_record<R: VersionedRecord>(record: &R, version: Version) -> Bytes {
    let mut out = WireWriter::new();
    write_record(record, version, &mut out);
    out.freeze()
}

/// Decodes a buffer holding exactly one record.
pub fn decode_record<R: VersionedRecord>(
    bytes: impl Into<Bytes>,
    version: Version,
) -> Result<R, RecordError> {
    let mut input = WireReader::new(bytes);
    let record = read_record(&mut input, version)?;

    match input.remaining() {
        0 => Ok(record),
        extra => Err(RecordError::TrailingBytes {
            record: R::RECORD_NAME,
            extra,
        }),
    }
}

fn field_error<R: VersionedRecord>(field: &FieldSpec, source: WireError) -> RecordError {
    if source.is_truncation() {
        RecordError::Truncated {
            record: R::RECORD_NAME,
            field: field.name,
            source,
        }
    } else {
        RecordError::Corrupt {
            record: R::RECORD_NAME,
            field: field.name,
            source,
        }
    }
}
