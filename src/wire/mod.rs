//! Wire Primitives
//!
//! Big-endian reader/writer pair shared by the client frame codec (`protocol`) and the
//! version-gated record codec (`versioning`).
//!
//! Strings are length-prefixed (`i32` byte count, `-1` for null) UTF-8. Booleans occupy a
//! single byte. Every read is bounds-checked and reports how many bytes were missing, so
//! callers can distinguish a short stream from a corrupt one.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Length marker written in place of a string length when the string is null.
pub const NULL_LENGTH: i32 = -1;

/// Largest byte block or string an `i32` length prefix can describe.
pub const MAX_BLOCK_LEN: usize = i32::MAX as usize;

/// Why a read from the wire failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("stream truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("invalid length prefix {0}")]
    InvalidLength(i32),
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("unknown type tag {0}")]
    UnknownTag(i32),
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

impl WireError {
    /// `true` when the stream ended early, as opposed to holding bytes that make no sense.
    pub fn is_truncation(&self) -> bool {
        matches!(self, WireError::Truncated { .. })
    }
}

pub type WireResult<T> = Result<T, WireError>;

/// Cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> WireResult<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(WireError::Truncated { needed, remaining });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> WireResult<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_i8(&mut self) -> WireResult<i8> {
        self.ensure(1)?;
        Ok(self.buf.get_i8())
    }

    /// Reads a one-byte boolean. Only `0` and `1` are accepted.
    pub fn read_bool(&mut self) -> WireResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WireError::InvalidBool(other)),
        }
    }

    pub fn read_u16(&mut self) -> WireResult<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn read_i16(&mut self) -> WireResult<i16> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    /// Reads a big-endian `i32`, the width of every length prefix and type tag.
    pub fn read_i32(&mut self) -> WireResult<i32> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_i64(&mut self) -> WireResult<i64> {
        self.ensure(8)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_f32(&mut self) -> WireResult<f32> {
        self.ensure(4)?;
        Ok(self.buf.get_f32())
    }

    pub fn read_f64(&mut self) -> WireResult<f64> {
        self.ensure(8)?;
        Ok(self.buf.get_f64())
    }

    /// Reads a length-prefixed byte block. Null blocks are rejected.
    pub fn read_bytes(&mut self) -> WireResult<Bytes> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(WireError::InvalidLength(len));
        }
        let len = len as usize;
        self.ensure(len)?;
        Ok(self.buf.split_to(len))
    }

    /// Reads a length-prefixed UTF-8 string, `None` for the null marker.
    ///
    /// # Errors
    /// * `Truncated` if the prefix or body is cut short.
    /// * `InvalidLength` for a negative prefix other than [`NULL_LENGTH`].
    /// * `InvalidUtf8` if the body does not decode.
    pub fn read_nullable_string(&mut self) -> WireResult<Option<String>> {
        let len = self.read_i32()?;
        if len == NULL_LENGTH {
            return Ok(None);
        }
        if len < 0 {
            return Err(WireError::InvalidLength(len));
        }
        let len = len as usize;
        self.ensure(len)?;
        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec())
            .map(Some)
            .map_err(|_| WireError::InvalidUtf8)
    }

    /// Reads a string that must be present; the null marker is `InvalidLength(-1)`.
    pub fn read_string(&mut self) -> WireResult<String> {
        self.read_nullable_string()?
            .ok_or(WireError::InvalidLength(NULL_LENGTH))
    }

    /// Fails if any bytes are left unread.
    pub fn finish(self) -> WireResult<()> {
        match self.buf.remaining() {
            0 => Ok(()),
            extra => Err(WireError::TrailingBytes(extra)),
        }
    }

    /// Hands back the unread remainder.
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }
}

/// Growable output buffer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    /// Creates a new, empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    /// Writes `1` for true, `0` for false.
    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    /// Writes an `i32` length prefix followed by `value`.
    ///
    /// # Panics
    /// If `value` is longer than [`MAX_BLOCK_LEN`]; no prefix could describe it.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.buf.put_i32(length_prefix(value.len()));
        self.buf.put_slice(value);
    }

    /// Writes `value` as a string, or the null marker for `None`.
    ///
    /// # Arguments
    /// * `value` - The string to write; `None` is read back as `None` by
    ///   [`WireReader::read_nullable_string`].
    pub fn write_nullable_string(&mut self, value: Option<&str>) {
        match value {
            Some(s) => self.write_bytes(s.as_bytes()),
            None => self.buf.put_i32(NULL_LENGTH),
        }
    }

    /// Writes a length-prefixed UTF-8 string. Same limit as [`WireWriter::write_bytes`].
    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Appends raw bytes without a length prefix.
    pub fn put_raw(&mut self, value: &[u8]) {
        self.buf.put_slice(value);
    }

    /// Finishes writing and returns the encoded bytes.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

fn length_prefix(len: usize) -> i32 {
    match i32::try_from(len) {
        Ok(prefix) => prefix,
        Err(_) => panic!("block of {len} bytes exceeds the {MAX_BLOCK_LEN}-byte wire limit"),
    }
}
