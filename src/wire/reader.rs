//! Bounds-checked protobuf reader with a sticky error state

use super::{Tag, WireType, RECURSION_LIMIT};
use crate::error::{FirestoreError, Result};
use prost::encoding::{self, DecodeContext};

/// Reads protobuf-encoded fields from a borrowed byte buffer.
///
/// The first malformed construct (truncated varint, truncated payload, bad
/// tag, wire-type mismatch, excessive nesting) puts the reader into a terminal
/// data-loss state. Every later read is a no-op returning a default value, so
/// decoders can run straight through and check [`Reader::into_result`] once at
/// the end.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    len: usize,
    depth: u32,
    status: Option<FirestoreError>,
}

impl<'a> Reader<'a> {
    /// Create a reader over a complete message
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            buf: bytes,
            len: bytes.len(),
            depth: 0,
            status: None,
        }
    }

    /// True until the first decode failure
    pub fn is_ok(&self) -> bool {
        self.status.is_none()
    }

    /// The recorded failure, if any
    pub fn error(&self) -> Option<&FirestoreError> {
        self.status.as_ref()
    }

    /// Number of unread bytes
    pub fn bytes_left(&self) -> usize {
        self.buf.len()
    }

    /// Position of the cursor within this (possibly nested) message
    pub fn offset(&self) -> usize {
        self.len - self.buf.len()
    }

    /// Record a data-loss failure. Only the first failure is kept.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.set_status(FirestoreError::data_loss(reason));
    }

    /// Record an arbitrary failure. Only the first failure is kept.
    pub fn set_status(&mut self, err: FirestoreError) {
        if self.status.is_some() {
            return;
        }
        tracing::debug!(offset = self.offset(), depth = self.depth, error = %err, "wire decode failed");
        self.status = Some(err);
    }

    /// Finish decoding: the value if every read succeeded, else the failure
    pub fn into_result<T>(self, value: T) -> Result<T> {
        match self.status {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }

    /// Read a field key
    pub fn read_tag(&mut self) -> Option<Tag> {
        if !self.is_ok() {
            return None;
        }
        match encoding::decode_key(&mut self.buf) {
            Ok((field_number, wire_type)) => Some(Tag::new(field_number, wire_type)),
            Err(err) => {
                self.fail(format!("invalid field key: {}", err));
                None
            }
        }
    }

    /// Read a raw base-128 varint
    pub fn read_varint(&mut self) -> u64 {
        if !self.is_ok() {
            return 0;
        }
        match encoding::decode_varint(&mut self.buf) {
            Ok(value) => value,
            Err(err) => {
                self.fail(format!("invalid varint: {}", err));
                0
            }
        }
    }

    /// Read a raw little-endian 64-bit value
    pub fn read_fixed64(&mut self) -> u64 {
        if !self.is_ok() {
            return 0;
        }
        if self.buf.len() < 8 {
            self.fail(format!(
                "fixed64 needs 8 bytes, {} remaining",
                self.buf.len()
            ));
            return 0;
        }
        let (head, rest) = self.buf.split_at(8);
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(head);
        self.buf = rest;
        u64::from_le_bytes(bytes)
    }

    fn read_length_delimited(&mut self) -> &'a [u8] {
        let len = self.read_varint();
        if !self.is_ok() {
            return &[];
        }
        if len > self.buf.len() as u64 {
            self.fail(format!(
                "length-delimited field claims {} bytes, {} remaining",
                len,
                self.buf.len()
            ));
            return &[];
        }
        let (payload, rest) = self.buf.split_at(len as usize);
        self.buf = rest;
        payload
    }

    fn expect_wire_type(&mut self, tag: Tag, expected: WireType) -> bool {
        if !self.is_ok() {
            return false;
        }
        if tag.wire_type != expected {
            self.fail(format!(
                "field {} has wire type {:?}, expected {:?}",
                tag.field_number, tag.wire_type, expected
            ));
            return false;
        }
        true
    }

    /// Read a `bool` field. Any non-zero varint is `true`.
    pub fn read_bool(&mut self, tag: Tag) -> bool {
        if !self.expect_wire_type(tag, WireType::Varint) {
            return false;
        }
        self.read_varint() != 0
    }

    /// Read an `int64` field (two's complement, no zigzag)
    pub fn read_integer(&mut self, tag: Tag) -> i64 {
        if !self.expect_wire_type(tag, WireType::Varint) {
            return 0;
        }
        self.read_varint() as i64
    }

    /// Read an `int32` field; wider varints are truncated as protobuf does
    pub fn read_int32(&mut self, tag: Tag) -> i32 {
        if !self.expect_wire_type(tag, WireType::Varint) {
            return 0;
        }
        self.read_varint() as i32
    }

    /// Read an enum field as its raw number
    pub fn read_enum(&mut self, tag: Tag) -> i32 {
        self.read_int32(tag)
    }

    /// Read a `double` field
    pub fn read_double(&mut self, tag: Tag) -> f64 {
        if !self.expect_wire_type(tag, WireType::SixtyFourBit) {
            return 0.0;
        }
        f64::from_bits(self.read_fixed64())
    }

    /// Read a `bytes` field into a newly allocated buffer
    pub fn read_bytes(&mut self, tag: Tag) -> Vec<u8> {
        if !self.expect_wire_type(tag, WireType::LengthDelimited) {
            return Vec::new();
        }
        self.read_length_delimited().to_vec()
    }

    /// Read a `string` field.
    ///
    /// Only the length is validated; ill-formed UTF-8 is replaced with
    /// U+FFFD instead of failing the decode.
    pub fn read_string(&mut self, tag: Tag) -> String {
        if !self.expect_wire_type(tag, WireType::LengthDelimited) {
            return String::new();
        }
        String::from_utf8_lossy(self.read_length_delimited()).into_owned()
    }

    /// Decode an embedded message with `decode`, running it over a reader
    /// bounded to the payload. Failures inside propagate to `self`; `None` is
    /// returned whenever the nested decode did not succeed.
    pub fn read_nested<T>(
        &mut self,
        tag: Tag,
        decode: impl FnOnce(&mut Reader<'a>) -> T,
    ) -> Option<T> {
        if !self.expect_wire_type(tag, WireType::LengthDelimited) {
            return None;
        }
        let payload = self.read_length_delimited();
        if !self.is_ok() {
            return None;
        }
        if self.depth >= RECURSION_LIMIT {
            self.fail(format!(
                "messages nested deeper than {} levels",
                RECURSION_LIMIT
            ));
            return None;
        }

        let mut nested = Reader {
            buf: payload,
            len: payload.len(),
            depth: self.depth + 1,
            status: None,
        };
        let value = decode(&mut nested);
        match nested.status {
            Some(err) => {
                self.set_status(err);
                None
            }
            None => Some(value),
        }
    }

    /// Discard the payload of a field
    pub fn skip_field(&mut self, tag: Tag) {
        if !self.is_ok() {
            return;
        }
        let result = encoding::skip_field(
            tag.wire_type,
            tag.field_number,
            &mut self.buf,
            DecodeContext::default(),
        );
        if let Err(err) = result {
            self.fail(format!("cannot skip field {}: {}", tag.field_number, err));
        }
    }

    /// Walk every field of the message.
    ///
    /// `handler` returns `true` when it recognized (and consumed) the field.
    /// Fields it does not claim are skipped, so unknown field numbers are never
    /// an error. Iteration stops at the end of the buffer or the first failure.
    pub fn read_message<F>(&mut self, mut handler: F)
    where
        F: FnMut(&mut Reader<'a>, Tag) -> bool,
    {
        while self.is_ok() && !self.buf.is_empty() {
            let Some(tag) = self.read_tag() else {
                break;
            };
            if !handler(self, tag) {
                tracing::trace!(field_number = tag.field_number, "skipping unknown field");
                self.skip_field(tag);
            }
        }
    }
}
