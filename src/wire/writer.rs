//! Append-only protobuf writer

use super::WireType;
use prost::encoding;

/// Appends protobuf-encoded fields to an owned buffer.
///
/// Field writers always emit the field, default value or not: proto3
/// default-omission is the caller's decision, since oneof members must be
/// written even when they hold a default.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Release the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write a field key
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) {
        encoding::encode_key(field_number, wire_type, &mut self.buf);
    }

    /// Write a raw base-128 varint
    pub fn write_varint(&mut self, value: u64) {
        encoding::encode_varint(value, &mut self.buf);
    }

    /// Write a raw little-endian 64-bit value
    pub fn write_fixed64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a `bool` field
    pub fn write_bool(&mut self, field_number: u32, value: bool) {
        self.write_tag(field_number, WireType::Varint);
        self.write_varint(u64::from(value));
    }

    /// Write an `int64` field as the full two's-complement varint
    pub fn write_integer(&mut self, field_number: u32, value: i64) {
        self.write_tag(field_number, WireType::Varint);
        self.write_varint(value as u64);
    }

    /// Write an `int32` field; negatives are sign-extended to ten bytes
    pub fn write_int32(&mut self, field_number: u32, value: i32) {
        self.write_integer(field_number, i64::from(value));
    }

    /// Write an enum field by number
    pub fn write_enum(&mut self, field_number: u32, value: i32) {
        self.write_int32(field_number, value);
    }

    /// Write a `double` field
    pub fn write_double(&mut self, field_number: u32, value: f64) {
        self.write_tag(field_number, WireType::SixtyFourBit);
        self.write_fixed64(value.to_bits());
    }

    /// Write a length-delimited field holding `payload` verbatim
    pub fn write_length_delimited_field(&mut self, field_number: u32, payload: &[u8]) {
        self.write_tag(field_number, WireType::LengthDelimited);
        self.write_varint(payload.len() as u64);
        self.buf.extend_from_slice(payload);
    }

    /// Write a `bytes` field
    pub fn write_bytes(&mut self, field_number: u32, value: &[u8]) {
        self.write_length_delimited_field(field_number, value);
    }

    /// Write a `string` field
    pub fn write_string(&mut self, field_number: u32, value: &str) {
        self.write_length_delimited_field(field_number, value.as_bytes());
    }

    /// Write an embedded message produced by `encode`
    pub fn write_nested(&mut self, field_number: u32, encode: impl FnOnce(&mut Writer)) {
        let mut nested = Writer::new();
        encode(&mut nested);
        self.write_length_delimited_field(field_number, &nested.buf);
    }
}
