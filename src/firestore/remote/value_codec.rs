//! `google.firestore.v1.Value`

use super::Serializer;
use crate::error::Result;
use crate::firestore::field_value::{Blob, FieldValue, ObjectValue};
use crate::firestore::geo_point::GeoPoint;
use crate::firestore::timestamp::Timestamp;
use crate::wire::{Reader, Writer};

// Value oneof members
const BOOLEAN_VALUE: u32 = 1;
const INTEGER_VALUE: u32 = 2;
const DOUBLE_VALUE: u32 = 3;
const REFERENCE_VALUE: u32 = 5;
const MAP_VALUE: u32 = 6;
const GEO_POINT_VALUE: u32 = 8;
const ARRAY_VALUE: u32 = 9;
const TIMESTAMP_VALUE: u32 = 10;
const NULL_VALUE: u32 = 11;
const STRING_VALUE: u32 = 17;
const BYTES_VALUE: u32 = 18;

// MapValue.fields, ArrayValue.values
const MAP_FIELDS: u32 = 1;
const ARRAY_VALUES: u32 = 1;

// Map entry, google.protobuf.Timestamp, google.type.LatLng
const ENTRY_KEY: u32 = 1;
const ENTRY_VALUE: u32 = 2;
const TIMESTAMP_SECONDS: u32 = 1;
const TIMESTAMP_NANOS: u32 = 2;
const LATITUDE: u32 = 1;
const LONGITUDE: u32 = 2;

impl Serializer {
    /// Encode a value as a `google.firestore.v1.Value` message
    pub fn encode_field_value(&self, value: &FieldValue) -> Vec<u8> {
        let mut writer = Writer::new();
        write_value(&mut writer, value);
        writer.into_bytes()
    }

    /// Decode a `google.firestore.v1.Value` message.
    ///
    /// When a field appears more than once the last occurrence wins; unknown
    /// fields are skipped. A message with no recognized field is data loss.
    ///
    /// Nesting is capped at [`RECURSION_LIMIT`](crate::wire::RECURSION_LIMIT)
    /// embedded messages. An array level costs two of them and a map level
    /// three, so at most 50 nested arrays or 33 nested maps decode; a
    /// timestamp or geo point leaf costs one more. Encoding does not check
    /// the limit.
    pub fn decode_field_value(&self, bytes: &[u8]) -> Result<FieldValue> {
        let mut reader = Reader::new(bytes);
        let value = read_value(&mut reader);
        reader.into_result(value)
    }
}

pub(super) fn write_value(writer: &mut Writer, value: &FieldValue) {
    match value {
        FieldValue::Null => writer.write_enum(NULL_VALUE, 0),
        FieldValue::Boolean(b) => writer.write_bool(BOOLEAN_VALUE, *b),
        FieldValue::Integer(i) => writer.write_integer(INTEGER_VALUE, *i),
        FieldValue::Double(d) => writer.write_double(DOUBLE_VALUE, *d),
        FieldValue::Timestamp(ts) => {
            writer.write_nested(TIMESTAMP_VALUE, |w| write_timestamp(w, ts))
        }
        FieldValue::String(s) => writer.write_string(STRING_VALUE, s),
        FieldValue::Blob(blob) => writer.write_bytes(BYTES_VALUE, blob.as_bytes()),
        FieldValue::Reference { database_id, key } => {
            writer.write_string(REFERENCE_VALUE, &database_id.resource_name(key.path()))
        }
        FieldValue::GeoPoint(point) => writer.write_nested(GEO_POINT_VALUE, |w| {
            w.write_double(LATITUDE, point.latitude);
            w.write_double(LONGITUDE, point.longitude);
        }),
        FieldValue::Array(values) => writer.write_nested(ARRAY_VALUE, |w| {
            for value in values {
                w.write_nested(ARRAY_VALUES, |w| write_value(w, value));
            }
        }),
        FieldValue::Map(object) => {
            writer.write_nested(MAP_VALUE, |w| write_fields(w, MAP_FIELDS, object))
        }
    }
}

/// Write `object` as repeated map entries under `field_number`
pub(super) fn write_fields(writer: &mut Writer, field_number: u32, object: &ObjectValue) {
    for (key, value) in object.iter() {
        writer.write_nested(field_number, |w| {
            w.write_string(ENTRY_KEY, key);
            w.write_nested(ENTRY_VALUE, |w| write_value(w, value));
        });
    }
}

/// Write the body of a `google.protobuf.Timestamp`; zero fields are omitted
pub(super) fn write_timestamp(writer: &mut Writer, timestamp: &Timestamp) {
    if timestamp.seconds != 0 {
        writer.write_integer(TIMESTAMP_SECONDS, timestamp.seconds);
    }
    if timestamp.nanoseconds != 0 {
        writer.write_int32(TIMESTAMP_NANOS, timestamp.nanoseconds);
    }
}

pub(super) fn read_value(reader: &mut Reader<'_>) -> FieldValue {
    let mut result = None;

    reader.read_message(|r, tag| {
        let value = match tag.field_number {
            NULL_VALUE => {
                let null = r.read_enum(tag);
                if null != 0 {
                    r.fail(format!("invalid null value {}", null));
                }
                FieldValue::Null
            }
            BOOLEAN_VALUE => FieldValue::Boolean(r.read_bool(tag)),
            INTEGER_VALUE => FieldValue::Integer(r.read_integer(tag)),
            DOUBLE_VALUE => FieldValue::Double(r.read_double(tag)),
            STRING_VALUE => FieldValue::String(r.read_string(tag)),
            BYTES_VALUE => FieldValue::Blob(Blob::from_bytes(r.read_bytes(tag))),
            TIMESTAMP_VALUE => match r.read_nested(tag, read_timestamp) {
                Some(ts) => FieldValue::Timestamp(ts),
                None => return true,
            },
            REFERENCE_VALUE => {
                let name = r.read_string(tag);
                if !r.is_ok() {
                    return true;
                }
                match Serializer::decode_resource_name(&name) {
                    Ok((database_id, key)) => FieldValue::Reference { database_id, key },
                    Err(err) => {
                        r.set_status(err);
                        return true;
                    }
                }
            }
            GEO_POINT_VALUE => match r.read_nested(tag, read_geo_point) {
                Some(point) => FieldValue::GeoPoint(point),
                None => return true,
            },
            ARRAY_VALUE => match r.read_nested(tag, read_array) {
                Some(values) => FieldValue::Array(values),
                None => return true,
            },
            MAP_VALUE => match r.read_nested(tag, read_map) {
                Some(object) => FieldValue::Map(object),
                None => return true,
            },
            _ => return false,
        };
        result = Some(value);
        true
    });

    match result {
        Some(value) => value,
        None => {
            reader.fail("Value message has no recognized value type");
            FieldValue::Null
        }
    }
}

fn read_array(reader: &mut Reader<'_>) -> Vec<FieldValue> {
    let mut values = Vec::new();
    reader.read_message(|r, tag| {
        if tag.field_number != ARRAY_VALUES {
            return false;
        }
        if let Some(value) = r.read_nested(tag, read_value) {
            values.push(value);
        }
        true
    });
    values
}

/// Read a `MapValue` body; later keys replace earlier ones
fn read_map(reader: &mut Reader<'_>) -> ObjectValue {
    let mut object = ObjectValue::empty();
    reader.read_message(|r, tag| {
        if tag.field_number != MAP_FIELDS {
            return false;
        }
        if let Some((key, value)) = r.read_nested(tag, read_map_entry) {
            object.set(key, value);
        }
        true
    });
    object
}

/// Read one `{key, value}` map entry; an entry without a value is data loss
pub(super) fn read_map_entry(reader: &mut Reader<'_>) -> (String, FieldValue) {
    let mut key = String::new();
    let mut value = None;

    reader.read_message(|r, tag| match tag.field_number {
        ENTRY_KEY => {
            key = r.read_string(tag);
            true
        }
        ENTRY_VALUE => {
            if let Some(decoded) = r.read_nested(tag, read_value) {
                value = Some(decoded);
            }
            true
        }
        _ => false,
    });

    match value {
        Some(value) => (key, value),
        None => {
            reader.fail(format!("map entry '{}' has no value", key));
            (key, FieldValue::Null)
        }
    }
}

/// Read and validate a `google.protobuf.Timestamp` body
pub(super) fn read_timestamp(reader: &mut Reader<'_>) -> Timestamp {
    let mut seconds = 0;
    let mut nanos = 0;

    reader.read_message(|r, tag| match tag.field_number {
        TIMESTAMP_SECONDS => {
            seconds = r.read_integer(tag);
            true
        }
        TIMESTAMP_NANOS => {
            nanos = r.read_int32(tag);
            true
        }
        _ => false,
    });

    if !reader.is_ok() {
        return Timestamp::default();
    }
    match Timestamp::new(seconds, nanos) {
        Ok(timestamp) => timestamp,
        Err(err) => {
            reader.fail(format!("invalid timestamp: {}", err));
            Timestamp::default()
        }
    }
}

fn read_geo_point(reader: &mut Reader<'_>) -> GeoPoint {
    let mut latitude = 0.0;
    let mut longitude = 0.0;

    reader.read_message(|r, tag| match tag.field_number {
        LATITUDE => {
            latitude = r.read_double(tag);
            true
        }
        LONGITUDE => {
            longitude = r.read_double(tag);
            true
        }
        _ => false,
    });

    GeoPoint { latitude, longitude }
}
