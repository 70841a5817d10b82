//! Firestore field value types
//!
//! [`FieldValue`] is the recursive leaf of the document model. Arrays and maps
//! own their children, so the enum stays a fixed size regardless of nesting.

use super::database_id::DatabaseId;
use super::document_key::DocumentKey;
use super::field_path::FieldPath;
use super::geo_point::GeoPoint;
use super::timestamp::Timestamp;
use base64::Engine;
use std::collections::BTreeMap;

/// A typed Firestore value
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// `null`
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// 64-bit signed integer
    Integer(i64),

    /// IEEE-754 double; compared bitwise (`NaN == NaN`, `0.0 != -0.0`)
    Double(f64),

    /// Point in time
    Timestamp(Timestamp),

    /// UTF-8 string
    String(String),

    /// Byte sequence
    Blob(Blob),

    /// Reference to a document, possibly in another database
    Reference {
        /// Database holding the referenced document
        database_id: DatabaseId,
        /// Key of the referenced document
        key: DocumentKey,
    },

    /// Latitude/longitude pair
    GeoPoint(GeoPoint),

    /// Ordered list of values
    Array(Vec<FieldValue>),

    /// Nested map of values
    Map(ObjectValue),
}

/// Discriminant of a [`FieldValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ValueType {
    Null,
    Boolean,
    Integer,
    Double,
    Timestamp,
    String,
    Blob,
    Reference,
    GeoPoint,
    Array,
    Map,
}

impl FieldValue {
    /// Reference to `key` in `database_id`
    pub fn reference(database_id: DatabaseId, key: DocumentKey) -> Self {
        Self::Reference { database_id, key }
    }

    /// Empty map value
    pub fn empty_map() -> Self {
        Self::Map(ObjectValue::empty())
    }

    /// Discriminant of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Double(_) => ValueType::Double,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::String(_) => ValueType::String,
            Self::Blob(_) => ValueType::Blob,
            Self::Reference { .. } => ValueType::Reference,
            Self::GeoPoint(_) => ValueType::GeoPoint,
            Self::Array(_) => ValueType::Array,
            Self::Map(_) => ValueType::Map,
        }
    }

    /// True for `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for a double holding NaN
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Double(d) if d.is_nan())
    }

    /// Boolean payload, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// String payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Map payload, if this is a map
    pub fn as_map(&self) -> Option<&ObjectValue> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Render as JSON for logging and debugging.
    ///
    /// Timestamps become RFC 3339 strings, blobs base64, references full
    /// resource names and geo points `{latitude, longitude}` objects. Doubles
    /// JSON cannot represent (NaN, infinities) become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::json!(i),
            Self::Double(d) => serde_json::json!(d),
            Self::Timestamp(ts) => match ts.to_datetime() {
                Some(dt) => serde_json::Value::String(dt.to_rfc3339()),
                None => serde_json::Value::Null,
            },
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Blob(blob) => serde_json::Value::String(
                base64::engine::general_purpose::STANDARD.encode(blob.as_bytes()),
            ),
            Self::Reference { database_id, key } => {
                serde_json::Value::String(database_id.resource_name(key.path()))
            }
            Self::GeoPoint(geo) => serde_json::json!({
                "latitude": geo.latitude,
                "longitude": geo.longitude,
            }),
            Self::Array(values) => {
                serde_json::Value::Array(values.iter().map(FieldValue::to_json).collect())
            }
            Self::Map(map) => map.to_json(),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (
                Self::Reference {
                    database_id: db_a,
                    key: key_a,
                },
                Self::Reference {
                    database_id: db_b,
                    key: key_b,
                },
            ) => db_a == db_b && key_a == key_b,
            (Self::GeoPoint(a), Self::GeoPoint(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        Self::GeoPoint(value)
    }
}

impl From<Blob> for FieldValue {
    fn from(value: Blob) -> Self {
        Self::Blob(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(values: Vec<FieldValue>) -> Self {
        Self::Array(values)
    }
}

impl From<ObjectValue> for FieldValue {
    fn from(map: ObjectValue) -> Self {
        Self::Map(map)
    }
}

/// Binary payload of a blob value.
///
/// Distinguishes "no buffer" ([`Blob::null`]) from a zero-length buffer. The
/// wire format cannot: both encode as an empty payload and decode as an
/// allocated empty buffer, and the two compare equal.
#[derive(Debug, Clone, Default)]
pub struct Blob {
    bytes: Option<Vec<u8>>,
}

impl Blob {
    /// Blob with no buffer at all
    pub fn null() -> Self {
        Self { bytes: None }
    }

    /// Blob holding a copy of `bytes`
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }

    /// True if no buffer was ever allocated
    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }

    /// Contents (empty for a null blob)
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_deref().unwrap_or_default()
    }

    /// Number of bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True if there are no bytes (null or zero-length)
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl PartialEq for Blob {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Blob {}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// Top-level fields of a document, or the payload of a map value.
///
/// Keys are unique and kept sorted, which makes encoding deterministic and
/// equality independent of the order entries arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectValue {
    fields: BTreeMap<String, FieldValue>,
}

impl ObjectValue {
    /// Object without fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an existing map
    pub fn from_map(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    /// Value of a top-level field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Value at a nested field path
    pub fn get_path(&self, path: &FieldPath) -> Option<&FieldValue> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.fields.get(first)?;
        for segment in rest {
            current = current.as_map()?.fields.get(segment)?;
        }
        Some(current)
    }

    /// Insert or replace a top-level field, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Underlying map
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Consume, returning the underlying map
    pub fn into_fields(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }

    /// Render as a JSON object (see [`FieldValue::to_json`])
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for ObjectValue {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
