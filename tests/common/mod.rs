//! Shared helpers for the integration tests
//!
//! `v1` mirrors the subset of `google.firestore.v1` the serializer speaks,
//! declared by hand with `prost` derives. It is the independent encoder and
//! decoder the serializer output is checked against.

#![allow(dead_code)]

use firestore_serializer::{DatabaseId, Serializer};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Serializer for `projects/p/databases/d`
pub fn serializer() -> Serializer {
    init_tracing();
    Serializer::new(DatabaseId::new("p", "d"))
}

/// Parse a hex fixture, ignoring whitespace
pub fn fixture(hex_bytes: &str) -> Vec<u8> {
    let compact: String = hex_bytes.split_whitespace().collect();
    hex::decode(compact).expect("valid hex fixture")
}

pub mod v1 {
    use std::collections::HashMap;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Value {
        #[prost(oneof = "value::ValueType", tags = "11, 1, 2, 3, 10, 17, 18, 5, 8, 9, 6")]
        pub value_type: Option<value::ValueType>,
    }

    pub mod value {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum ValueType {
            #[prost(int32, tag = "11")]
            NullValue(i32),
            #[prost(bool, tag = "1")]
            BooleanValue(bool),
            #[prost(int64, tag = "2")]
            IntegerValue(i64),
            #[prost(double, tag = "3")]
            DoubleValue(f64),
            #[prost(message, tag = "10")]
            TimestampValue(prost_types::Timestamp),
            #[prost(string, tag = "17")]
            StringValue(String),
            #[prost(bytes = "vec", tag = "18")]
            BytesValue(Vec<u8>),
            #[prost(string, tag = "5")]
            ReferenceValue(String),
            #[prost(message, tag = "8")]
            GeoPointValue(super::LatLng),
            #[prost(message, tag = "9")]
            ArrayValue(super::ArrayValue),
            #[prost(message, tag = "6")]
            MapValue(super::MapValue),
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct LatLng {
        #[prost(double, tag = "1")]
        pub latitude: f64,
        #[prost(double, tag = "2")]
        pub longitude: f64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ArrayValue {
        #[prost(message, repeated, tag = "1")]
        pub values: Vec<Value>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct MapValue {
        #[prost(map = "string, message", tag = "1")]
        pub fields: HashMap<String, Value>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Document {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(map = "string, message", tag = "2")]
        pub fields: HashMap<String, Value>,
        #[prost(message, optional, tag = "3")]
        pub create_time: Option<prost_types::Timestamp>,
        #[prost(message, optional, tag = "4")]
        pub update_time: Option<prost_types::Timestamp>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct BatchGetDocumentsResponse {
        #[prost(oneof = "batch_get_documents_response::Result", tags = "1, 2")]
        pub result: Option<batch_get_documents_response::Result>,
        #[prost(bytes = "vec", tag = "3")]
        pub transaction: Vec<u8>,
        #[prost(message, optional, tag = "4")]
        pub read_time: Option<prost_types::Timestamp>,
    }

    pub mod batch_get_documents_response {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum Result {
            #[prost(message, tag = "1")]
            Found(super::Document),
            #[prost(string, tag = "2")]
            Missing(String),
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Write {
        #[prost(oneof = "write::Operation", tags = "1, 2")]
        pub operation: Option<write::Operation>,
        #[prost(message, optional, tag = "3")]
        pub update_mask: Option<DocumentMask>,
        #[prost(message, optional, tag = "4")]
        pub current_document: Option<Precondition>,
    }

    pub mod write {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum Operation {
            #[prost(message, tag = "1")]
            Update(super::Document),
            #[prost(string, tag = "2")]
            Delete(String),
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct DocumentMask {
        #[prost(string, repeated, tag = "1")]
        pub field_paths: Vec<String>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Precondition {
        #[prost(oneof = "precondition::ConditionType", tags = "1, 2")]
        pub condition_type: Option<precondition::ConditionType>,
    }

    pub mod precondition {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum ConditionType {
            #[prost(bool, tag = "1")]
            Exists(bool),
            #[prost(message, tag = "2")]
            UpdateTime(prost_types::Timestamp),
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Target {
        #[prost(oneof = "target::TargetType", tags = "2, 3")]
        pub target_type: Option<target::TargetType>,
        #[prost(bytes = "vec", tag = "4")]
        pub resume_token: Vec<u8>,
        #[prost(int32, tag = "5")]
        pub target_id: i32,
    }

    pub mod target {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum TargetType {
            #[prost(message, tag = "2")]
            Query(super::QueryTarget),
            #[prost(message, tag = "3")]
            Documents(super::DocumentsTarget),
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct DocumentsTarget {
        #[prost(string, repeated, tag = "2")]
        pub documents: Vec<String>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct QueryTarget {
        #[prost(string, tag = "1")]
        pub parent: String,
        #[prost(message, optional, tag = "2")]
        pub structured_query: Option<StructuredQuery>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct StructuredQuery {
        #[prost(message, repeated, tag = "2")]
        pub from: Vec<CollectionSelector>,
        #[prost(message, optional, tag = "3")]
        pub r#where: Option<Filter>,
        #[prost(message, repeated, tag = "4")]
        pub order_by: Vec<Order>,
        #[prost(message, optional, tag = "5")]
        pub limit: Option<Int32Value>,
        #[prost(message, optional, tag = "7")]
        pub start_at: Option<Cursor>,
        #[prost(message, optional, tag = "8")]
        pub end_at: Option<Cursor>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct CollectionSelector {
        #[prost(string, tag = "2")]
        pub collection_id: String,
        #[prost(bool, tag = "3")]
        pub all_descendants: bool,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Int32Value {
        #[prost(int32, tag = "1")]
        pub value: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Filter {
        #[prost(oneof = "filter::FilterType", tags = "1, 2, 3")]
        pub filter_type: Option<filter::FilterType>,
    }

    pub mod filter {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum FilterType {
            #[prost(message, tag = "1")]
            CompositeFilter(super::CompositeFilter),
            #[prost(message, tag = "2")]
            FieldFilter(super::FieldFilter),
            #[prost(message, tag = "3")]
            UnaryFilter(super::UnaryFilter),
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct CompositeFilter {
        #[prost(int32, tag = "1")]
        pub op: i32,
        #[prost(message, repeated, tag = "2")]
        pub filters: Vec<Filter>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct FieldFilter {
        #[prost(message, optional, tag = "1")]
        pub field: Option<FieldReference>,
        #[prost(int32, tag = "2")]
        pub op: i32,
        #[prost(message, optional, tag = "3")]
        pub value: Option<Value>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct UnaryFilter {
        #[prost(int32, tag = "1")]
        pub op: i32,
        #[prost(message, optional, tag = "2")]
        pub field: Option<FieldReference>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct FieldReference {
        #[prost(string, tag = "2")]
        pub field_path: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Order {
        #[prost(message, optional, tag = "1")]
        pub field: Option<FieldReference>,
        #[prost(int32, tag = "2")]
        pub direction: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Cursor {
        #[prost(message, repeated, tag = "1")]
        pub values: Vec<Value>,
        #[prost(bool, tag = "2")]
        pub before: bool,
    }

    /// Shorthand constructors for value messages
    pub fn value(value_type: value::ValueType) -> Value {
        Value {
            value_type: Some(value_type),
        }
    }

    pub fn null_value() -> Value {
        value(value::ValueType::NullValue(0))
    }

    pub fn bool_value(b: bool) -> Value {
        value(value::ValueType::BooleanValue(b))
    }

    pub fn integer_value(i: i64) -> Value {
        value(value::ValueType::IntegerValue(i))
    }

    pub fn double_value(d: f64) -> Value {
        value(value::ValueType::DoubleValue(d))
    }

    pub fn string_value(s: &str) -> Value {
        value(value::ValueType::StringValue(s.to_string()))
    }

    pub fn map_value<const N: usize>(entries: [(&str, Value); N]) -> Value {
        value(value::ValueType::MapValue(MapValue {
            fields: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }))
    }

    pub fn field_reference(path: &str) -> Option<FieldReference> {
        Some(FieldReference {
            field_path: path.to_string(),
        })
    }

    pub fn order(path: &str, direction: i32) -> Order {
        Order {
            field: field_reference(path),
            direction,
        }
    }

    pub fn timestamp(seconds: i64, nanos: i32) -> prost_types::Timestamp {
        prost_types::Timestamp { seconds, nanos }
    }
}
