//! Cloud Firestore document model and protocol codecs
//!
//! # Module layout
//! - `database_id.rs`, `resource_path.rs`, `document_key.rs`,
//!   `field_path.rs`: addressing
//! - `field_value.rs`, `timestamp.rs`, `geo_point.rs`: values
//! - `document.rs`, `snapshot_version.rs`, `mutation.rs`: documents and writes
//! - `filter.rs`, `query.rs`, `query_data.rs`: queries and listen targets
//! - `remote/`: the [`Serializer`] that turns all of the above into wire bytes

pub mod database_id;
pub mod document;
pub mod document_key;
pub mod field_path;
pub mod field_value;
pub mod filter;
pub mod geo_point;
pub mod mutation;
pub mod query;
pub mod query_data;
pub mod resource_path;
pub mod snapshot_version;
pub mod timestamp;

/// Wire codecs
pub mod remote;

pub use database_id::DatabaseId;
pub use document::MaybeDocument;
pub use document_key::DocumentKey;
pub use field_path::FieldPath;
pub use field_value::{Blob, FieldValue, ObjectValue, ValueType};
pub use filter::{CompositeOperator, Filter, Operator, UnaryOperator};
pub use geo_point::GeoPoint;
pub use mutation::{Mutation, Precondition};
pub use query::{Bound, Direction, OrderBy, Query};
pub use query_data::{QueryData, QueryPurpose};
pub use remote::Serializer;
pub use resource_path::ResourcePath;
pub use snapshot_version::SnapshotVersion;
pub use timestamp::Timestamp;
