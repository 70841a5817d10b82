//! Firestore wire serializer
//!
//! Converts the Firestore document model (values, document keys, documents,
//! mutations, queries and listen targets) to and from the protocol-buffer
//! bytes of the `google.firestore.v1` API.
//!
//! # Example
//! ```
//! use firestore_serializer::{DatabaseId, FieldValue, Serializer};
//!
//! let serializer = Serializer::new(DatabaseId::new("my-project", "(default)"));
//! let bytes = serializer.encode_field_value(&FieldValue::Integer(42));
//! assert_eq!(serializer.decode_field_value(&bytes)?, FieldValue::Integer(42));
//! # Ok::<(), firestore_serializer::FirestoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod firestore;
pub mod wire;

// Re-exports for convenience
pub use error::{FirestoreError, Result};

pub use firestore::{
    Blob, Bound, DatabaseId, Direction, DocumentKey, FieldPath, FieldValue, Filter, GeoPoint,
    MaybeDocument, Mutation, ObjectValue, Operator, OrderBy, Precondition, Query, QueryData,
    QueryPurpose, ResourcePath, Serializer, SnapshotVersion, Timestamp, UnaryOperator, ValueType,
};
