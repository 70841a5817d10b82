//! Conversion between the document model and `google.firestore.v1` wire bytes
//!
//! Every codec is a method on [`Serializer`]; the methods are spread over one
//! file per message family.

mod document_codec;
mod serializer;
mod target_codec;
mod value_codec;

pub use serializer::Serializer;
