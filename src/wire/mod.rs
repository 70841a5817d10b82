//! Protocol Buffers wire primitives
//!
//! A minimal reader/writer pair over byte buffers, built on the low-level
//! `prost::encoding` functions rather than generated message types. Message
//! layouts are mapped by hand in `firestore::remote`.
//!
//! - [`Reader`]: tag/varint/fixed64/length-delimited decoding with a sticky
//!   data-loss state and handler-driven message dispatch
//! - [`Writer`]: the symmetric append-only encoder

mod reader;
mod writer;

pub use prost::encoding::WireType;
pub use reader::Reader;
pub use writer::Writer;

/// Maximum nesting depth of embedded messages accepted by [`Reader`]
pub const RECURSION_LIMIT: u32 = 100;

/// A decoded field key: field number plus wire type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Field number from the schema
    pub field_number: u32,

    /// Framing of the payload that follows
    pub wire_type: WireType,
}

impl Tag {
    /// Create a tag
    pub fn new(field_number: u32, wire_type: WireType) -> Self {
        Self {
            field_number,
            wire_type,
        }
    }
}
