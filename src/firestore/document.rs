//! Document lookup results

use super::document_key::DocumentKey;
use super::field_value::ObjectValue;
use super::snapshot_version::SnapshotVersion;

/// Result of looking up a single document
#[derive(Debug, Clone, PartialEq)]
pub enum MaybeDocument {
    /// The document exists
    Document {
        /// Key of the document
        key: DocumentKey,
        /// Field contents
        data: ObjectValue,
        /// Last update time
        version: SnapshotVersion,
    },

    /// The document is known not to exist as of `version`
    NoDocument {
        /// Key of the missing document
        key: DocumentKey,
        /// Read time at which it was missing
        version: SnapshotVersion,
    },

    /// The document exists but its contents are not known
    UnknownDocument {
        /// Key of the document
        key: DocumentKey,
        /// Version at which it was known to exist
        version: SnapshotVersion,
    },

    /// Placeholder that never results from a successful decode
    Invalid,
}

impl MaybeDocument {
    /// Key of the document, `None` for [`MaybeDocument::Invalid`]
    pub fn key(&self) -> Option<&DocumentKey> {
        match self {
            Self::Document { key, .. }
            | Self::NoDocument { key, .. }
            | Self::UnknownDocument { key, .. } => Some(key),
            Self::Invalid => None,
        }
    }

    /// Version of the document, `None` for [`MaybeDocument::Invalid`]
    pub fn version(&self) -> Option<SnapshotVersion> {
        match self {
            Self::Document { version, .. }
            | Self::NoDocument { version, .. }
            | Self::UnknownDocument { version, .. } => Some(*version),
            Self::Invalid => None,
        }
    }

    /// Field contents, only for found documents
    pub fn data(&self) -> Option<&ObjectValue> {
        match self {
            Self::Document { data, .. } => Some(data),
            _ => None,
        }
    }

    /// True if the document was found
    pub fn exists(&self) -> bool {
        matches!(self, Self::Document { .. })
    }
}
