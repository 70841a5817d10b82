//! Document mutations

use super::document_key::DocumentKey;
use super::field_path::FieldPath;
use super::field_value::ObjectValue;
use super::snapshot_version::SnapshotVersion;

/// Condition the stored document must satisfy for a mutation to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precondition {
    /// No condition
    #[default]
    None,

    /// The document must (or must not) exist
    Exists(bool),

    /// The document must have been last updated at exactly this version
    UpdateTime(SnapshotVersion),
}

impl Precondition {
    /// True for [`Precondition::None`]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A single write to one document
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Replace the document contents
    Set {
        /// Target document
        key: DocumentKey,
        /// New contents
        value: ObjectValue,
        /// Condition for applying
        precondition: Precondition,
    },

    /// Overwrite only the fields named in `mask`
    Patch {
        /// Target document
        key: DocumentKey,
        /// Values for the masked fields
        value: ObjectValue,
        /// Fields to write; masked fields absent from `value` are deleted
        mask: Vec<FieldPath>,
        /// Condition for applying
        precondition: Precondition,
    },

    /// Delete the document
    Delete {
        /// Target document
        key: DocumentKey,
        /// Condition for applying
        precondition: Precondition,
    },
}

impl Mutation {
    /// Unconditional set
    pub fn set(key: DocumentKey, value: ObjectValue) -> Self {
        Self::Set {
            key,
            value,
            precondition: Precondition::None,
        }
    }

    /// Patch that requires the document to exist
    pub fn patch(key: DocumentKey, value: ObjectValue, mask: Vec<FieldPath>) -> Self {
        Self::Patch {
            key,
            value,
            mask,
            precondition: Precondition::Exists(true),
        }
    }

    /// Unconditional delete
    pub fn delete(key: DocumentKey) -> Self {
        Self::Delete {
            key,
            precondition: Precondition::None,
        }
    }

    /// Replace the precondition
    pub fn with_precondition(self, precondition: Precondition) -> Self {
        match self {
            Self::Set { key, value, .. } => Self::Set {
                key,
                value,
                precondition,
            },
            Self::Patch {
                key, value, mask, ..
            } => Self::Patch {
                key,
                value,
                mask,
                precondition,
            },
            Self::Delete { key, .. } => Self::Delete { key, precondition },
        }
    }

    /// Target document
    pub fn key(&self) -> &DocumentKey {
        match self {
            Self::Set { key, .. } | Self::Patch { key, .. } | Self::Delete { key, .. } => key,
        }
    }

    /// Condition for applying
    pub fn precondition(&self) -> Precondition {
        match self {
            Self::Set { precondition, .. }
            | Self::Patch { precondition, .. }
            | Self::Delete { precondition, .. } => *precondition,
        }
    }
}
