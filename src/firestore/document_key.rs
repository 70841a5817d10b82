//! Document keys

use super::resource_path::ResourcePath;
use crate::error::FirestoreError;
use std::fmt;

/// Key of a document: a resource path with an even number of segments
/// (alternating collection and document ids).
///
/// The empty path is accepted and names the documents root; this is what
/// decoding `projects/{p}/databases/{d}/documents` yields.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    /// Key of the documents root
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if `path` has the even length of a document path
    pub fn is_document_key(path: &ResourcePath) -> bool {
        path.len() % 2 == 0
    }

    /// Create a key from a path, rejecting odd lengths
    pub fn from_path(path: ResourcePath) -> Result<Self, FirestoreError> {
        if !Self::is_document_key(&path) {
            return Err(FirestoreError::invalid_argument(format!(
                "invalid document key path '{}': must have an even number of segments",
                path
            )));
        }
        Ok(Self { path })
    }

    /// Create a key from a slash-separated string such as `rooms/1`
    pub fn from_path_string(path: &str) -> Result<Self, FirestoreError> {
        Self::from_path(ResourcePath::from_string(path))
    }

    /// Create a key from individual segments; a segment may not be empty or
    /// contain `/`
    pub fn from_segments<I, S>(segments: I) -> Result<Self, FirestoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_path(ResourcePath::from_segments(segments)?)
    }

    /// Full path of the document
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// Consume the key, returning its path
    pub fn into_path(self) -> ResourcePath {
        self.path
    }

    /// Id of the document (last segment); `None` for the root
    pub fn document_id(&self) -> Option<&str> {
        self.path.last_segment()
    }

    /// Path of the collection that holds the document
    pub fn collection_path(&self) -> ResourcePath {
        self.path.without_last()
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}
