//! Slash-separated resource paths

use crate::error::FirestoreError;
use std::fmt;

/// Path to a collection or document, e.g. `rooms/1/messages`.
///
/// Segments are never empty and never contain `/`, so the slash-joined form
/// splits back into the same segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The empty path (the root of the database)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a path from already-split segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self, FirestoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse a slash-separated path. Empty segments (from leading, trailing
    /// or doubled slashes) are dropped.
    pub fn from_string(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// The individual segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// A new path with `segment` appended
    pub fn append(&self, segment: impl Into<String>) -> Result<Self, FirestoreError> {
        let segment = segment.into();
        check_segment(&segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// A new path with the last segment removed (the root stays the root)
    pub fn without_last(&self) -> Self {
        let end = self.segments.len().saturating_sub(1);
        Self {
            segments: self.segments[..end].to_vec(),
        }
    }

    /// True if every segment of `self` is a leading segment of `other`
    pub fn is_prefix_of(&self, other: &ResourcePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Segments joined with `/`
    pub fn canonical_string(&self) -> String {
        self.segments.join("/")
    }
}

fn check_segment(segment: &str) -> Result<(), FirestoreError> {
    if segment.is_empty() || segment.contains('/') {
        return Err(FirestoreError::invalid_argument(format!(
            "invalid path segment '{}': must be non-empty and contain no '/'",
            segment
        )));
    }
    Ok(())
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}
