//! Dotted field paths into a document
//!
//! The wire format (`FieldReference.field_path`) carries the canonical form:
//! segments joined with `.`, where any segment that is not a plain identifier
//! is wrapped in backticks with `\` and `` ` `` escaped.

use crate::error::FirestoreError;
use std::fmt;

/// Path to a (possibly nested) field of a document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Reserved field name that refers to the document key
    pub const KEY_FIELD_NAME: &'static str = "__name__";

    /// Build a path from segments, rejecting an empty path or empty segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self, FirestoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(FirestoreError::invalid_argument(format!(
                "invalid field path {:?}: empty segment",
                segments
            )));
        }
        Ok(Self { segments })
    }

    /// Split a user-facing dotted path like `address.city`
    pub fn from_dot_separated(path: &str) -> Result<Self, FirestoreError> {
        Self::from_segments(path.split('.'))
    }

    /// The path that refers to the document key
    pub fn key_path() -> Self {
        Self {
            segments: vec![Self::KEY_FIELD_NAME.to_string()],
        }
    }

    /// True if this path refers to the document key
    pub fn is_key_field_path(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == Self::KEY_FIELD_NAME
    }

    /// The individual segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Parse the canonical (server) form, honouring backtick quoting
    pub fn from_server_format(path: &str) -> Result<Self, FirestoreError> {
        let invalid = |reason: &str| {
            FirestoreError::invalid_argument(format!("invalid field path '{}': {}", path, reason))
        };

        let mut segments = Vec::new();
        let mut segment = String::new();
        let mut quoted = false;
        let mut chars = path.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => segment.push(escaped),
                    None => return Err(invalid("trailing escape character")),
                },
                '`' => quoted = !quoted,
                '.' if !quoted => {
                    if segment.is_empty() {
                        return Err(invalid("empty segment"));
                    }
                    segments.push(std::mem::take(&mut segment));
                }
                _ => segment.push(c),
            }
        }

        if quoted {
            return Err(invalid("unterminated backtick"));
        }
        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }
        segments.push(segment);

        Ok(Self { segments })
    }

    /// Canonical (server) string form
    pub fn canonical_string(&self) -> String {
        self.segments
            .iter()
            .map(|segment| quote_segment(segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_segment(segment: &str) -> String {
    if is_identifier(segment) {
        return segment.to_string();
    }
    let mut quoted = String::with_capacity(segment.len() + 2);
    quoted.push('`');
    for c in segment.chars() {
        if c == '\\' || c == '`' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}
