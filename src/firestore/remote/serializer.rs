//! Serializer entry point and resource names

use crate::error::{FirestoreError, Result};
use crate::firestore::database_id::DatabaseId;
use crate::firestore::document_key::DocumentKey;
use crate::firestore::resource_path::ResourcePath;

/// Encodes and decodes Firestore protocol messages for one database.
///
/// Holds nothing but the [`DatabaseId`], so it is cheap to clone and safe to
/// share between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serializer {
    database_id: DatabaseId,
}

impl Serializer {
    /// Create a serializer whose resource names point at `database_id`
    pub fn new(database_id: DatabaseId) -> Self {
        tracing::debug!(database = %database_id, "creating serializer");
        Self { database_id }
    }

    /// Database this serializer encodes for and validates against
    pub fn database_id(&self) -> &DatabaseId {
        &self.database_id
    }

    /// Resource name of `key`:
    /// `projects/{p}/databases/{d}/documents[/{path}]`
    pub fn encode_key(&self, key: &DocumentKey) -> String {
        self.database_id.resource_name(key.path())
    }

    /// Resource name of an arbitrary path in this database
    pub fn encode_resource_name(&self, path: &ResourcePath) -> String {
        self.database_id.resource_name(path)
    }

    /// Parse a resource name into a key of this database.
    ///
    /// Fails with invalid-argument when the name is malformed, names a
    /// different database, or has an odd number of local segments.
    pub fn decode_key(&self, name: &str) -> Result<DocumentKey> {
        let path = self.decode_local_path(name)?;
        DocumentKey::from_path(path)
    }

    /// Parse a resource name naming a document in any database.
    ///
    /// Used for reference values, which may point outside this database.
    pub fn decode_resource_name(name: &str) -> Result<(DatabaseId, DocumentKey)> {
        let (database_id, path) = split_resource_name(name)?;
        let key = DocumentKey::from_path(path)?;
        Ok((database_id, key))
    }

    /// Local path of a resource name that must belong to this database
    pub(crate) fn decode_local_path(&self, name: &str) -> Result<ResourcePath> {
        let (database_id, path) = split_resource_name(name)?;
        if database_id != self.database_id {
            return Err(FirestoreError::invalid_argument(format!(
                "resource name '{}' is not in database '{}'",
                name, self.database_id
            )));
        }
        Ok(path)
    }
}

/// Split `projects/{p}/databases/{d}/documents/...` into the database and the
/// local path. One leading slash is tolerated.
fn split_resource_name(name: &str) -> Result<(DatabaseId, ResourcePath)> {
    let trimmed = name.strip_prefix('/').unwrap_or(name);
    let segments: Vec<&str> = trimmed.split('/').collect();

    let invalid = || FirestoreError::invalid_argument(format!("invalid resource name '{}'", name));

    match segments.as_slice() {
        ["projects", project, "databases", database, "documents", local @ ..]
            if !project.is_empty() && !database.is_empty() =>
        {
            let path = ResourcePath::from_segments(local.iter().copied()).map_err(|_| invalid())?;
            Ok((DatabaseId::new(*project, *database), path))
        }
        _ => Err(invalid()),
    }
}
