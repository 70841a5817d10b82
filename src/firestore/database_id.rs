//! Database identity
//!
//! A `(project_id, database_id)` pair that every resource name is generated
//! from and validated against.

use super::resource_path::ResourcePath;
use crate::error::FirestoreError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Identifies one Firestore database
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatabaseId {
    project_id: String,
    database_id: String,
}

impl DatabaseId {
    /// Id of the database every project gets by default
    pub const DEFAULT: &'static str = "(default)";

    /// Environment variable holding the project id for [`DatabaseId::from_env`]
    pub const PROJECT_ID_ENV: &'static str = "FIRESTORE_PROJECT_ID";

    /// Environment variable holding the database id for [`DatabaseId::from_env`]
    pub const DATABASE_ID_ENV: &'static str = "FIRESTORE_DATABASE_ID";

    /// Create a database identity
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
        }
    }

    /// Identity of the `(default)` database of a project
    pub fn default_database(project_id: impl Into<String>) -> Self {
        Self::new(project_id, Self::DEFAULT)
    }

    /// Read the identity from `FIRESTORE_PROJECT_ID` and
    /// `FIRESTORE_DATABASE_ID` (the latter defaults to `(default)`)
    pub fn from_env() -> Result<Self, FirestoreError> {
        let project_id = env::var(Self::PROJECT_ID_ENV).map_err(|_| {
            FirestoreError::invalid_argument(format!("{} is not set", Self::PROJECT_ID_ENV))
        })?;
        if project_id.is_empty() {
            return Err(FirestoreError::invalid_argument(format!(
                "{} is empty",
                Self::PROJECT_ID_ENV
            )));
        }
        let database_id = env::var(Self::DATABASE_ID_ENV)
            .ok()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Self::DEFAULT.to_string());

        Ok(Self::new(project_id, database_id))
    }

    /// Project id
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Database id within the project
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// True for the `(default)` database
    pub fn is_default_database(&self) -> bool {
        self.database_id == Self::DEFAULT
    }

    /// Fully-qualified resource name of `path` in this database:
    /// `projects/{p}/databases/{d}/documents[/{path}]`
    pub fn resource_name(&self, path: &ResourcePath) -> String {
        let mut name = format!("{}/documents", self);
        for segment in path.segments() {
            name.push('/');
            name.push_str(segment);
        }
        name
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/databases/{}", self.project_id, self.database_id)
    }
}
