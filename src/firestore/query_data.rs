//! Listen target metadata

use super::query::Query;
use super::snapshot_version::SnapshotVersion;

/// Why a target is being listened to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryPurpose {
    /// A regular user listen
    #[default]
    Listen,

    /// Re-listen after an existence filter reported a mismatch
    ExistenceFilterMismatch,

    /// Resolve a document the client is unsure about
    LimboResolution,
}

/// A query plus the bookkeeping needed to listen to it
#[derive(Debug, Clone, PartialEq)]
pub struct QueryData {
    /// Query being listened to
    pub query: Query,
    /// Target id assigned by the client
    pub target_id: i32,
    /// Sequence number of the last listen
    pub sequence_number: i64,
    /// Reason for the listen
    pub purpose: QueryPurpose,
    /// Version the resume token corresponds to
    pub snapshot_version: SnapshotVersion,
    /// Opaque token for resuming the stream; empty if none
    pub resume_token: Vec<u8>,
}

impl QueryData {
    /// Create listen metadata with no resume state
    pub fn new(query: Query, target_id: i32, sequence_number: i64, purpose: QueryPurpose) -> Self {
        Self {
            query,
            target_id,
            sequence_number,
            purpose,
            snapshot_version: SnapshotVersion::none(),
            resume_token: Vec::new(),
        }
    }

    /// Copy with a new resume token and the version it belongs to
    pub fn with_resume_token(
        self,
        resume_token: impl Into<Vec<u8>>,
        snapshot_version: SnapshotVersion,
    ) -> Self {
        Self {
            resume_token: resume_token.into(),
            snapshot_version,
            ..self
        }
    }
}
