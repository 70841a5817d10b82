//! Snapshot versions

use super::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of a document or query result, as assigned by the backend.
///
/// Always wraps an in-range [`Timestamp`]; decoders reject anything else.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SnapshotVersion {
    timestamp: Timestamp,
}

impl SnapshotVersion {
    /// Create a version at the given instant
    pub const fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// The version of "no snapshot yet" (the epoch)
    pub const fn none() -> Self {
        Self::new(Timestamp::epoch())
    }

    /// Smallest representable version
    pub const fn min() -> Self {
        Self::new(Timestamp::MIN)
    }

    /// Largest representable version
    pub const fn max() -> Self {
        Self::new(Timestamp::MAX)
    }

    /// Underlying instant
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl From<Timestamp> for SnapshotVersion {
    fn from(timestamp: Timestamp) -> Self {
        Self::new(timestamp)
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SnapshotVersion({}.{:09})",
            self.timestamp.seconds, self.timestamp.nanoseconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_epoch() {
        assert_eq!(SnapshotVersion::none().timestamp(), Timestamp::epoch());
        assert_eq!(SnapshotVersion::none(), SnapshotVersion::default());
    }

    #[test]
    fn test_total_order() {
        let a = SnapshotVersion::new(Timestamp::new(1234, 5678).unwrap());
        let b = SnapshotVersion::new(Timestamp::new(1234, 5679).unwrap());
        assert!(SnapshotVersion::min() < a);
        assert!(a < b);
        assert!(b < SnapshotVersion::max());
    }

    #[test]
    fn test_display() {
        let v = SnapshotVersion::new(Timestamp::new(12, 5).unwrap());
        assert_eq!(v.to_string(), "SnapshotVersion(12.000000005)");
    }
}
