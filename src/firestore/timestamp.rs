//! Firestore Timestamp type
//!
//! Representable range is `0001-01-01T00:00:00Z` through
//! `9999-12-31T23:59:59.999999999Z`, the range of `google.protobuf.Timestamp`
//! that Firestore accepts.

use crate::error::FirestoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field_value::FieldValue;

/// Firestore timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since Unix epoch
    pub seconds: i64,

    /// Nanoseconds component (0-999,999,999)
    pub nanoseconds: i32,
}

impl Timestamp {
    /// Seconds of `0001-01-01T00:00:00Z`
    pub const MIN_SECONDS: i64 = -62_135_596_800;

    /// Seconds of `9999-12-31T23:59:59Z`
    pub const MAX_SECONDS: i64 = 253_402_300_799;

    /// Earliest representable instant
    pub const MIN: Timestamp = Timestamp {
        seconds: Self::MIN_SECONDS,
        nanoseconds: 0,
    };

    /// Latest representable instant
    pub const MAX: Timestamp = Timestamp {
        seconds: Self::MAX_SECONDS,
        nanoseconds: 999_999_999,
    };

    /// Create a new timestamp
    pub fn new(seconds: i64, nanoseconds: i32) -> Result<Self, FirestoreError> {
        if nanoseconds < 0 || nanoseconds >= 1_000_000_000 {
            return Err(FirestoreError::InvalidArgument(format!(
                "nanoseconds must be in range [0, 999999999], got {}",
                nanoseconds
            )));
        }

        if seconds < Self::MIN_SECONDS || seconds > Self::MAX_SECONDS {
            return Err(FirestoreError::InvalidArgument(format!(
                "seconds must be in range [{}, {}], got {}",
                Self::MIN_SECONDS,
                Self::MAX_SECONDS,
                seconds
            )));
        }

        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    /// The Unix epoch
    pub const fn epoch() -> Self {
        Self {
            seconds: 0,
            nanoseconds: 0,
        }
    }

    /// Convert from DateTime.
    ///
    /// Fails for instants outside the representable range and for leap
    /// seconds, which chrono reports with a nanosecond count of 1e9 or more.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, FirestoreError> {
        let nanoseconds = i32::try_from(dt.timestamp_subsec_nanos()).map_err(|_| {
            FirestoreError::InvalidArgument(format!("nanoseconds out of range in {}", dt))
        })?;
        Self::new(dt.timestamp(), nanoseconds)
    }

    /// Convert to DateTime
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanoseconds).ok()?;
        DateTime::from_timestamp(self.seconds, nanos)
    }

    /// Wrap as a field value
    pub fn to_value(&self) -> FieldValue {
        FieldValue::Timestamp(*self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::epoch()
    }
}

impl From<Timestamp> for prost_types::Timestamp {
    fn from(ts: Timestamp) -> Self {
        prost_types::Timestamp {
            seconds: ts.seconds,
            nanos: ts.nanoseconds,
        }
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = FirestoreError;

    fn try_from(dt: DateTime<Utc>) -> Result<Self, Self::Error> {
        Timestamp::from_datetime(dt)
    }
}

impl TryFrom<prost_types::Timestamp> for Timestamp {
    type Error = FirestoreError;

    fn try_from(ts: prost_types::Timestamp) -> Result<Self, Self::Error> {
        Timestamp::new(ts.seconds, ts.nanos)
    }
}
