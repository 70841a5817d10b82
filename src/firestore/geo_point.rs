//! Firestore GeoPoint type

use crate::error::FirestoreError;
use serde::{Deserialize, Serialize};

use super::field_value::FieldValue;

/// Geographic point (latitude/longitude)
///
/// Equality is bitwise on both coordinates so that decoded values compare
/// equal to what was encoded, including NaN coordinates received off the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (range: -90 to 90)
    pub latitude: f64,

    /// Longitude in degrees (range: -180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FirestoreError> {
        check_range("latitude", latitude, 90.0)?;
        check_range("longitude", longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Wrap as a field value
    pub fn to_value(&self) -> FieldValue {
        FieldValue::GeoPoint(*self)
    }
}

/// NaN fails the range check
fn check_range(name: &str, degrees: f64, limit: f64) -> Result<(), FirestoreError> {
    if (-limit..=limit).contains(&degrees) {
        return Ok(());
    }
    Err(FirestoreError::invalid_argument(format!(
        "{} must be in range [-{}, {}], got {}",
        name, limit, limit, degrees
    )))
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}
