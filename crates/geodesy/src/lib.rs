//! Geospatial primitives for Carfinder
//!
//! This crate provides the coordinate type shared by every other crate,
//! great-circle distance and bearing calculations, and compass helpers
//! for turning bearings into arrow rotations and direction labels.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bearing;
pub mod compass;
pub mod distance;

pub use bearing::{bearing_between, initial_bearing_degrees, BearingResult};
pub use compass::{normalize_degrees, shortest_rotation, CompassDirection};
pub use distance::{distance_meters, EARTH_RADIUS_METERS};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geodesy error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside of [-90, 90] or not finite
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside of [-180, 180] or not finite
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),
}

/// Result type for geodesy operations
pub type Result<T> = std::result::Result<T, GeoError>;

/// A point on the Earth's surface in decimal degrees
///
/// Serializes as `{"latitude": .., "longitude": ..}`, which is also the
/// format of the persisted parking location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self { latitude, longitude };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Create a coordinate without range checks
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check that latitude and longitude are finite and in range
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeoError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// Great-circle distance to another coordinate in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_meters(self, other)
    }

    /// Initial bearing towards another coordinate in degrees
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        initial_bearing_degrees(self, other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
