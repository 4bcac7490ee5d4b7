//! Initial bearing (forward azimuth)

use serde::{Deserialize, Serialize};

use crate::{distance_meters, Coordinate};

/// Distance and initial bearing from one coordinate to another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BearingResult {
    /// Great-circle distance in meters, never negative
    pub distance_meters: f64,
    /// Initial bearing in degrees clockwise from north, in [0, 360)
    pub initial_bearing_degrees: f64,
}

/// Initial bearing from `from` to `to` in degrees, normalized into [0, 360).
///
/// The bearing between identical points is undefined; 0 is returned.
pub fn initial_bearing_degrees(from: &Coordinate, to: &Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let mut bearing = y.atan2(x).to_degrees();
    if bearing < 0.0 {
        bearing += 360.0;
    }
    // -0.0 and tiny negatives round up to exactly 360.0
    if bearing >= 360.0 {
        bearing -= 360.0;
    }
    bearing
}

/// Compute distance and bearing in one go
pub fn bearing_between(from: &Coordinate, to: &Coordinate) -> BearingResult {
    BearingResult {
        distance_meters: distance_meters(from, to),
        initial_bearing_degrees: initial_bearing_degrees(from, to),
    }
}
