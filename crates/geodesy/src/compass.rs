//! Compass helpers
//!
//! Angle normalization, shortest-path rotation for animating an arrow, and
//! the eight-point compass rose.

use serde::{Deserialize, Serialize};

/// Wrap any angle in degrees into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = ((degrees % 360.0) + 360.0) % 360.0;
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed rotation in degrees that takes `from` to `to` along the shorter arc.
///
/// The result lies in (-180, 180]; a half turn is reported as +180.
pub fn shortest_rotation(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Eight-point compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    /// North
    N,
    /// North-east
    NE,
    /// East
    E,
    /// South-east
    SE,
    /// South
    S,
    /// South-west
    SW,
    /// West
    W,
    /// North-west
    NW,
}

impl CompassDirection {
    /// All directions clockwise from north
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
    ];

    /// Bucket a bearing into one of eight 45° sectors.
    ///
    /// Sectors are centered on the cardinal and intercardinal points. A
    /// bearing exactly on a boundary belongs to the next sector clockwise,
    /// so 22.5° is NE and 337.5° is N.
    pub fn from_bearing(bearing: f64) -> Self {
        let shifted = normalize_degrees(bearing + 22.5);
        let index = (shifted / 45.0).floor() as usize % 8;
        Self::ALL[index]
    }

    /// Short label such as "N" or "SW"
    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NE => "NE",
            CompassDirection::E => "E",
            CompassDirection::SE => "SE",
            CompassDirection::S => "S",
            CompassDirection::SW => "SW",
            CompassDirection::W => "W",
            CompassDirection::NW => "NW",
        }
    }

    /// Center bearing of the sector in degrees
    pub fn center_degrees(&self) -> f64 {
        let index = Self::ALL.iter().position(|d| d == self).unwrap_or(0);
        index as f64 * 45.0
    }
}

impl std::fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}
