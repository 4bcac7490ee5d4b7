//! Location services

use async_trait::async_trait;
use geodesy::Coordinate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::subscription::Subscription;

/// Outcome of a foreground location permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Access granted
    Granted,
    /// Access refused
    Denied,
    /// The user has not answered yet
    Undetermined,
}

impl PermissionStatus {
    /// Whether location may be read
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Requested accuracy for a position fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationAccuracy {
    /// Accurate to about 3 km
    Lowest,
    /// Accurate to about 1 km
    Low,
    /// Accurate to about 100 m
    #[default]
    Balanced,
    /// Accurate to about 10 m
    High,
    /// Best the device can do
    Highest,
}

/// Options for a continuous position watch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchOptions {
    /// Requested accuracy
    pub accuracy: LocationAccuracy,
    /// Minimum movement in meters between updates
    pub distance_interval_m: f64,
    /// Minimum time between updates
    #[serde(with = "duration_millis")]
    pub time_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            accuracy: LocationAccuracy::High,
            distance_interval_m: 1.0,
            time_interval: Duration::from_secs(1),
        }
    }
}

impl WatchOptions {
    /// Set the requested accuracy
    pub fn accuracy(mut self, accuracy: LocationAccuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the minimum movement between updates
    pub fn distance_interval_m(mut self, meters: f64) -> Self {
        self.distance_interval_m = meters;
        self
    }

    /// Set the minimum time between updates
    pub fn time_interval(mut self, interval: Duration) -> Self {
        self.time_interval = interval;
        self
    }
}

/// Device location service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground location access
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Fetch a single position fix
    async fn current_position(&self, accuracy: LocationAccuracy) -> Result<Coordinate>;

    /// Start a continuous position watch
    async fn watch_position(&self, options: WatchOptions) -> Result<Subscription<Coordinate>>;
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
