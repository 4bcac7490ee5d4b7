//! Parking session persistence
//!
//! A session is stored under two keys: the location as JSON and the start
//! time as a decimal string of epoch milliseconds. This matches the records
//! written by earlier releases of the app, which must keep loading.

use app_platform::Clock;
use geodesy::Coordinate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use storage::{KeyValueStorage, KvError};
use thiserror::Error;

/// Storage key of the parked location
pub const PARKED_LOCATION_KEY: &str = "parkedLocation";

/// Storage key of the parking start time
pub const PARKING_START_TIME_KEY: &str = "parkingStartTime";

/// Parking store errors
#[derive(Debug, Error)]
pub enum ParkingStoreError {
    /// Reading a key failed
    #[error("Failed to read {key}: {source}")]
    Read {
        /// Key being read
        key: &'static str,
        /// Storage error
        #[source]
        source: KvError,
    },

    /// A stored value could not be understood
    #[error("Corrupt value under {key}: {reason}")]
    Corrupt {
        /// Key holding the value
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A location was found without a start time and synthesizing one is disabled
    #[error("Parking start time missing")]
    MissingStartTime,

    /// Nothing was written
    #[error("Failed to save parking session: {0}")]
    Write(#[source] KvError),

    /// The location was written but the start time was not
    #[error("Parking session only partially saved: {0}")]
    PartialWrite(String),

    /// Removing the session failed
    #[error("Failed to clear parking session: {0}")]
    Clear(#[source] KvError),
}

impl ParkingStoreError {
    /// Whether this came from loading a session
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            ParkingStoreError::Read { .. }
                | ParkingStoreError::Corrupt { .. }
                | ParkingStoreError::MissingStartTime
        )
    }

    /// Whether this came from saving or clearing a session
    pub fn is_write(&self) -> bool {
        !self.is_read()
    }
}

/// Result type for parking store operations
pub type Result<T> = std::result::Result<T, ParkingStoreError>;

/// A saved parking spot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSession {
    /// Where the car is
    pub location: Coordinate,
    /// When parking started, epoch milliseconds
    pub started_at_ms: i64,
}

impl ParkingSession {
    /// Create a session
    pub fn new(location: Coordinate, started_at_ms: i64) -> Self {
        Self { location, started_at_ms }
    }

    /// Time parked as of `now_ms`; zero if the clock is behind the start
    pub fn elapsed(&self, now_ms: i64) -> Duration {
        let millis = now_ms.saturating_sub(self.started_at_ms).max(0);
        Duration::from_millis(millis as u64)
    }
}

/// What to do when a location is stored without a start time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingStartTime {
    /// Use the current time and persist it
    #[default]
    Synthesize,
    /// Treat the record as broken
    Reject,
}

/// Parking store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkingStoreConfig {
    /// Policy for records without a start time
    pub missing_start_time: MissingStartTime,
}

impl ParkingStoreConfig {
    /// Set the missing start time policy
    pub fn missing_start_time(mut self, policy: MissingStartTime) -> Self {
        self.missing_start_time = policy;
        self
    }
}

/// Loads, saves and clears the single parking session
#[derive(Clone)]
pub struct ParkingSessionStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    config: ParkingStoreConfig,
}

impl ParkingSessionStore {
    /// Create a store
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        config: ParkingStoreConfig,
    ) -> Self {
        Self { storage, clock, config }
    }

    /// Load the saved session, if any
    pub async fn load(&self) -> Result<Option<ParkingSession>> {
        let Some(location) = self.load_location().await? else {
            tracing::debug!("No saved parking location");
            return Ok(None);
        };

        let raw_start = self.read(PARKING_START_TIME_KEY).await?;
        let started_at_ms = match raw_start {
            Some(raw) => parse_start_time(&raw)?,
            None => self.missing_start_time().await?,
        };

        tracing::info!(%location, started_at_ms, "Loaded parking session");
        Ok(Some(ParkingSession { location, started_at_ms }))
    }

    /// Load only the saved location, without touching the start time
    pub async fn load_location(&self) -> Result<Option<Coordinate>> {
        match self.read(PARKED_LOCATION_KEY).await? {
            Some(raw) => parse_location(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Persist a session.
    ///
    /// Both keys are written and read back. If anything after the first
    /// write fails, the location is removed again so a half-written session
    /// is not restored on the next launch.
    pub async fn save(&self, session: &ParkingSession) -> Result<()> {
        let location_json = serde_json::to_string(&session.location)
            .map_err(|e| ParkingStoreError::Write(KvError::Unavailable(e.to_string())))?;

        self.storage
            .set_item(PARKED_LOCATION_KEY, &location_json)
            .await
            .map_err(ParkingStoreError::Write)?;

        if let Err(reason) = self.finish_save(session).await {
            tracing::error!(%reason, "Parking session partially saved, rolling back");
            if let Err(e) = self.storage.remove_item(PARKED_LOCATION_KEY).await {
                tracing::warn!("Rollback of parked location failed: {}", e);
            }
            return Err(ParkingStoreError::PartialWrite(reason));
        }

        tracing::info!(
            location = %session.location,
            started_at_ms = session.started_at_ms,
            "Saved parking session"
        );
        Ok(())
    }

    /// Remove the saved session
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_item(PARKED_LOCATION_KEY).await.map_err(ParkingStoreError::Clear)?;
        self.storage
            .remove_item(PARKING_START_TIME_KEY)
            .await
            .map_err(ParkingStoreError::Clear)?;
        tracing::info!("Cleared parking session");
        Ok(())
    }

    async fn finish_save(&self, session: &ParkingSession) -> std::result::Result<(), String> {
        self.storage
            .set_item(PARKING_START_TIME_KEY, &session.started_at_ms.to_string())
            .await
            .map_err(|e| e.to_string())?;

        let saved_location =
            self.storage.get_item(PARKED_LOCATION_KEY).await.map_err(|e| e.to_string())?;
        let saved_start =
            self.storage.get_item(PARKING_START_TIME_KEY).await.map_err(|e| e.to_string())?;

        if saved_location.is_none() || saved_start.is_none() {
            return Err("saved keys missing on read-back".to_string());
        }
        Ok(())
    }

    async fn missing_start_time(&self) -> Result<i64> {
        match self.config.missing_start_time {
            MissingStartTime::Reject => Err(ParkingStoreError::MissingStartTime),
            MissingStartTime::Synthesize => {
                let now = self.clock.now_millis();
                tracing::warn!(now, "Parking start time missing, using current time");
                // The session is usable even if this write fails
                let written = self.storage.set_item(PARKING_START_TIME_KEY, &now.to_string()).await;
                if let Err(e) = written {
                    tracing::warn!("Failed to persist synthesized start time: {}", e);
                }
                Ok(now)
            }
        }
    }

    async fn read(&self, key: &'static str) -> Result<Option<String>> {
        self.storage.get_item(key).await.map_err(|source| ParkingStoreError::Read { key, source })
    }
}

fn parse_location(raw: &str) -> Result<Coordinate> {
    let location: Coordinate = serde_json::from_str(raw).map_err(|e| {
        ParkingStoreError::Corrupt { key: PARKED_LOCATION_KEY, reason: e.to_string() }
    })?;
    location.validate().map_err(|e| ParkingStoreError::Corrupt {
        key: PARKED_LOCATION_KEY,
        reason: e.to_string(),
    })?;
    Ok(location)
}

fn parse_start_time(raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|e| ParkingStoreError::Corrupt {
        key: PARKING_START_TIME_KEY,
        reason: format!("{raw:?}: {e}"),
    })
}
