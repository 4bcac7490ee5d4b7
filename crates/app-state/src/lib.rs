//! Application state for Carfinder
//!
//! This crate owns the parking session: persisting it, driving the
//! start/end/navigate lifecycle, refreshing the device position while a
//! session is active, and turning positions and headings into compass
//! readings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compass;
pub mod controller;
pub mod parking;
pub mod refresh;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use compass::{CompassDisplay, CompassReading, CompassTracker, CompassViewModel};
pub use controller::{ControllerConfig, ErrorKind, SessionController, SessionError, SessionStatus};
pub use parking::{
    MissingStartTime, ParkingSession, ParkingSessionStore, ParkingStoreConfig, ParkingStoreError,
    PARKED_LOCATION_KEY, PARKING_START_TIME_KEY,
};
pub use refresh::PositionRefresher;
pub use timer::{ElapsedTime, TimerVariant};
