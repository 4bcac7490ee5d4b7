//! Parking session lifecycle
//!
//! [`SessionController`] owns the single parking session and moves it
//! through its states:
//!
//! ```text
//! Unknown --initialize--> Loading --> Idle | Active | PermissionDenied
//! Idle    --start_parking--> Loading --> Active | Idle
//! Active  --end_parking----> Loading --> Idle   | Active
//! ```
//!
//! Every status change is published on a watch channel. While an operation
//! is in flight the status is `Loading` and every other operation is
//! rejected, so at most one storage operation is outstanding.

use app_platform::{
    Clock, HeadingSource, LaunchTarget, LocationAccuracy, LocationProvider, NavigationConfig,
    Navigator, PlatformError, UrlLauncher, WatchOptions,
};
use geodesy::Coordinate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::compass::{CompassTracker, CompassViewModel};
use crate::parking::{ParkingSession, ParkingSessionStore, ParkingStoreError};
use crate::refresh::PositionRefresher;

/// Where the parking session stands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionStatus {
    /// Not initialized yet
    Unknown,
    /// Location access was refused
    PermissionDenied,
    /// No car is parked
    Idle,
    /// A car is parked
    Active {
        /// The saved session
        session: ParkingSession,
    },
    /// An operation is in flight
    Loading,
}

impl SessionStatus {
    /// The session, when active
    pub fn session(&self) -> Option<ParkingSession> {
        match self {
            SessionStatus::Active { session } => Some(*session),
            _ => None,
        }
    }

    /// Whether a car is parked
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active { .. })
    }

    /// Short name of the state
    pub fn name(&self) -> &'static str {
        match self {
            SessionStatus::Unknown => "unknown",
            SessionStatus::PermissionDenied => "permission denied",
            SessionStatus::Idle => "idle",
            SessionStatus::Active { .. } => "active",
            SessionStatus::Loading => "loading",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category of a [`SessionError`], for choosing what to tell the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Location access refused
    PermissionDenied,
    /// No position fix
    LocationUnavailable,
    /// Loading the session failed
    StorageReadError,
    /// Saving or clearing the session failed
    StorageWriteError,
    /// No maps application could be opened
    NavigationLaunchFailed,
    /// No heading sensor
    HeadingUnavailable,
    /// Nothing is saved to navigate to
    NoSavedLocation,
    /// The operation is not allowed in the current state
    InvalidTransition,
}

/// Session controller errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Location access refused
    #[error("Location permission denied")]
    PermissionDenied,

    /// No position fix
    #[error("Location unavailable: {0}")]
    LocationUnavailable(#[source] PlatformError),

    /// Persistence failed
    #[error(transparent)]
    Storage(#[from] ParkingStoreError),

    /// Nothing is saved to navigate to
    #[error("No saved parking location")]
    NoSavedLocation,

    /// Neither the directions URL nor the geo URI could be opened
    #[error("Failed to open navigation: {0}")]
    NavigationLaunchFailed(#[source] PlatformError),

    /// No heading sensor
    #[error("Heading sensor unavailable")]
    HeadingUnavailable,

    /// The operation is not allowed in the current state
    #[error("Cannot {operation} while {status}")]
    InvalidTransition {
        /// Operation that was attempted
        operation: &'static str,
        /// Status at the time
        status: SessionStatus,
    },
}

impl SessionError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::PermissionDenied => ErrorKind::PermissionDenied,
            SessionError::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            SessionError::Storage(e) if e.is_read() => ErrorKind::StorageReadError,
            SessionError::Storage(_) => ErrorKind::StorageWriteError,
            SessionError::NoSavedLocation => ErrorKind::NoSavedLocation,
            SessionError::NavigationLaunchFailed(_) => ErrorKind::NavigationLaunchFailed,
            SessionError::HeadingUnavailable => ErrorKind::HeadingUnavailable,
            SessionError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
        }
    }

    fn from_location(error: PlatformError) -> Self {
        match error {
            PlatformError::PermissionDenied => SessionError::PermissionDenied,
            other => SessionError::LocationUnavailable(other),
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Session controller configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// How often the position is re-read while parked
    pub refresh_interval: Duration,
    /// Accuracy requested for the parking fix and refreshes
    pub accuracy: LocationAccuracy,
    /// Navigation links
    pub navigation: NavigationConfig,
    /// Position watch used by the compass
    pub compass_watch: WatchOptions,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(5),
            accuracy: LocationAccuracy::High,
            navigation: NavigationConfig::default(),
            compass_watch: WatchOptions::default(),
        }
    }
}

impl ControllerConfig {
    /// Set the refresh interval
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the requested accuracy
    pub fn accuracy(mut self, accuracy: LocationAccuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the navigation links
    pub fn navigation(mut self, navigation: NavigationConfig) -> Self {
        self.navigation = navigation;
        self
    }

    /// Set the compass position watch options
    pub fn compass_watch(mut self, options: WatchOptions) -> Self {
        self.compass_watch = options;
        self
    }
}

struct ControllerState {
    status: SessionStatus,
    refresher: Option<PositionRefresher>,
}

/// Drives the parking session
pub struct SessionController {
    store: ParkingSessionStore,
    location: Arc<dyn LocationProvider>,
    navigator: Navigator,
    clock: Arc<dyn Clock>,
    config: ControllerConfig,
    state: Mutex<ControllerState>,
    status_tx: watch::Sender<SessionStatus>,
    position_tx: Arc<watch::Sender<Option<Coordinate>>>,
}

impl SessionController {
    /// Create a controller in the `Unknown` state
    pub fn new(
        store: ParkingSessionStore,
        location: Arc<dyn LocationProvider>,
        launcher: Arc<dyn UrlLauncher>,
        clock: Arc<dyn Clock>,
        config: ControllerConfig,
    ) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Unknown);
        let (position_tx, _) = watch::channel(None);
        Self {
            store,
            location,
            navigator: Navigator::new(launcher, config.navigation.clone()),
            clock,
            config,
            state: Mutex::new(ControllerState { status: SessionStatus::Unknown, refresher: None }),
            status_tx,
            position_tx: Arc::new(position_tx),
        }
    }

    /// Ask for location access and restore any saved session
    pub async fn initialize(&self) -> Result<SessionStatus> {
        self.begin("initialize", |status| matches!(status, SessionStatus::Unknown))?;

        if let Err(e) = self.ensure_permission().await {
            let status = match e {
                SessionError::PermissionDenied => SessionStatus::PermissionDenied,
                _ => SessionStatus::Unknown,
            };
            self.set_status(status);
            return Err(e);
        }

        match self.store.load().await {
            Ok(Some(session)) => {
                let status = SessionStatus::Active { session };
                self.set_status(status);
                Ok(status)
            }
            Ok(None) => {
                self.set_status(SessionStatus::Idle);
                Ok(SessionStatus::Idle)
            }
            Err(e) => {
                tracing::error!("Error loading parking session: {}", e);
                self.set_status(SessionStatus::Idle);
                Err(e.into())
            }
        }
    }

    /// Save the current position as the parking spot
    pub async fn start_parking(&self) -> Result<ParkingSession> {
        self.begin("start parking", |status| matches!(status, SessionStatus::Idle))?;

        match self.record_session().await {
            Ok(session) => {
                self.position_tx.send_replace(Some(session.location));
                self.set_status(SessionStatus::Active { session });
                Ok(session)
            }
            Err(e) => {
                tracing::error!("Error starting parking: {}", e);
                self.set_status(SessionStatus::Idle);
                Err(e)
            }
        }
    }

    /// Forget the parking spot. Callers confirm with the user first.
    pub async fn end_parking(&self) -> Result<()> {
        let previous = self.begin("end parking", SessionStatus::is_active)?;

        match self.store.clear().await {
            Ok(()) => {
                self.set_status(SessionStatus::Idle);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error clearing parking session: {}", e);
                self.set_status(previous);
                Err(e.into())
            }
        }
    }

    /// Open external directions to the car
    pub async fn navigate_to_car(&self) -> Result<LaunchTarget> {
        let target = self.resolve_target("navigate to car").await?;
        self.navigator.navigate_to(&target).await.map_err(SessionError::NavigationLaunchFailed)
    }

    /// The coordinate the compass should point at
    pub async fn compass_target(&self) -> Result<Coordinate> {
        self.resolve_target("open compass").await
    }

    /// Start a live compass toward the car
    pub async fn open_compass(&self, headings: &HeadingSource) -> Result<CompassTracker> {
        let target = self.compass_target().await?;

        let positions = self
            .location
            .watch_position(self.config.compass_watch.clone())
            .await
            .map_err(SessionError::from_location)?;

        let heading = headings.start().await.map_err(|e| {
            tracing::warn!("Compass opened without heading: {}", e);
            SessionError::HeadingUnavailable
        })?;

        tracing::info!(%target, "Compass opened");
        Ok(CompassTracker::spawn(CompassViewModel::new(Some(target)), positions, Some(heading)))
    }

    /// The active session, if any
    pub fn session(&self) -> Option<ParkingSession> {
        self.state.lock().status.session()
    }

    /// The current status
    pub fn status(&self) -> SessionStatus {
        self.state.lock().status
    }

    /// Receiver of status changes
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Receiver of the device position, refreshed while parked
    pub fn current_position(&self) -> watch::Receiver<Option<Coordinate>> {
        self.position_tx.subscribe()
    }

    /// Whether the position refresher is running
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refresher.as_ref().is_some_and(|r| !r.is_stopped())
    }

    /// Move to `Loading` if `allowed` accepts the current status. Returns the
    /// status that was replaced.
    fn begin(
        &self,
        operation: &'static str,
        allowed: impl Fn(&SessionStatus) -> bool,
    ) -> Result<SessionStatus> {
        let mut state = self.state.lock();
        if !allowed(&state.status) {
            tracing::warn!(operation, status = %state.status, "Rejected session operation");
            return Err(SessionError::InvalidTransition { operation, status: state.status });
        }

        let previous = std::mem::replace(&mut state.status, SessionStatus::Loading);
        self.status_tx.send_replace(SessionStatus::Loading);
        Ok(previous)
    }

    fn set_status(&self, status: SessionStatus) {
        let mut state = self.state.lock();
        state.status = status;

        if status.is_active() {
            if state.refresher.is_none() {
                state.refresher = Some(PositionRefresher::spawn_into(
                    Arc::clone(&self.location),
                    self.config.refresh_interval,
                    self.config.accuracy,
                    Arc::clone(&self.position_tx),
                ));
            }
        } else if let Some(refresher) = state.refresher.take() {
            // Stopped first: no refresh can land after the position is cleared
            refresher.stop();
            self.position_tx.send_replace(None);
        }

        self.status_tx.send_replace(status);
        tracing::info!(%status, "Session status changed");
    }

    async fn ensure_permission(&self) -> Result<()> {
        let permission =
            self.location.request_permission().await.map_err(SessionError::from_location)?;
        if permission.is_granted() {
            Ok(())
        } else {
            tracing::warn!(?permission, "Location permission not granted");
            Err(SessionError::PermissionDenied)
        }
    }

    async fn record_session(&self) -> Result<ParkingSession> {
        self.ensure_permission().await?;

        let position = self
            .location
            .current_position(self.config.accuracy)
            .await
            .map_err(SessionError::from_location)?;

        let session = ParkingSession::new(position, self.clock.now_millis());
        self.store.save(&session).await?;
        Ok(session)
    }

    async fn resolve_target(&self, operation: &'static str) -> Result<Coordinate> {
        let in_memory = {
            let state = self.state.lock();
            if state.status == SessionStatus::Loading {
                return Err(SessionError::InvalidTransition { operation, status: state.status });
            }
            state.status.session()
        };
        if let Some(session) = in_memory {
            return Ok(session.location);
        }

        match self.store.load_location().await {
            Ok(Some(location)) => Ok(location),
            Ok(None) => Err(SessionError::NoSavedLocation),
            Err(e) => {
                tracing::error!("Error loading location from storage: {}", e);
                Err(SessionError::NoSavedLocation)
            }
        }
    }
}
