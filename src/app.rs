//! Application wiring
//!
//! [`CarfinderApp`] builds the services from an [`AppConfig`] and the
//! platform's device services, and exposes the user-facing operations as
//! ready-to-display results.

use app_platform::{Clock, HeadingProvider, HeadingSource, LocationProvider, UrlLauncher};
use app_state::{
    CompassDisplay, CompassTracker, ParkingSessionStore, SessionController, SessionError,
    SessionStatus,
};
use app_ui::{
    CompassPanel, Notice, Operation, RenderedNotice, RenderedStatus, StatusIndicator,
    TimerDisplay,
};
use i18n::{I18nError, I18nManager, Language};
use std::sync::Arc;
use storage::{KeyValueStorage, KvError, KvStore};
use thiserror::Error;

use crate::config::{AppConfig, ConfigError};

/// Application setup errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store could not be opened
    #[error("Failed to open storage: {0}")]
    Storage(#[from] KvError),

    /// Translations could not be loaded
    #[error(transparent)]
    I18n(#[from] I18nError),
}

/// Result type for application setup
pub type Result<T> = std::result::Result<T, AppError>;

/// Device services supplied by the host platform
#[derive(Clone)]
pub struct Platform {
    /// Position and permission
    pub location: Arc<dyn LocationProvider>,
    /// Heading sensor
    pub heading: Arc<dyn HeadingProvider>,
    /// System URL handler
    pub launcher: Arc<dyn UrlLauncher>,
    /// Wall clock
    pub clock: Arc<dyn Clock>,
}

/// Outcome of application startup
#[derive(Debug, Clone, PartialEq)]
pub struct Startup {
    /// Active language
    pub language: Language,
    /// Session status after initialization
    pub status: SessionStatus,
    /// Notice to show, if initialization failed
    pub notice: Option<RenderedNotice>,
}

/// The assembled application
pub struct CarfinderApp {
    i18n: Arc<I18nManager>,
    controller: Arc<SessionController>,
    headings: HeadingSource,
    clock: Arc<dyn Clock>,
}

impl CarfinderApp {
    /// Open the on-disk store named by the configuration and build the app
    pub fn open(config: &AppConfig, platform: Platform) -> Result<Self> {
        config.validate()?;
        let store = KvStore::new(config.kv_config())?;
        Self::with_storage(config, Arc::new(store), platform)
    }

    /// Build the app over an existing store
    pub fn with_storage(
        config: &AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        platform: Platform,
    ) -> Result<Self> {
        let i18n = I18nManager::new(Arc::clone(&storage), config.i18n_config())?;

        let parking =
            ParkingSessionStore::new(storage, Arc::clone(&platform.clock), config.parking.clone());
        let controller = SessionController::new(
            parking,
            platform.location,
            platform.launcher,
            Arc::clone(&platform.clock),
            config.controller_config(),
        );

        Ok(Self {
            i18n: Arc::new(i18n),
            controller: Arc::new(controller),
            headings: HeadingSource::new(platform.heading, config.heading_config()),
            clock: platform.clock,
        })
    }

    /// Pick the language and restore the parking session
    pub async fn start<S: AsRef<str>>(&self, device_locales: &[S]) -> Startup {
        let language = self.i18n.initialize(device_locales).await;

        let notice = match self.controller.initialize().await {
            Ok(_) => None,
            Err(e) => Some(self.error_notice(Operation::Initialize, &e)),
        };

        Startup { language, status: self.controller.status(), notice }
    }

    /// Save the current position as the parking spot
    pub async fn start_parking(&self) -> RenderedNotice {
        match self.controller.start_parking().await {
            Ok(_) => Notice::parking_started().render(&self.i18n),
            Err(e) => self.error_notice(Operation::StartParking, &e),
        }
    }

    /// Confirmation to show before [`end_parking`](Self::end_parking)
    pub fn confirm_end_parking(&self) -> RenderedNotice {
        Notice::confirm_end_parking().render(&self.i18n)
    }

    /// Forget the parking spot
    pub async fn end_parking(&self) -> RenderedNotice {
        match self.controller.end_parking().await {
            Ok(()) => Notice::parking_ended().render(&self.i18n),
            Err(e) => self.error_notice(Operation::EndParking, &e),
        }
    }

    /// Open directions; returns a notice only on failure
    pub async fn navigate_to_car(&self) -> Option<RenderedNotice> {
        match self.controller.navigate_to_car().await {
            Ok(_) => None,
            Err(e) => Some(self.error_notice(Operation::NavigateToCar, &e)),
        }
    }

    /// Start the live compass
    pub async fn open_compass(&self) -> std::result::Result<CompassTracker, RenderedNotice> {
        self.controller
            .open_compass(&self.headings)
            .await
            .map_err(|e| self.error_notice(Operation::OpenCompass, &e))
    }

    /// Compass screen text for a display
    pub fn compass_panel(&self, display: &CompassDisplay) -> CompassPanel {
        CompassPanel::render(display, &self.i18n)
    }

    /// Status card for the current state
    pub fn status_card(&self) -> RenderedStatus {
        StatusIndicator::for_status(&self.controller.status()).render(&self.i18n)
    }

    /// Parking timer as of now
    pub fn timer(&self) -> TimerDisplay {
        TimerDisplay::for_session(self.controller.session().as_ref(), self.clock.now_millis())
    }

    /// Switch language; a choice that cannot be saved is not applied
    pub async fn set_language(&self, language: Language) {
        if let Err(e) = self.i18n.set_language(language).await {
            tracing::warn!("Language not switched: {}", e);
        }
    }

    /// The language manager
    pub fn i18n(&self) -> &Arc<I18nManager> {
        &self.i18n
    }

    /// The session controller
    pub fn controller(&self) -> &Arc<SessionController> {
        &self.controller
    }

    fn error_notice(&self, operation: Operation, error: &SessionError) -> RenderedNotice {
        tracing::warn!(?operation, kind = ?error.kind(), "{}", error);
        Notice::for_error(operation, error).render(&self.i18n)
    }
}
