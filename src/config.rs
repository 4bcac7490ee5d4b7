//! Application configuration
//!
//! Every field is optional in the JSON form; missing values take the
//! defaults of the component they configure.

use app_platform::{HeadingConfig, LocationAccuracy, NavigationConfig};
use app_state::{ControllerConfig, ParkingStoreConfig};
use i18n::{I18nConfig, Language, LANGUAGE_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::KvConfig;
use thiserror::Error;

use crate::logging::{self, LoggingError, DEFAULT_FILTER};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// I/O error
        #[source]
        source: std::io::Error,
    },

    /// The JSON is malformed or has wrongly typed fields
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// On-disk store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Database directory
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity_bytes: u64,
    /// Compress stored pages
    pub use_compression: bool,
    /// Background flush interval; `None` flushes only on write
    pub flush_every_ms: Option<u64>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let kv = KvConfig::default();
        Self {
            path: kv.path,
            cache_capacity_bytes: kv.cache_capacity,
            use_compression: kv.use_compression,
            flush_every_ms: kv.flush_every_ms,
        }
    }
}

/// Session controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Position refresh interval while parked
    pub refresh_interval_ms: u64,
    /// Accuracy for the parking fix and refreshes
    pub accuracy: LocationAccuracy,
    /// Navigation links
    pub navigation: NavigationConfig,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let controller = ControllerConfig::default();
        Self {
            refresh_interval_ms: controller.refresh_interval.as_millis() as u64,
            accuracy: controller.accuracy,
            navigation: controller.navigation,
        }
    }
}

/// Heading sensor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingSettings {
    /// Minimum time between delivered samples
    pub min_interval_ms: u64,
}

impl Default for HeadingSettings {
    fn default() -> Self {
        Self { min_interval_ms: HeadingConfig::default().min_interval.as_millis() as u64 }
    }
}

/// Language settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageSettings {
    /// Fallback language
    pub fallback_language: Language,
    /// Storage key of the saved choice
    pub storage_key: String,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self { fallback_language: Language::Pl, storage_key: LANGUAGE_STORAGE_KEY.to_string() }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Log filter used when `RUST_LOG` is unset; applied by
    /// [`AppConfig::init_logging`]
    pub log_filter: String,
    /// On-disk store
    pub storage: StorageSettings,
    /// Parking persistence
    pub parking: ParkingStoreConfig,
    /// Session controller
    pub session: SessionSettings,
    /// Heading sensor
    pub heading: HeadingSettings,
    /// Languages
    pub language: LanguageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_FILTER.to_string(),
            storage: StorageSettings::default(),
            parking: ParkingStoreConfig::default(),
            session: SessionSettings::default(),
            heading: HeadingSettings::default(),
            language: LanguageSettings::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.session.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid("session.refreshIntervalMs must be positive".into()));
        }
        if self.session.navigation.directions_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "session.navigation.directionsBaseUrl must not be empty".into(),
            ));
        }
        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.path must not be empty".into()));
        }
        if let Err(e) = logging::parse_filter(&self.log_filter) {
            return Err(ConfigError::Invalid(format!("logFilter: {e}")));
        }
        if self.language.storage_key.is_empty() {
            return Err(ConfigError::Invalid("language.storageKey must not be empty".into()));
        }
        Ok(())
    }

    /// Install the global log subscriber with the configured filter.
    ///
    /// Call once at startup, before building the app. `RUST_LOG` still
    /// overrides a valid configured filter.
    pub fn init_logging(&self) -> std::result::Result<(), LoggingError> {
        logging::parse_filter(&self.log_filter)?;
        logging::init(&self.log_filter)
    }

    /// Store configuration
    pub fn kv_config(&self) -> KvConfig {
        KvConfig::new(&self.storage.path)
            .cache_capacity(self.storage.cache_capacity_bytes)
            .use_compression(self.storage.use_compression)
            .flush_every_ms(self.storage.flush_every_ms)
    }

    /// Controller configuration
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig::default()
            .refresh_interval(Duration::from_millis(self.session.refresh_interval_ms))
            .accuracy(self.session.accuracy)
            .navigation(self.session.navigation.clone())
    }

    /// Heading source configuration
    pub fn heading_config(&self) -> HeadingConfig {
        HeadingConfig::default().min_interval(Duration::from_millis(self.heading.min_interval_ms))
    }

    /// Language manager configuration
    pub fn i18n_config(&self) -> I18nConfig {
        I18nConfig::default()
            .fallback_language(self.language.fallback_language)
            .storage_key(self.language.storage_key.clone())
    }
}
