//! Internationalization for Carfinder
//!
//! This crate provides the supported languages, device locale detection,
//! translation lookup with fallback, and the language manager that persists
//! the user's choice.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lang;
pub mod manager;
pub mod translator;

pub use lang::{detect_language, Language};
pub use manager::{I18nConfig, I18nManager, ListenerId, LANGUAGE_STORAGE_KEY};
pub use translator::Translator;

use thiserror::Error;

/// i18n error types
#[derive(Debug, Error)]
pub enum I18nError {
    /// A bundled translation file is not valid JSON
    #[error("Invalid translations for {lang}: {source}")]
    InvalidResource {
        /// Language of the broken file
        lang: Language,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the saved language failed
    #[error("Storage error: {0}")]
    Storage(#[from] storage::KvError),
}

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;
