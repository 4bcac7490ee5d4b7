//! Language manager
//!
//! Owns the active language, persists the user's choice, and notifies
//! listeners when it changes. One instance is built at startup and shared.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use storage::KeyValueStorage;
use tokio::sync::watch;

use crate::lang::{detect_language, Language};
use crate::translator::Translator;
use crate::Result;

/// Storage key of the persisted language code
pub const LANGUAGE_STORAGE_KEY: &str = "app_language";

/// Language manager configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    /// Language used before initialization, when detection fails, and for
    /// missing translation keys
    pub fallback_language: Language,
    /// Storage key for the persisted choice
    pub storage_key: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self { fallback_language: Language::Pl, storage_key: LANGUAGE_STORAGE_KEY.to_string() }
    }
}

impl I18nConfig {
    /// Set the fallback language
    pub fn fallback_language(mut self, lang: Language) -> Self {
        self.fallback_language = lang;
        self
    }

    /// Set the storage key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// Handle returned by [`I18nManager::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(Language) + Send + Sync>;

/// Active language and translation service
pub struct I18nManager {
    translator: Translator,
    storage: Arc<dyn KeyValueStorage>,
    config: I18nConfig,
    current: RwLock<Language>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    ready: watch::Sender<bool>,
}

impl I18nManager {
    /// Create a manager with the built-in translations.
    ///
    /// The fallback language is active until [`initialize`](Self::initialize) runs.
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: I18nConfig) -> Result<Self> {
        let translator = Translator::builtin(config.fallback_language)?;
        Ok(Self::with_translator(storage, config, translator))
    }

    /// Create a manager with custom translations
    pub fn with_translator(
        storage: Arc<dyn KeyValueStorage>,
        config: I18nConfig,
        translator: Translator,
    ) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            translator,
            storage,
            current: RwLock::new(config.fallback_language),
            config,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            ready,
        }
    }

    /// Restore the saved language, or detect one from the device locales
    /// and save it.
    ///
    /// Storage failures are logged and never fatal.
    pub async fn initialize<S: AsRef<str>>(&self, device_locales: &[S]) -> Language {
        let lang = match self.storage.get_item(&self.config.storage_key).await {
            Ok(Some(code)) => match Language::from_code(&code) {
                Some(saved) => Some(saved),
                None => {
                    tracing::warn!(%code, "Ignoring unsupported saved language");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error reading saved language: {}", e);
                Some(self.config.fallback_language)
            }
        };

        let lang = match lang {
            Some(lang) => lang,
            None => {
                let detected = detect_language(device_locales, self.config.fallback_language);
                let key = &self.config.storage_key;
                if let Err(e) = self.storage.set_item(key, detected.code()).await {
                    tracing::warn!("Error saving detected language: {}", e);
                }
                detected
            }
        };

        let previous = std::mem::replace(&mut *self.current.write(), lang);
        self.ready.send_replace(true);
        tracing::info!(language = %lang, "Language initialized");

        if previous != lang {
            self.notify(lang);
        }
        lang
    }

    /// Whether initialization has completed
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Resolve once initialization has completed
    pub async fn wait_until_ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as self, so this only ends when ready
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Persist the choice, then switch language and notify listeners.
    ///
    /// Waits for initialization first. If persisting fails the active
    /// language is left unchanged and no listener is called.
    pub async fn set_language(&self, lang: Language) -> Result<()> {
        self.wait_until_ready().await;

        self.storage.set_item(&self.config.storage_key, lang.code()).await.map_err(|e| {
            tracing::error!("Error saving language: {}", e);
            e
        })?;

        *self.current.write() = lang;
        self.notify(lang);
        Ok(())
    }

    /// The active language, available even before initialization
    pub fn current_language(&self) -> Language {
        *self.current.read()
    }

    /// The active language once initialization has completed
    pub async fn current_language_ready(&self) -> Language {
        self.wait_until_ready().await;
        self.current_language()
    }

    /// Languages the app ships translations for
    pub fn supported_languages(&self) -> &'static [Language] {
        &Language::ALL
    }

    /// Translate a dotted key in the active language
    pub fn t(&self, key: &str) -> String {
        self.translator.translate(self.current_language(), key)
    }

    /// The underlying translation tables
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Register a callback for language changes
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Language) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a callback; returns whether it was registered
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify(&self, lang: Language) {
        // Listeners may subscribe or unsubscribe from inside the callback
        let listeners: Vec<Listener> =
            self.listeners.lock().iter().map(|(_, listener)| Arc::clone(listener)).collect();
        for listener in listeners {
            listener(lang);
        }
    }
}
