//! Translation lookup
//!
//! Translations are nested JSON objects addressed with dotted keys such as
//! `parking.startSuccess`. A key missing from the active language falls back
//! to the fallback language, and a key missing everywhere is returned as-is.

use serde_json::Value;
use std::collections::HashMap;

use crate::lang::Language;
use crate::{I18nError, Result};

const BUILTIN: [(Language, &str); 6] = [
    (Language::Pl, include_str!("../locales/pl.json")),
    (Language::En, include_str!("../locales/en.json")),
    (Language::Uk, include_str!("../locales/uk.json")),
    (Language::Es, include_str!("../locales/es.json")),
    (Language::De, include_str!("../locales/de.json")),
    (Language::Fr, include_str!("../locales/fr.json")),
];

/// Translation tables for every language
#[derive(Debug, Clone)]
pub struct Translator {
    resources: HashMap<Language, Value>,
    fallback: Language,
}

impl Translator {
    /// Load the translations shipped with the app
    pub fn builtin(fallback: Language) -> Result<Self> {
        let mut resources = HashMap::with_capacity(BUILTIN.len());
        for (lang, source) in BUILTIN {
            let table = serde_json::from_str(source)
                .map_err(|source| I18nError::InvalidResource { lang, source })?;
            resources.insert(lang, table);
        }
        Ok(Self { resources, fallback })
    }

    /// Build a translator from explicit tables
    pub fn from_resources(resources: HashMap<Language, Value>, fallback: Language) -> Self {
        Self { resources, fallback }
    }

    /// The language used when a key is missing
    pub fn fallback(&self) -> Language {
        self.fallback
    }

    /// Translate `key` for `lang`
    pub fn translate(&self, lang: Language, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(self.fallback, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Whether `lang` itself defines `key`
    pub fn has_key(&self, lang: Language, key: &str) -> bool {
        self.lookup(lang, key).is_some()
    }

    fn lookup(&self, lang: Language, key: &str) -> Option<&str> {
        let mut node = self.resources.get(&lang)?;
        for segment in key.split('.') {
            node = node.as_object()?.get(segment)?;
        }
        node.as_str()
    }
}
