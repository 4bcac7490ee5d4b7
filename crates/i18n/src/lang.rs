//! Supported languages and device locale detection

use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

/// Languages the app ships translations for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Polski
    Pl,
    /// English
    En,
    /// Українська
    Uk,
    /// Español
    Es,
    /// Deutsch
    De,
    /// Français
    Fr,
}

impl Language {
    /// Every supported language, in the order shown by the language picker
    pub const ALL: [Language; 6] =
        [Language::Pl, Language::En, Language::Uk, Language::Es, Language::De, Language::Fr];

    /// ISO 639-1 code, also the persisted form
    pub fn code(&self) -> &'static str {
        match self {
            Language::Pl => "pl",
            Language::En => "en",
            Language::Uk => "uk",
            Language::Es => "es",
            Language::De => "de",
            Language::Fr => "fr",
        }
    }

    /// Name of the language in that language
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Pl => "Polski",
            Language::En => "English",
            Language::Uk => "Українська",
            Language::Es => "Español",
            Language::De => "Deutsch",
            Language::Fr => "Français",
        }
    }

    /// Parse a persisted language code. Only exact codes are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    fn langid(&self) -> LanguageIdentifier {
        // Codes are static two-letter subtags
        self.code().parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Pick a supported language from the device's preferred locales.
///
/// Only the primary language subtag of each locale is considered, so
/// `de-AT` selects German. `ua` is accepted as an alias for Ukrainian.
/// Returns `fallback` when nothing matches.
pub fn detect_language<S: AsRef<str>>(device_locales: &[S], fallback: Language) -> Language {
    let requested: Vec<LanguageIdentifier> = device_locales
        .iter()
        .filter_map(|locale| primary_subtag(locale.as_ref()))
        .collect();

    let available: Vec<LanguageIdentifier> = Language::ALL.iter().map(Language::langid).collect();
    let default = fallback.langid();

    let negotiated =
        negotiate_languages(&requested, &available, Some(&default), NegotiationStrategy::Lookup);

    negotiated
        .first()
        .and_then(|langid| Language::from_code(langid.language.as_str()))
        .unwrap_or(fallback)
}

fn primary_subtag(locale: &str) -> Option<LanguageIdentifier> {
    let locale = locale.trim().replace('_', "-");
    let langid: LanguageIdentifier = locale.parse().ok()?;
    let code = match langid.language.as_str() {
        "ua" => "uk",
        other => other,
    };
    code.parse().ok()
}
