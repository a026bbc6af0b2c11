//! Locale-keyed text

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locale used when a requested translation is missing
pub const FALLBACK_LOCALE: &str = "en";

/// Text available in several locales, keyed by locale code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translatable {
    translations: BTreeMap<String, String>,
}

impl Translatable {
    pub fn new<I, L, T>(translations: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        Self {
            translations: translations
                .into_iter()
                .map(|(locale, text)| (locale.into(), text.into()))
                .collect(),
        }
    }

    /// English and Dutch text
    pub fn en_nl(en: impl Into<String>, nl: impl Into<String>) -> Self {
        let en: String = en.into();
        let nl: String = nl.into();
        Self::new([("en", en), ("nl", nl)])
    }

    /// Same text for every supported locale
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::en_nl(text.clone(), text)
    }

    /// Text for `locale`, falling back to English, then to any translation
    pub fn get(&self, locale: &str) -> &str {
        self.translations
            .get(locale)
            .or_else(|| self.translations.get(FALLBACK_LOCALE))
            .or_else(|| self.translations.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }
}
