//! Translator configuration

use crate::LanguageTag;
use crate::detect::split_locale_list;
use lokyn_log::warn;
use serde::Deserialize;
use std::env;

/// Environment variable forcing the preferred locales when set.
pub const LANGUAGE_ENV: &str = "LOKYN_LANG";

/// Settings for a [`Translator`](crate::Translator).
///
/// Deserializable so hosts can embed it in their own config files; missing
/// fields take their defaults.
///
/// ```
/// use lokyn_i18n::I18nConfig;
///
/// let config: I18nConfig = serde_json::from_str(r#"{"default_language": "de"}"#).unwrap();
/// assert_eq!(config.default_language.to_string(), "de");
/// assert!(!config.fallback_to_default);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// First entry of the supported set and the negotiation fallback.
    pub default_language: LanguageTag,
    /// Variable whose value (`fr:en`) replaces the detected locales.
    pub language_env: Option<String>,
    /// Retry the default language before falling back to the key.
    pub fallback_to_default: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: LanguageTag::default_language(),
            language_env: Some(LANGUAGE_ENV.to_string()),
            fallback_to_default: false,
        }
    }
}

impl I18nConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `LOKYN_DEFAULT_LANG` and
    /// `LOKYN_FALLBACK_TO_DEFAULT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("LOKYN_DEFAULT_LANG") {
            match LanguageTag::parse(&raw) {
                Ok(tag) => config.default_language = tag,
                Err(err) => warn!(target: "lokyn::config", "Ignoring LOKYN_DEFAULT_LANG: {}", err),
            }
        }

        if let Some(raw) = lookup("LOKYN_FALLBACK_TO_DEFAULT") {
            config.fallback_to_default = raw == "1" || raw.eq_ignore_ascii_case("true");
        }

        config
    }

    /// Set the default language.
    pub fn with_default_language(mut self, tag: LanguageTag) -> Self {
        self.default_language = tag;
        self
    }

    /// Set or clear the override variable.
    pub fn with_language_env(mut self, var: Option<impl Into<String>>) -> Self {
        self.language_env = var.map(Into::into);
        self
    }

    /// Enable or disable the default-language retry.
    pub fn with_fallback_to_default(mut self, enabled: bool) -> Self {
        self.fallback_to_default = enabled;
        self
    }

    /// Locales forced through the override variable, if it is set and
    /// non-empty.
    pub fn language_override(&self) -> Option<Vec<String>> {
        self.language_override_from(|var| env::var(var).ok())
    }

    fn language_override_from(&self, lookup: impl FnOnce(&str) -> Option<String>) -> Option<Vec<String>> {
        let var = self.language_env.as_deref()?;
        let locales = split_locale_list(&lookup(var)?);
        (!locales.is_empty()).then_some(locales)
    }
}
