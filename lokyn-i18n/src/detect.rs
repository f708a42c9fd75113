//! Preferred locale detection
//!
//! A [`LocaleSource`] reports the user's preferred locales, most preferred
//! first. [`SystemLocales`] asks the operating system through `sys-locale`.

use crate::{I18nError, Result};
use std::env;

/// Provider of the host's preferred locale identifiers.
pub trait LocaleSource: Send + Sync {
    /// Preferred locales, most preferred first.
    fn preferred_locales(&self) -> Result<Vec<String>>;
}

/// Locales reported by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocales;

impl LocaleSource for SystemLocales {
    fn preferred_locales(&self) -> Result<Vec<String>> {
        let locales: Vec<String> = sys_locale::get_locales().collect();
        if locales.is_empty() {
            return Err(I18nError::LocaleDetection(
                "the system reported no locales".to_string(),
            ));
        }
        Ok(locales)
    }
}

/// A fixed list of locales.
///
/// ```
/// use lokyn_i18n::{LocaleSource, StaticLocales};
///
/// let source = StaticLocales::new(["fr-CA", "en-US"]);
/// assert_eq!(source.preferred_locales().unwrap(), vec!["fr-CA", "en-US"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticLocales {
    locales: Vec<String>,
}

impl StaticLocales {
    /// Source always reporting `locales`.
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
        }
    }
}

impl LocaleSource for StaticLocales {
    fn preferred_locales(&self) -> Result<Vec<String>> {
        if self.locales.is_empty() {
            return Err(I18nError::LocaleDetection("no locales configured".to_string()));
        }
        Ok(self.locales.clone())
    }
}

/// Locales from an environment variable holding a `:` or `,` separated list,
/// like `LANGUAGE=fr_CA:fr:en`.
#[derive(Debug, Clone)]
pub struct EnvLocales {
    var: String,
}

impl EnvLocales {
    /// Source reading `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

/// Split a `:`/`,` separated locale list, dropping empty items.
pub(crate) fn split_locale_list(raw: &str) -> Vec<String> {
    raw.split([':', ','])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

impl EnvLocales {
    fn locales_from(&self, value: std::result::Result<String, env::VarError>) -> Result<Vec<String>> {
        let raw = value.map_err(|e| I18nError::LocaleDetection(format!("{}: {}", self.var, e)))?;
        let locales = split_locale_list(&raw);
        if locales.is_empty() {
            return Err(I18nError::LocaleDetection(format!("{} is empty", self.var)));
        }
        Ok(locales)
    }
}

impl LocaleSource for EnvLocales {
    fn preferred_locales(&self) -> Result<Vec<String>> {
        self.locales_from(env::var(&self.var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_locale_list() {
        assert_eq!(split_locale_list("fr_CA:fr:en"), vec!["fr_CA", "fr", "en"]);
        assert_eq!(split_locale_list(" de , en ,,"), vec!["de", "en"]);
        assert!(split_locale_list(" : ").is_empty());
    }

    #[test]
    fn test_static_locales_empty_is_error() {
        let source = StaticLocales::new(Vec::<String>::new());
        assert!(source.preferred_locales().is_err());
    }

    #[test]
    fn test_env_locales_missing_var() {
        let source = EnvLocales::new("LOKYN_TEST_UNSET_LOCALES_93121");
        assert!(matches!(
            source.preferred_locales(),
            Err(I18nError::LocaleDetection(_))
        ));
    }

    #[test]
    fn test_env_locales_reads_list() {
        let source = EnvLocales::new("LANGUAGE");
        assert_eq!(
            source.locales_from(Ok("pt_BR:pt".to_string())).unwrap(),
            vec!["pt_BR", "pt"]
        );
        assert!(matches!(
            source.locales_from(Ok(" : ".to_string())),
            Err(I18nError::LocaleDetection(_))
        ));
        assert!(matches!(
            source.locales_from(Err(env::VarError::NotPresent)),
            Err(I18nError::LocaleDetection(_))
        ));
    }

    #[test]
    fn test_system_locales_never_panics() {
        // Host dependent: either a non-empty list or a detection error.
        match SystemLocales.preferred_locales() {
            Ok(locales) => assert!(!locales.is_empty()),
            Err(err) => assert!(matches!(err, I18nError::LocaleDetection(_))),
        }
    }
}
