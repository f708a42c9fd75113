//! Translation context
//!
//! A [`Translator`] owns the registry of catalogs and the session's current
//! language. Hosts build one, register their message directories and then
//! look keys up with [`Translator::l`] and [`Translator::p`].
//!
//! ```
//! use lokyn_i18n::{MemorySource, StaticLocales, Translator};
//!
//! let translator = Translator::builder()
//!     .language_env(None::<String>)
//!     .locale_source(StaticLocales::new(["fr-CA", "en-US"]))
//!     .build();
//!
//! let source = MemorySource::new()
//!     .with_file("locales/en.json", r#"{"greeting": "Hello"}"#)
//!     .with_file("locales/fr.json", r#"{"greeting": "Bonjour"}"#);
//!
//! translator.add_translation_fs(&source, "locales").unwrap();
//!
//! assert_eq!(translator.current_language(), "fr");
//! assert_eq!(translator.l("greeting"), "Bonjour");
//! assert_eq!(translator.l("farewell"), "farewell");
//! ```

use crate::registry::{RegistrationReport, Registry};
use crate::store::{DirSource, MessageSource};
use crate::{Catalog, I18nConfig, I18nError, LanguageTag, LocaleSource, Result, SystemLocales, best_match};
use lokyn_log::{debug, info, warn};
use parking_lot::{Once, RwLock};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Session {
    registry: Registry,
    current: LanguageTag,
}

/// Registry plus current language, safe to share across threads.
pub struct Translator {
    config: I18nConfig,
    locales: Box<dyn LocaleSource>,
    init: Once,
    init_runs: AtomicUsize,
    session: RwLock<Session>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session.read();
        f.debug_struct("Translator")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .field("current", &session.current)
            .field("supported", &session.registry.supported())
            .finish_non_exhaustive()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Translator with the default configuration and the system's locales.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start building a translator.
    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::default()
    }

    /// The configuration this translator was built with.
    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    /// Initialize the registry with the default language.
    ///
    /// Runs once per translator. Concurrent callers block until the first
    /// call has finished, so every caller returns with an initialized
    /// registry.
    pub fn init(&self) {
        self.init.call_once(|| {
            self.session
                .write()
                .registry
                .initialize(&self.config.default_language);
            self.init_runs.fetch_add(1, Ordering::SeqCst);
            debug!(
                target: "lokyn::session",
                "Initialized translations with default language {}",
                self.config.default_language
            );
        });
    }

    /// Whether [`init`](Self::init) has completed.
    pub fn is_initialized(&self) -> bool {
        self.init.state().done()
    }

    /// How many times the initialization body ran (0 or 1).
    pub fn init_runs(&self) -> usize {
        self.init_runs.load(Ordering::SeqCst)
    }

    /// Register every message file in `dir`, then re-select the language.
    ///
    /// Initializes the translator first if needed. Only a directory that
    /// cannot be listed is an error, and it leaves the supported languages
    /// untouched. Files that fail to load are listed in the report.
    pub fn add_translation_fs(
        &self,
        source: &(impl MessageSource + ?Sized),
        dir: &str,
    ) -> Result<RegistrationReport> {
        self.init();
        let report = self.session.write().registry.register_directory(source, dir)?;
        self.auto_select_language();
        Ok(report)
    }

    /// Register the message files of a directory on disk.
    ///
    /// Skipped files are reported by name, relative to `dir`.
    pub fn add_translation_dir(&self, dir: impl AsRef<Path>) -> Result<RegistrationReport> {
        let dir = dir.as_ref();
        self.add_translation_fs(&DirSource::new(dir), "")
            .map_err(|err| match err {
                I18nError::DirectoryUnreadable { source, .. } => I18nError::DirectoryUnreadable {
                    dir: dir.display().to_string(),
                    source,
                },
                other => other,
            })
    }

    /// Register a catalog built in code.
    ///
    /// Unlike directory registration this does not re-select the language.
    pub fn add_catalog(&self, catalog: impl Catalog + 'static) {
        self.init();
        self.session.write().registry.register_catalog(Box::new(catalog));
    }

    /// Pick the supported language closest to the preferred locales and
    /// make it current.
    ///
    /// Preferred locales come from the override variable when it is set,
    /// otherwise from the locale source. If the source fails, the default
    /// language is the only candidate.
    pub fn auto_select_language(&self) -> LanguageTag {
        self.select_language(self.config.language_override())
    }

    fn select_language(&self, forced: Option<Vec<String>>) -> LanguageTag {
        self.init();
        let candidates = self.candidates(forced);

        let mut session = self.session.write();
        let selected = best_match(session.registry.supported(), &candidates);
        info!(
            target: "lokyn::negotiate",
            "Selected language {} for preferred locales {:?}",
            selected,
            candidates
        );
        session.current = selected.clone();
        selected
    }

    fn candidates(&self, forced: Option<Vec<String>>) -> Vec<String> {
        if let Some(locales) = forced {
            debug!(target: "lokyn::negotiate", "Using locale override {:?}", locales);
            return locales;
        }

        match self.locales.preferred_locales() {
            Ok(locales) if !locales.is_empty() => locales,
            Ok(_) => vec![self.config.default_language.to_string()],
            Err(err) => {
                warn!(
                    target: "lokyn::negotiate",
                    "{}; falling back to {}",
                    err,
                    self.config.default_language
                );
                vec![self.config.default_language.to_string()]
            }
        }
    }

    /// Make `tag` the current language.
    ///
    /// The tag does not have to be supported; lookups then fall back to
    /// their keys. A tag that does not parse becomes `und`.
    pub fn set_language(&self, tag: &str) {
        let tag = match LanguageTag::parse(tag) {
            Ok(tag) => tag,
            Err(err) => {
                warn!(target: "lokyn::session", "{}; using und", err);
                LanguageTag::undetermined()
            }
        };

        debug!(target: "lokyn::session", "Current language set to {}", tag);
        self.session.write().current = tag;
    }

    /// Current language as a string; `und` until one is selected.
    pub fn current_language(&self) -> String {
        self.session.read().current.to_string()
    }

    /// Current language tag.
    pub fn current_tag(&self) -> LanguageTag {
        self.session.read().current.clone()
    }

    /// Supported languages in registration order.
    pub fn supported_languages(&self) -> Vec<LanguageTag> {
        self.session.read().registry.supported().to_vec()
    }

    /// Translate `key` in the current language, or return `key` itself.
    pub fn l(&self, key: &str) -> String {
        self.resolve(key, None)
    }

    /// Translate the plural form of `key` for `count`, or return `key`.
    pub fn p(&self, key: &str, count: i64) -> String {
        self.resolve(key, Some(count))
    }

    /// Whether `key` resolves in the current language.
    pub fn has(&self, key: &str) -> bool {
        let session = self.session.read();
        session.registry.contains(&session.current, key)
    }

    /// Like [`l`](Self::l) and [`p`](Self::p) but reports failures instead
    /// of falling back to the key.
    pub fn localize(&self, key: &str, count: Option<i64>) -> Result<String> {
        let session = self.session.read();

        match session.registry.localize(&session.current, key, count) {
            Err(err)
                if self.config.fallback_to_default
                    && session.current != self.config.default_language =>
            {
                debug!(
                    target: "lokyn::lookup",
                    "{}; retrying in {}",
                    err,
                    self.config.default_language
                );
                session
                    .registry
                    .localize(&self.config.default_language, key, count)
                    .map_err(|_| err)
            }
            result => result,
        }
    }

    fn resolve(&self, key: &str, count: Option<i64>) -> String {
        match self.localize(key, count) {
            Ok(text) => text,
            Err(err) => {
                warn!(target: "lokyn::lookup", "{}; using key", err);
                key.to_string()
            }
        }
    }
}

/// Builder for [`Translator`].
#[derive(Default)]
pub struct TranslatorBuilder {
    config: I18nConfig,
    locales: Option<Box<dyn LocaleSource>>,
}

impl fmt::Debug for TranslatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorBuilder")
            .field("config", &self.config)
            .field("custom_locale_source", &self.locales.is_some())
            .finish()
    }
}

impl TranslatorBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: I18nConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default language.
    pub fn default_language(mut self, tag: LanguageTag) -> Self {
        self.config.default_language = tag;
        self
    }

    /// Set or clear the locale override variable.
    pub fn language_env(mut self, var: Option<impl Into<String>>) -> Self {
        self.config.language_env = var.map(Into::into);
        self
    }

    /// Retry the default language before falling back to the key.
    pub fn fallback_to_default(mut self, enabled: bool) -> Self {
        self.config.fallback_to_default = enabled;
        self
    }

    /// Where preferred locales come from. Defaults to [`SystemLocales`].
    pub fn locale_source(mut self, source: impl LocaleSource + 'static) -> Self {
        self.locales = Some(Box::new(source));
        self
    }

    /// Build the translator. It starts uninitialized with language `und`.
    pub fn build(self) -> Translator {
        Translator {
            config: self.config,
            locales: self.locales.unwrap_or_else(|| Box::new(SystemLocales)),
            init: Once::new(),
            init_runs: AtomicUsize::new(0),
            session: RwLock::new(Session {
                registry: Registry::new(),
                current: LanguageTag::undetermined(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{I18nError, JsonCatalog, Message, PluralCategory, StaticLocales};

    struct NoLocales;

    impl LocaleSource for NoLocales {
        fn preferred_locales(&self) -> Result<Vec<String>> {
            Err(I18nError::LocaleDetection("unavailable".to_string()))
        }
    }

    fn tag(raw: &str) -> LanguageTag {
        LanguageTag::parse(raw).unwrap()
    }

    fn translator(locales: &[&str]) -> Translator {
        Translator::builder()
            .language_env(None::<String>)
            .locale_source(StaticLocales::new(locales.iter().copied()))
            .build()
    }

    fn catalog(lang: &str, entries: &[(&str, &str)]) -> JsonCatalog {
        let mut catalog = JsonCatalog::new(tag(lang));
        for (key, text) in entries {
            catalog.add(*key, *text);
        }
        catalog
    }

    #[test]
    fn test_starts_uninitialized() {
        let translator = translator(&["en"]);
        assert!(!translator.is_initialized());
        assert_eq!(translator.init_runs(), 0);
        assert_eq!(translator.current_language(), "und");
        assert!(translator.supported_languages().is_empty());
    }

    #[test]
    fn test_init_runs_once() {
        let translator = translator(&["en"]);
        translator.init();
        translator.init();

        assert!(translator.is_initialized());
        assert_eq!(translator.init_runs(), 1);
        assert_eq!(translator.supported_languages(), vec![tag("en")]);
    }

    #[test]
    fn test_init_keeps_registrations() {
        let translator = translator(&["en"]);
        translator.add_catalog(catalog("de", &[("hi", "Hallo")]));
        translator.init();

        assert_eq!(translator.supported_languages(), vec![tag("en"), tag("de")]);
    }

    #[test]
    fn test_configured_default_language() {
        let translator = Translator::builder()
            .default_language(tag("de"))
            .language_env(None::<String>)
            .locale_source(NoLocales)
            .build();

        assert_eq!(translator.auto_select_language(), tag("de"));
        assert_eq!(translator.supported_languages(), vec![tag("de")]);
    }

    #[test]
    fn test_locale_source_failure_selects_default() {
        let translator = Translator::builder()
            .language_env(None::<String>)
            .locale_source(NoLocales)
            .build();
        translator.add_catalog(catalog("fr", &[]));

        assert_eq!(translator.auto_select_language(), tag("en"));
        assert_eq!(translator.current_language(), "en");
    }

    #[test]
    fn test_language_override_wins_over_locale_source() {
        let translator = Translator::builder()
            .language_env(None::<String>)
            .locale_source(StaticLocales::new(["fr"]))
            .build();
        translator.add_catalog(catalog("fr", &[]));
        translator.add_catalog(catalog("de", &[]));

        let forced = Some(vec!["de_AT.UTF-8".to_string()]);
        assert_eq!(translator.select_language(forced), tag("de"));
        assert_eq!(translator.current_language(), "de");

        assert_eq!(translator.select_language(None), tag("fr"));
        assert_eq!(translator.auto_select_language(), tag("fr"));
    }

    #[test]
    fn test_set_language_is_not_validated() {
        let translator = translator(&["en"]);
        translator.init();

        translator.set_language("pt-BR");
        assert_eq!(translator.current_language(), "pt-BR");

        translator.set_language("not a tag!");
        assert_eq!(translator.current_language(), "und");
    }

    #[test]
    fn test_lookup_falls_back_to_key() {
        let translator = translator(&["fr"]);
        translator.add_catalog(catalog("fr", &[("greeting", "Bonjour")]));
        translator.set_language("fr");

        assert!(translator.has("greeting"));
        assert_eq!(translator.l("greeting"), "Bonjour");
        assert!(!translator.has("farewell"));
        assert_eq!(translator.l("farewell"), "farewell");
        assert!(matches!(
            translator.localize("farewell", None),
            Err(I18nError::MessageNotFound { .. })
        ));
    }

    #[test]
    fn test_plural_lookup() {
        let translator = translator(&["en"]);
        let mut en = JsonCatalog::new(tag("en"));
        en.add(
            "apples",
            Message::plural([
                (PluralCategory::One, "One apple"),
                (PluralCategory::Other, "{{count}} apples"),
            ]),
        );
        translator.add_catalog(en);
        translator.set_language("en");

        assert_eq!(translator.p("apples", 1), "One apple");
        assert_eq!(translator.p("apples", 3), "3 apples");
        assert_eq!(translator.p("pears", 3), "pears");
    }

    #[test]
    fn test_fallback_to_default_language() {
        let translator = Translator::builder()
            .language_env(None::<String>)
            .locale_source(NoLocales)
            .fallback_to_default(true)
            .build();
        translator.add_catalog(catalog("en", &[("greeting", "Hello"), ("bye", "Bye")]));
        translator.add_catalog(catalog("fr", &[("greeting", "Bonjour")]));

        translator.set_language("fr");
        assert_eq!(translator.l("greeting"), "Bonjour");
        assert_eq!(translator.l("bye"), "Bye");

        translator.set_language("xx");
        assert_eq!(translator.l("bye"), "Bye");
        assert_eq!(translator.l("unknown"), "unknown");
    }

    #[test]
    fn test_debug_output() {
        let translator = translator(&["en"]);
        let output = format!("{:?}", translator);
        assert!(output.contains("Translator"));
        assert!(output.contains("initialized: false"));
    }
}
