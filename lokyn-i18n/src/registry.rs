//! Supported languages and their catalogs.
//!
//! The registry only grows: files and catalogs can be added, never removed.

use crate::store::{MessageSource, join_path, parse_message_file};
use crate::{Catalog, I18nError, LanguageTag, Result};
use lokyn_log::{debug, info, warn};
use std::collections::HashMap;

/// A message file that could not be registered.
#[derive(Debug)]
pub struct SkippedFile {
    /// Path of the file within its source
    pub file: String,
    /// Why it was skipped
    pub error: I18nError,
}

/// Outcome of registering a directory.
///
/// Registration succeeds even when individual files are skipped; inspect
/// `skipped` to surface them.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Language of every registered file, in listing order
    pub registered: Vec<LanguageTag>,
    /// Files that could not be read or parsed
    pub skipped: Vec<SkippedFile>,
}

impl RegistrationReport {
    /// True when no file was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Supported language set plus the catalogs registered for each language.
#[derive(Debug, Default)]
pub struct Registry {
    supported: Vec<LanguageTag>,
    catalogs: HashMap<LanguageTag, Vec<Box<dyn Catalog>>>,
}

impl Registry {
    /// An uninitialized registry: no languages, no catalogs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a single supported language, `default`, with no catalogs.
    ///
    /// Calling this again discards everything registered since.
    pub fn initialize(&mut self, default: &LanguageTag) {
        self.catalogs.clear();
        self.supported.clear();
        self.supported.push(default.clone());
    }

    /// Supported languages in registration order, the default first.
    /// May contain duplicates.
    pub fn supported(&self) -> &[LanguageTag] {
        &self.supported
    }

    /// Total number of registered catalogs.
    pub fn catalog_count(&self) -> usize {
        self.catalogs.values().map(Vec::len).sum()
    }

    /// Add a catalog and append its language to the supported set.
    pub fn register_catalog(&mut self, catalog: Box<dyn Catalog>) {
        let tag = catalog.language().clone();
        self.supported.push(tag.clone());
        self.catalogs.entry(tag).or_default().push(catalog);
    }

    /// Register every message file in `dir`.
    ///
    /// Fails only when `dir` cannot be listed, in which case nothing
    /// changes. Unreadable or unparseable files are skipped, logged and
    /// listed in the report.
    pub fn register_directory(
        &mut self,
        source: &(impl MessageSource + ?Sized),
        dir: &str,
    ) -> Result<RegistrationReport> {
        let names = source
            .list_dir(dir)
            .map_err(|source| I18nError::DirectoryUnreadable {
                dir: dir.to_string(),
                source,
            })?;

        let mut report = RegistrationReport::default();

        for name in names {
            let path = join_path(dir, &name);
            let loaded = source
                .read_file(&path)
                .map_err(|source| I18nError::ReadFailed {
                    file: path.clone(),
                    source,
                })
                .and_then(|bytes| parse_message_file(&bytes, &name));

            match loaded {
                Ok(catalog) => {
                    debug!(
                        target: "lokyn::registry",
                        "Registered {} ({} messages, {})",
                        path,
                        catalog.len(),
                        catalog.language()
                    );
                    report.registered.push(catalog.language().clone());
                    self.register_catalog(catalog);
                }
                Err(error) => {
                    warn!(target: "lokyn::registry", "Skipping {}: {}", path, error);
                    report.skipped.push(SkippedFile { file: path, error });
                }
            }
        }

        info!(
            target: "lokyn::registry",
            "Registered {} message files from {:?}, skipped {}",
            report.registered.len(),
            dir,
            report.skipped.len()
        );

        Ok(report)
    }

    /// Catalogs bound to `tag`: the exact tag's, else its language-only
    /// form's (`fr-CA` uses `fr`).
    pub fn catalogs_for(&self, tag: &LanguageTag) -> Option<&[Box<dyn Catalog>]> {
        self.catalogs
            .get(tag)
            .or_else(|| self.catalogs.get(&tag.language_only()))
            .map(Vec::as_slice)
    }

    /// Whether `key` resolves for `tag`.
    pub fn contains(&self, tag: &LanguageTag, key: &str) -> bool {
        self.catalogs_for(tag)
            .is_some_and(|catalogs| catalogs.iter().any(|c| c.contains(key)))
    }

    /// Render `key` for `tag`. The most recently registered catalog
    /// holding the key wins.
    pub fn localize(&self, tag: &LanguageTag, key: &str, count: Option<i64>) -> Result<String> {
        let catalogs = self
            .catalogs_for(tag)
            .ok_or_else(|| I18nError::CatalogNotFound(tag.to_string()))?;

        catalogs
            .iter()
            .rev()
            .find(|catalog| catalog.contains(key))
            .ok_or_else(|| I18nError::MessageNotFound {
                key: key.to_string(),
                locale: tag.to_string(),
            })?
            .localize(key, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonCatalog, MemorySource};
    use std::io;

    fn tag(raw: &str) -> LanguageTag {
        LanguageTag::parse(raw).unwrap()
    }

    fn initialized() -> Registry {
        let mut registry = Registry::new();
        registry.initialize(&LanguageTag::default());
        registry
    }

    fn tags(registry: &Registry) -> Vec<String> {
        registry.supported().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_initialize_sets_default_only() {
        let registry = initialized();
        assert_eq!(tags(&registry), vec!["en"]);
        assert_eq!(registry.catalog_count(), 0);
    }

    #[test]
    fn test_initialize_again_discards_registrations() {
        let mut registry = initialized();
        registry.register_catalog(Box::new(JsonCatalog::new(tag("fr"))));

        registry.initialize(&LanguageTag::default());
        assert_eq!(tags(&registry), vec!["en"]);
        assert_eq!(registry.catalog_count(), 0);
    }

    #[test]
    fn test_register_directory_skips_corrupt_files() {
        let source = MemorySource::new()
            .with_file("i18n/fr.json", r#"{"greeting": "Bonjour"}"#)
            .with_file("i18n/de.json", "{ this is not json")
            .with_file("i18n/notes.txt", "not a message file");

        let mut registry = initialized();
        let report = registry.register_directory(&source, "i18n").unwrap();

        assert_eq!(tags(&registry), vec!["en", "fr"]);
        assert_eq!(report.registered, vec![tag("fr")]);
        assert_eq!(report.skipped.len(), 2);
        assert!(!report.is_clean());

        let files: Vec<_> = report.skipped.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(files, vec!["i18n/de.json", "i18n/notes.txt"]);
        assert!(matches!(report.skipped[0].error, I18nError::JsonError(_)));
    }

    #[test]
    fn test_register_missing_directory_leaves_registry_unchanged() {
        let source = MemorySource::new().with_file("i18n/fr.json", "{}");
        let mut registry = initialized();

        let err = registry.register_directory(&source, "missing").unwrap_err();

        assert!(matches!(err, I18nError::DirectoryUnreadable { .. }));
        assert_eq!(tags(&registry), vec!["en"]);
    }

    struct FlakySource(MemorySource);

    impl MessageSource for FlakySource {
        fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
            self.0.list_dir(dir)
        }

        fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
            if path.ends_with("es.json") {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.0.read_file(path)
        }
    }

    #[test]
    fn test_read_failure_is_skipped() {
        let source = FlakySource(
            MemorySource::new()
                .with_file("l/es.json", r#"{"a": "b"}"#)
                .with_file("l/it.json", r#"{"a": "c"}"#),
        );
        let mut registry = initialized();

        let report = registry.register_directory(&source, "l").unwrap();

        assert_eq!(tags(&registry), vec!["en", "it"]);
        assert!(matches!(report.skipped[0].error, I18nError::ReadFailed { .. }));
    }

    #[test]
    fn test_duplicates_are_kept_and_later_catalog_wins() {
        let source = MemorySource::new()
            .with_file("l/active.fr.json", r#"{"title": "Panier", "empty": "Vide"}"#)
            .with_file("l/fr.json", r#"{"title": "Mon panier"}"#);
        let mut registry = initialized();
        registry.register_directory(&source, "l").unwrap();

        assert_eq!(tags(&registry), vec!["en", "fr", "fr"]);
        assert_eq!(registry.localize(&tag("fr"), "title", None).unwrap(), "Mon panier");
        assert_eq!(registry.localize(&tag("fr"), "empty", None).unwrap(), "Vide");
    }

    #[test]
    fn test_region_binds_to_language_catalog() {
        let mut registry = initialized();
        let mut fr = JsonCatalog::new(tag("fr"));
        fr.add("hello", "Bonjour");
        registry.register_catalog(Box::new(fr));

        assert!(registry.contains(&tag("fr-CA"), "hello"));
        assert_eq!(registry.localize(&tag("fr-CA"), "hello", None).unwrap(), "Bonjour");
    }

    #[test]
    fn test_localize_errors() {
        let mut registry = initialized();
        registry.register_catalog(Box::new(JsonCatalog::new(tag("fr"))));

        assert!(matches!(
            registry.localize(&tag("xx"), "hello", None),
            Err(I18nError::CatalogNotFound(_))
        ));
        assert!(matches!(
            registry.localize(&tag("fr"), "hello", None),
            Err(I18nError::MessageNotFound { .. })
        ));
    }
}
