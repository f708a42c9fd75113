//! Error types for i18n operations

use thiserror::Error;

/// Errors that can occur while registering or resolving translations.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Invalid locale string
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// The translation directory could not be listed
    #[error("Cannot list translation directory {dir}: {source}")]
    DirectoryUnreadable {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    /// A message file could not be read
    #[error("Cannot read message file {file}: {source}")]
    ReadFailed {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not name a known message format
    #[error("Unsupported message file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to parse message file
    #[error("Failed to parse message file {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// No catalog registered for the language
    #[error("No catalog for locale: {0}")]
    CatalogNotFound(String),

    /// Message not found
    #[error("Message not found: {key} for locale {locale}")]
    MessageNotFound { key: String, locale: String },

    /// Plural message without the selected form nor an `other` form
    #[error("Message {key} has no plural form {category}")]
    PluralFormMissing { key: String, category: String },

    /// Fluent error
    #[error("Fluent error: {0}")]
    FluentError(String),

    /// The host did not report preferred locales
    #[error("Locale detection failed: {0}")]
    LocaleDetection(String),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid plural category
    #[error("Invalid plural category: {0}")]
    InvalidPluralCategory(String),
}
