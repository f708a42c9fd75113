//! Locale negotiation and translated message lookup for Lokyn
//!
//! - **Registration**: load every message file of a directory into catalogs
//! - **Negotiation**: pick the supported language closest to the user's
//!   preferred locales
//! - **Lookup**: translate keys, with CLDR plural selection; a missing
//!   translation falls back to the key itself
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lokyn_i18n::Translator;
//!
//! let translator = Translator::new();
//! let report = translator.add_translation_dir("locales")?;
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.file, skipped.error);
//! }
//!
//! println!("{}", translator.l("greeting"));
//! println!("{}", translator.p("cart.items", 3));
//! # Ok::<(), lokyn_i18n::I18nError>(())
//! ```
//!
//! # Message Files
//!
//! The file name carries the language (`fr.json`, `active.pt-BR.json`,
//! `de.ftl`). JSON files map keys to strings; nested objects give dotted
//! keys and objects of plural categories give plural messages:
//!
//! ```json
//! {
//!   "greeting": "Hello!",
//!   "cart": {
//!     "items": { "one": "1 item", "other": "{{count}} items" }
//!   }
//! }
//! ```
//!
//! With the `fluent` feature (on by default), `.ftl` files are loaded with
//! `fluent-bundle` and receive the plural count as `$count`.
//!
//! # Global Facade
//!
//! The [`global`] module offers the same operations over one process-wide
//! translator:
//!
//! ```rust,no_run
//! use lokyn_i18n::global;
//!
//! global::init();
//! global::add_translation_dir("locales")?;
//! global::set_language("fr");
//! println!("{}", global::l("greeting"));
//! # Ok::<(), lokyn_i18n::I18nError>(())
//! ```

#[cfg(feature = "fluent")]
mod bundle;
mod config;
mod detect;
mod error;
pub mod global;
mod locale;
mod messages;
mod plural;
mod registry;
mod store;
mod translator;

#[cfg(feature = "fluent")]
pub use bundle::FluentCatalog;
pub use config::{I18nConfig, LANGUAGE_ENV};
pub use detect::{EnvLocales, LocaleSource, StaticLocales, SystemLocales};
pub use error::I18nError;
pub use locale::{LanguageTag, best_match};
pub use messages::{Catalog, JsonCatalog, Message};
pub use plural::{PluralCategory, plural_category};
pub use registry::{RegistrationReport, Registry, SkippedFile};
#[cfg(feature = "embed")]
pub use store::EmbeddedSource;
pub use store::{
    DirSource, MemorySource, MessageFormat, MessageSource, classify_file, join_path,
    parse_message_file,
};
pub use translator::{Translator, TranslatorBuilder};

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Catalog, I18nConfig, I18nError, LanguageTag, LocaleSource, MessageSource,
        RegistrationReport, Result, Translator, best_match,
    };
}
