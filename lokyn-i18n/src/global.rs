//! Process-wide translator
//!
//! Free functions over one lazily created [`Translator`], for hosts that do
//! not want to pass a context around. The translator is built from
//! [`I18nConfig::from_env`] with the system's locales unless the host
//! [`install`]s its own before first use.

use crate::registry::RegistrationReport;
use crate::store::MessageSource;
use crate::{I18nConfig, Result, Translator};
use once_cell::sync::OnceCell;
use std::path::Path;

static GLOBAL: OnceCell<Translator> = OnceCell::new();

/// Use `translator` as the process-wide translator.
///
/// Fails, handing the translator back, once the global one exists.
pub fn install(translator: Translator) -> std::result::Result<(), Translator> {
    GLOBAL.set(translator)
}

/// The process-wide translator, created on first access.
pub fn translator() -> &'static Translator {
    GLOBAL.get_or_init(|| Translator::builder().config(I18nConfig::from_env()).build())
}

/// See [`Translator::init`].
pub fn init() {
    translator().init();
}

/// See [`Translator::add_translation_fs`].
pub fn add_translation_fs(
    source: &(impl MessageSource + ?Sized),
    dir: &str,
) -> Result<RegistrationReport> {
    translator().add_translation_fs(source, dir)
}

/// See [`Translator::add_translation_dir`].
pub fn add_translation_dir(dir: impl AsRef<Path>) -> Result<RegistrationReport> {
    translator().add_translation_dir(dir)
}

/// See [`Translator::current_language`].
pub fn get_current_language() -> String {
    translator().current_language()
}

/// See [`Translator::set_language`].
pub fn set_language(tag: &str) {
    translator().set_language(tag);
}

/// See [`Translator::l`].
pub fn l(key: &str) -> String {
    translator().l(key)
}

/// See [`Translator::p`].
pub fn p(key: &str, count: i64) -> String {
    translator().p(key, count)
}
