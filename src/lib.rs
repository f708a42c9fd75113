// Lokyn - locale negotiation and translated message lookup
//
// Picks the supported language closest to the user's preferred locales and
// resolves message keys against the catalogs registered for it.

// Re-export the i18n crate
pub use lokyn_i18n::*;

// Process-wide facade
pub use lokyn_i18n::global::{
    add_translation_dir, add_translation_fs, get_current_language, init, install, l, p,
    set_language, translator,
};

// Logging
pub use lokyn_log as log;
