//! Fluent Catalogs
//!
//! Mozilla Fluent (`.ftl`) message files. Plural selection is written in the
//! message itself and receives the count as `$count`:
//!
//! ```ftl
//! cart-items = { $count ->
//!     [one] 1 item
//!    *[other] { $count } items
//! }
//! ```

use crate::{Catalog, I18nError, LanguageTag, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use fluent_syntax::ast;
use std::collections::HashSet;
use std::fmt;

/// Catalog backed by a thread-safe `fluent-bundle` bundle.
pub struct FluentCatalog {
    language: LanguageTag,
    bundle: FluentBundle<FluentResource>,
    ids: HashSet<String>,
}

impl fmt::Debug for FluentCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentCatalog")
            .field("language", &self.language)
            .field("messages", &self.ids.len())
            .finish_non_exhaustive()
    }
}

fn join_errors<E: fmt::Debug>(errors: impl IntoIterator<Item = E>) -> String {
    errors
        .into_iter()
        .map(|e| format!("{:?}", e))
        .collect::<Vec<_>>()
        .join(", ")
}

impl FluentCatalog {
    /// Parse Fluent source. Any syntax error rejects the whole resource.
    pub fn from_ftl(language: LanguageTag, source: &str) -> Result<Self> {
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| I18nError::FluentError(join_errors(errors)))?;

        let ids = resource
            .entries()
            .filter_map(|entry| match entry {
                ast::Entry::Message(message) => Some(message.id.name.to_string()),
                _ => None,
            })
            .collect();

        let mut bundle = FluentBundle::new_concurrent(vec![language.as_langid().clone()]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| I18nError::FluentError(join_errors(errors)))?;

        Ok(Self {
            language,
            bundle,
            ids,
        })
    }
}

impl Catalog for FluentCatalog {
    fn language(&self) -> &LanguageTag {
        &self.language
    }

    fn contains(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    fn localize(&self, key: &str, count: Option<i64>) -> Result<String> {
        let not_found = || I18nError::MessageNotFound {
            key: key.to_string(),
            locale: self.language.to_string(),
        };

        let message = self.bundle.get_message(key).ok_or_else(not_found)?;
        let pattern = message.value().ok_or_else(not_found)?;

        let args = count.map(|n| {
            let mut args = FluentArgs::new();
            args.set("count", n);
            args
        });

        let mut errors = vec![];
        let text = self.bundle.format_pattern(pattern, args.as_ref(), &mut errors);

        if !errors.is_empty() {
            return Err(I18nError::FluentError(join_errors(errors)));
        }

        Ok(text.into_owned())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
