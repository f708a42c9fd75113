//! Message catalogs
//!
//! A [`Catalog`] holds the translated messages of one language. JSON message
//! files become a [`JsonCatalog`]; Fluent files become a
//! [`FluentCatalog`](crate::FluentCatalog).

use crate::{I18nError, LanguageTag, PluralCategory, Result, plural_category};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Translated messages for a single language.
pub trait Catalog: fmt::Debug + Send + Sync {
    /// Language the messages are written in.
    fn language(&self) -> &LanguageTag;

    /// Whether `key` has a message.
    fn contains(&self, key: &str) -> bool;

    /// Render `key`, selecting a plural form when `count` is given.
    fn localize(&self, key: &str, count: Option<i64>) -> Result<String>;

    /// Number of messages.
    fn len(&self) -> usize;

    /// Whether the catalog has no messages.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A message from a JSON catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Same text for every count
    Text(String),
    /// One text per CLDR plural category
    Plural(BTreeMap<PluralCategory, String>),
}

impl Message {
    /// Build a plural message from `(category, text)` pairs.
    pub fn plural<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = (PluralCategory, S)>,
        S: Into<String>,
    {
        Self::Plural(forms.into_iter().map(|(c, s)| (c, s.into())).collect())
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Catalog parsed from a JSON message file.
///
/// Accepted shape:
///
/// ```json
/// {
///   "greeting": "Hello!",
///   "cart": {
///     "title": "Your cart",
///     "items": { "one": "1 item", "other": "{{count}} items" }
///   }
/// }
/// ```
///
/// Nested objects produce dot-joined keys (`cart.title`). An object whose
/// keys are plural categories is a plural message (`cart.items`). go-i18n
/// message objects are read too: `translation` holds the text or the plural
/// forms, and `id`, `hash`, `description`, `leftDelim` and `rightDelim` are
/// ignored.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    language: LanguageTag,
    messages: HashMap<String, Message>,
}

impl JsonCatalog {
    /// Create an empty catalog.
    pub fn new(language: LanguageTag) -> Self {
        Self {
            language,
            messages: HashMap::new(),
        }
    }

    /// Parse JSON message data.
    pub fn from_json(language: LanguageTag, json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(root) = value else {
            return Err(I18nError::ParseError {
                file: language.to_string(),
                reason: "top-level value must be an object".to_string(),
            });
        };

        let mut catalog = Self::new(language);
        catalog.collect("", root)?;
        Ok(catalog)
    }

    fn collect(&mut self, prefix: &str, object: serde_json::Map<String, serde_json::Value>) -> Result<()> {
        for (name, value) in object {
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{}.{}", prefix, name)
            };

            match value {
                serde_json::Value::String(text) => {
                    self.messages.insert(key, Message::Text(text));
                }
                serde_json::Value::Object(inner) if is_message_object(&inner) => {
                    let message = self.message_object(&key, inner)?;
                    self.messages.insert(key, message);
                }
                serde_json::Value::Object(inner) => self.collect(&key, inner)?,
                other => {
                    return Err(I18nError::ParseError {
                        file: self.language.to_string(),
                        reason: format!("unsupported value for {}: {}", key, other),
                    });
                }
            }
        }
        Ok(())
    }

    fn message_object(
        &self,
        key: &str,
        mut object: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Message> {
        match object.remove("translation") {
            Some(serde_json::Value::String(text)) => Ok(Message::Text(text)),
            Some(serde_json::Value::Object(forms)) => self.plural_forms(key, forms),
            Some(other) => Err(I18nError::ParseError {
                file: self.language.to_string(),
                reason: format!("translation of {} is not a string: {}", key, other),
            }),
            None => self.plural_forms(key, object),
        }
    }

    fn plural_forms(
        &self,
        key: &str,
        object: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Message> {
        let forms = object
            .into_iter()
            .filter_map(|(form, text)| Some((form.parse::<PluralCategory>().ok()?, text)))
            .map(|(category, text)| match text {
                serde_json::Value::String(text) => Ok((category, text)),
                other => Err(I18nError::ParseError {
                    file: self.language.to_string(),
                    reason: format!("plural form {}.{} is not a string: {}", key, category, other),
                }),
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        if forms.is_empty() {
            return Err(I18nError::ParseError {
                file: self.language.to_string(),
                reason: format!("{} has no plural forms", key),
            });
        }
        Ok(Message::Plural(forms))
    }

    /// Add a message.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<Message>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Get a message.
    pub fn get(&self, key: &str) -> Option<&Message> {
        self.messages.get(key)
    }

    /// All message keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

/// Keys go-i18n writes next to the translation itself.
const METADATA_KEYS: [&str; 5] = ["id", "hash", "description", "leftDelim", "rightDelim"];

/// An object holding one message: plural forms or a `translation`, plus
/// optional metadata. Anything else is a namespace.
fn is_message_object(object: &serde_json::Map<String, serde_json::Value>) -> bool {
    let mut has_text = false;
    for name in object.keys() {
        if name == "translation" || name.parse::<PluralCategory>().is_ok() {
            has_text = true;
        } else if !METADATA_KEYS.contains(&name.as_str()) {
            return false;
        }
    }
    has_text
}

impl Catalog for JsonCatalog {
    fn language(&self) -> &LanguageTag {
        &self.language
    }

    fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    fn localize(&self, key: &str, count: Option<i64>) -> Result<String> {
        let message = self.messages.get(key).ok_or_else(|| I18nError::MessageNotFound {
            key: key.to_string(),
            locale: self.language.to_string(),
        })?;

        let template = match (message, count) {
            (Message::Text(text), _) => text.as_str(),
            (Message::Plural(forms), count) => {
                let category = count
                    .map(|n| plural_category(n, &self.language))
                    .unwrap_or(PluralCategory::Other);
                forms
                    .get(&category)
                    .or_else(|| forms.get(&PluralCategory::Other))
                    .ok_or_else(|| I18nError::PluralFormMissing {
                        key: key.to_string(),
                        category: category.to_string(),
                    })?
                    .as_str()
            }
        };

        Ok(render(template, count))
    }

    fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Count placeholders, including the go-i18n template spellings.
const COUNT_PLACEHOLDERS: [&str; 3] = ["{{count}}", "{{.Count}}", "{{.PluralCount}}"];

/// Substitute the count placeholders.
fn render(template: &str, count: Option<i64>) -> String {
    match count {
        Some(n) if template.contains("{{") => {
            let n = n.to_string();
            COUNT_PLACEHOLDERS
                .iter()
                .fold(template.to_string(), |text, placeholder| text.replace(placeholder, &n))
        }
        _ => template.to_string(),
    }
}
