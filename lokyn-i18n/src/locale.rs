//! Language tags and best-fit negotiation
//!
//! [`LanguageTag`] wraps a `unic_langid::LanguageIdentifier` and accepts the
//! locale strings hosts actually report (`en_US.UTF-8`, `de_DE@euro`).
//! [`best_match`] picks the single supported tag closest to a list of
//! preferred locales.

use crate::{I18nError, Result};
use fluent_langneg::{NegotiationStrategy, negotiate_languages};
use lokyn_log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A normalized BCP 47 language tag (e.g. `en`, `fr-CA`, `zh-Hant-TW`).
///
/// # Examples
///
/// ```
/// use lokyn_i18n::LanguageTag;
///
/// let tag = LanguageTag::parse("pt_BR.UTF-8").unwrap();
/// assert_eq!(tag.to_string(), "pt-BR");
/// assert_eq!(tag.language(), "pt");
/// assert_eq!(tag.region(), Some("BR"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(LanguageIdentifier);

impl LanguageTag {
    /// Tag every supported set starts with unless configured otherwise.
    pub const DEFAULT: &'static str = "en";

    /// Parse a tag, accepting POSIX-style locale names.
    ///
    /// Encoding (`.UTF-8`) and modifier (`@euro`) suffixes are dropped and
    /// underscores become hyphens before BCP 47 validation.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = normalize(raw).ok_or_else(|| I18nError::InvalidLocale(raw.to_string()))?;
        normalized
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|e| I18nError::InvalidLocale(format!("{}: {}", raw, e)))
    }

    /// The default language, `en`.
    pub fn default_language() -> Self {
        Self(Self::DEFAULT.parse().unwrap_or_default())
    }

    /// The undetermined tag, `und`.
    pub fn undetermined() -> Self {
        Self(LanguageIdentifier::default())
    }

    /// Whether this is `und`.
    pub fn is_undetermined(&self) -> bool {
        self.0 == LanguageIdentifier::default()
    }

    /// Primary language subtag (`fr` for `fr-CA`).
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    /// Region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|r| r.as_str())
    }

    /// The tag reduced to its primary language (`fr-CA` -> `fr`).
    pub fn language_only(&self) -> Self {
        Self(LanguageIdentifier::from_parts(self.0.language, None, None, &[]))
    }

    /// Borrow the underlying identifier.
    pub fn as_langid(&self) -> &LanguageIdentifier {
        &self.0
    }
}

fn normalize(raw: &str) -> Option<String> {
    let stripped = raw.trim().split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.replace('_', "-"))
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::default_language()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LanguageTag {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<LanguageIdentifier> for LanguageTag {
    fn from(id: LanguageIdentifier) -> Self {
        Self(id)
    }
}

impl AsRef<LanguageIdentifier> for LanguageTag {
    fn as_ref(&self) -> &LanguageIdentifier {
        &self.0
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Negotiation
// ============================================================================

/// Choose the supported tag that best fits the preferred locales.
///
/// `candidates` are ordered most-preferred first. Candidates that do not
/// parse are dropped. Matching prefers an exact tag, then a supported tag
/// covering the candidate (`fr` for `fr-CA`), then likely-subtag and
/// region-stripped matches. When nothing matches, the first supported tag
/// is returned; an empty supported set yields `en`.
///
/// # Example
///
/// ```
/// use lokyn_i18n::{best_match, LanguageTag};
///
/// let supported = vec![LanguageTag::parse("en").unwrap(), LanguageTag::parse("fr").unwrap()];
/// assert_eq!(best_match(&supported, &["fr-CA", "en-US"]).to_string(), "fr");
/// assert_eq!(best_match(&supported, &["ja"]).to_string(), "en");
/// ```
pub fn best_match<S: AsRef<str>>(supported: &[LanguageTag], candidates: &[S]) -> LanguageTag {
    let Some(default) = supported.first() else {
        return LanguageTag::default_language();
    };

    let requested: Vec<LanguageTag> = candidates
        .iter()
        .filter_map(|candidate| match LanguageTag::parse(candidate.as_ref()) {
            Ok(tag) => Some(tag),
            Err(err) => {
                debug!(target: "lokyn::negotiate", "Ignoring locale candidate: {}", err);
                None
            }
        })
        .collect();

    negotiate_languages(&requested, supported, Some(default), NegotiationStrategy::Lookup)
        .into_iter()
        .next()
        .cloned()
        .unwrap_or_else(|| default.clone())
}
