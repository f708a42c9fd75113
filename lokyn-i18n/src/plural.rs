//! Pluralization Rules
//!
//! CLDR cardinal plural rules from `intl_pluralrules`, the rule set
//! `fluent-bundle` evaluates for `.ftl` files.

use crate::{I18nError, LanguageTag, Result};
use intl_pluralrules::{PluralCategory as IntlCategory, PluralRuleType, PluralRules};
use std::fmt;
use std::str::FromStr;

/// CLDR plural categories.
///
/// Not all languages use all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluralCategory {
    /// Zero items (Arabic, Welsh)
    Zero,
    /// One item (most languages)
    One,
    /// Two items (Arabic, Welsh)
    Two,
    /// Few items (Slavic languages)
    Few,
    /// Many items (Slavic languages, Arabic)
    Many,
    /// All other cases
    Other,
}

impl PluralCategory {
    /// Every category, in CLDR order.
    pub const ALL: [PluralCategory; 6] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Few,
        Self::Many,
        Self::Other,
    ];

    /// Lower-case CLDR name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl FromStr for PluralCategory {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| I18nError::InvalidPluralCategory(s.to_string()))
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IntlCategory> for PluralCategory {
    fn from(category: IntlCategory) -> Self {
        match category {
            IntlCategory::ZERO => Self::Zero,
            IntlCategory::ONE => Self::One,
            IntlCategory::TWO => Self::Two,
            IntlCategory::FEW => Self::Few,
            IntlCategory::MANY => Self::Many,
            IntlCategory::OTHER => Self::Other,
        }
    }
}

/// Cardinal rules for `tag`: the exact tag's, else its language's, else
/// English, which is also where `fluent-bundle` lands for unknown locales.
fn cardinal_rules(tag: &LanguageTag) -> Option<PluralRules> {
    [tag.clone(), tag.language_only(), LanguageTag::default_language()]
        .into_iter()
        .find_map(|candidate| {
            PluralRules::create(candidate.as_langid().clone(), PluralRuleType::CARDINAL).ok()
        })
}

/// Plural category of `count` in the language of `tag`.
///
/// # Example
///
/// ```
/// use lokyn_i18n::{plural_category, LanguageTag, PluralCategory};
///
/// let en = LanguageTag::parse("en").unwrap();
/// assert_eq!(plural_category(1, &en), PluralCategory::One);
/// assert_eq!(plural_category(0, &en), PluralCategory::Other);
/// ```
pub fn plural_category(count: i64, tag: &LanguageTag) -> PluralCategory {
    cardinal_rules(tag)
        .and_then(|rules| rules.select(count.unsigned_abs()).ok())
        .map(PluralCategory::from)
        .unwrap_or(PluralCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(raw: &str) -> LanguageTag {
        LanguageTag::parse(raw).unwrap()
    }

    #[test]
    fn test_english_plurals() {
        let en = tag("en-US");
        assert_eq!(plural_category(0, &en), PluralCategory::Other);
        assert_eq!(plural_category(1, &en), PluralCategory::One);
        assert_eq!(plural_category(-1, &en), PluralCategory::One);
        assert_eq!(plural_category(2, &en), PluralCategory::Other);
    }

    #[test]
    fn test_french_plurals() {
        let fr = tag("fr");
        assert_eq!(plural_category(0, &fr), PluralCategory::One);
        assert_eq!(plural_category(1, &fr), PluralCategory::One);
        assert_eq!(plural_category(2, &fr), PluralCategory::Other);
    }

    #[test]
    fn test_russian_plurals() {
        let ru = tag("ru");
        assert_eq!(plural_category(1, &ru), PluralCategory::One);
        assert_eq!(plural_category(2, &ru), PluralCategory::Few);
        assert_eq!(plural_category(5, &ru), PluralCategory::Many);
        assert_eq!(plural_category(11, &ru), PluralCategory::Many);
        assert_eq!(plural_category(21, &ru), PluralCategory::One);
        assert_eq!(plural_category(22, &ru), PluralCategory::Few);
        assert_eq!(plural_category(112, &ru), PluralCategory::Many);
    }

    #[test]
    fn test_polish_plurals() {
        let pl = tag("pl");
        assert_eq!(plural_category(1, &pl), PluralCategory::One);
        assert_eq!(plural_category(21, &pl), PluralCategory::Many);
        assert_eq!(plural_category(23, &pl), PluralCategory::Few);
    }

    #[test]
    fn test_japanese_plurals() {
        let ja = tag("ja");
        assert_eq!(plural_category(0, &ja), PluralCategory::Other);
        assert_eq!(plural_category(1, &ja), PluralCategory::Other);
    }

    #[test]
    fn test_arabic_plurals() {
        let ar = tag("ar");
        assert_eq!(plural_category(0, &ar), PluralCategory::Zero);
        assert_eq!(plural_category(2, &ar), PluralCategory::Two);
        assert_eq!(plural_category(105, &ar), PluralCategory::Few);
        assert_eq!(plural_category(11, &ar), PluralCategory::Many);
        assert_eq!(plural_category(100, &ar), PluralCategory::Other);
    }

    #[test]
    fn test_portuguese_variants() {
        assert_eq!(plural_category(0, &tag("pt-BR")), PluralCategory::One);
        assert_eq!(plural_category(0, &tag("pt-PT")), PluralCategory::Other);
        assert_eq!(plural_category(1, &tag("pt-PT")), PluralCategory::One);
    }

    #[test]
    fn test_hebrew_romanian_lithuanian() {
        assert_eq!(plural_category(2, &tag("he")), PluralCategory::Two);
        assert_eq!(plural_category(0, &tag("ro")), PluralCategory::Few);
        assert_eq!(plural_category(20, &tag("ro")), PluralCategory::Other);
        assert_eq!(plural_category(21, &tag("lt")), PluralCategory::One);
        assert_eq!(plural_category(5, &tag("lt")), PluralCategory::Few);
        assert_eq!(plural_category(10, &tag("lt")), PluralCategory::Other);
    }

    #[test]
    fn test_regional_and_unknown_tags_fall_back() {
        assert_eq!(plural_category(0, &tag("fr-CA")), PluralCategory::One);
        assert_eq!(plural_category(1, &tag("xx")), PluralCategory::One);
        assert_eq!(plural_category(2, &LanguageTag::undetermined()), PluralCategory::Other);
    }

    #[test]
    fn test_plural_category_parse() {
        assert_eq!("one".parse::<PluralCategory>().unwrap(), PluralCategory::One);
        assert_eq!("OTHER".parse::<PluralCategory>().unwrap(), PluralCategory::Other);
        assert!("several".parse::<PluralCategory>().is_err());
    }
}
