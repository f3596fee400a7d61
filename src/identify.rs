//! Canonical identifiers for export columns.
//!
//! A column name resolves to the symbolic tag of the first keyword group it
//! contains, otherwise to the first integer in the name, otherwise to the
//! normalised name itself. Resolution never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::KeywordSet;
use crate::model::{CanonicalKey, CommonTag, IdentifierMapping};

static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Upper-cased, trimmed form used for every keyword comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Returns true when `normalized` contains any of `keywords`.
pub(crate) fn contains_keyword<'a>(
    normalized: &str,
    keywords: impl IntoIterator<Item = &'a str>,
) -> bool {
    keywords
        .into_iter()
        .any(|keyword| !keyword.is_empty() && normalized.contains(&keyword.to_uppercase()))
}

/// Resolves the grouping key for a column name.
pub fn canonical_key(name: &str, keywords: &KeywordSet) -> CanonicalKey {
    let normalized = normalize_name(name);

    let tagged = [
        (CommonTag::Lobby, &keywords.lobby),
        (CommonTag::Management, &keywords.management),
        (CommonTag::Fitness, &keywords.fitness),
        (CommonTag::Common, &keywords.common),
    ];
    for (tag, group) in tagged {
        if contains_keyword(&normalized, group.iter().map(String::as_str)) {
            return CanonicalKey::Tag(tag);
        }
    }

    // Digit runs too long for u32 fall through to the name fallback.
    if let Some(number) = FIRST_INTEGER
        .find(&normalized)
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
    {
        return CanonicalKey::Number(number);
    }

    CanonicalKey::Name(normalized)
}

/// Old identifier recorded for `key`, empty when the mapping has none.
pub fn old_identifier(mapping: &IdentifierMapping, key: &CanonicalKey) -> String {
    mapping.old_id_for(key).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> CanonicalKey {
        canonical_key(name, &KeywordSet::default())
    }

    #[test]
    fn unit_columns_resolve_to_their_number() {
        assert_eq!(key("DAIRE 5A"), CanonicalKey::Number(5));
        assert_eq!(key("daire 12"), CanonicalKey::Number(12));
        assert_eq!(key(" DAIRE 80F "), CanonicalKey::Number(80));
    }

    #[test]
    fn keywords_take_priority_over_numbers() {
        assert_eq!(key("LOBI 2"), CanonicalKey::Tag(CommonTag::Lobby));
        assert_eq!(key("Yonetim Ofisi"), CanonicalKey::Tag(CommonTag::Management));
        assert_eq!(key("FITNESS"), CanonicalKey::Tag(CommonTag::Fitness));
        assert_eq!(key("MUTFAK 1"), CanonicalKey::Tag(CommonTag::Common));
        assert_eq!(key("P.O"), CanonicalKey::Tag(CommonTag::Common));
    }

    #[test]
    fn lobby_wins_over_later_groups() {
        assert_eq!(key("LOBI FITNESS"), CanonicalKey::Tag(CommonTag::Lobby));
    }

    #[test]
    fn names_without_keyword_or_number_fall_back_to_themselves() {
        assert_eq!(key(" restoran "), CanonicalKey::Name("RESTORAN".to_string()));
        assert_eq!(key("RES 3"), CanonicalKey::Number(3));
    }

    #[test]
    fn extraction_is_deterministic() {
        for name in ["DAIRE 7B", "LOBI", "RESTORAN", "BAYBAYAN 2"] {
            assert_eq!(key(name), key(name));
        }
    }

    #[test]
    fn old_identifier_round_trip() {
        let mapping: IdentifierMapping = [("5", "100")].into_iter().collect();

        assert_eq!(old_identifier(&mapping, &CanonicalKey::Number(5)), "100");
        assert_eq!(old_identifier(&mapping, &CanonicalKey::Number(6)), "");
    }
}
