//! Process-wide character → HTML named-entity lookup table.
//!
//! Initialized once at first use and read-only thereafter. Covers the common
//! HTML4 named entities the regex synthesizer needs to tolerate inside
//! markup-bearing source text; any character without a named form still
//! matches through its numeric entity (`&#<codepoint>;`), so this table is an
//! optimization/readability aid, not a completeness requirement.

use std::collections::HashMap;
use std::sync::LazyLock;

/// `char` → bare entity name (without leading `&` or trailing `;`).
pub static CHAR_TO_ENTITY: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('&', "amp"),
        ('<', "lt"),
        ('>', "gt"),
        ('"', "quot"),
        ('\'', "apos"),
        ('\u{a0}', "nbsp"),
        ('\u{a9}', "copy"),
        ('\u{ae}', "reg"),
        ('\u{2122}', "trade"),
        ('\u{e0}', "agrave"),
        ('\u{e1}', "aacute"),
        ('\u{e2}', "acirc"),
        ('\u{e3}', "atilde"),
        ('\u{e4}', "auml"),
        ('\u{e5}', "aring"),
        ('\u{e6}', "aelig"),
        ('\u{e7}', "ccedil"),
        ('\u{e8}', "egrave"),
        ('\u{e9}', "eacute"),
        ('\u{ea}', "ecirc"),
        ('\u{eb}', "euml"),
        ('\u{ec}', "igrave"),
        ('\u{ed}', "iacute"),
        ('\u{ee}', "icirc"),
        ('\u{ef}', "iuml"),
        ('\u{f1}', "ntilde"),
        ('\u{f2}', "ograve"),
        ('\u{f3}', "oacute"),
        ('\u{f4}', "ocirc"),
        ('\u{f5}', "otilde"),
        ('\u{f6}', "ouml"),
        ('\u{f8}', "oslash"),
        ('\u{f9}', "ugrave"),
        ('\u{fa}', "uacute"),
        ('\u{fb}', "ucirc"),
        ('\u{fc}', "uuml"),
        ('\u{fd}', "yacute"),
        ('\u{ff}', "yuml"),
        ('\u{df}', "szlig"),
        ('\u{2013}', "ndash"),
        ('\u{2014}', "mdash"),
        ('\u{2018}', "lsquo"),
        ('\u{2019}', "rsquo"),
        ('\u{201c}', "ldquo"),
        ('\u{201d}', "rdquo"),
        ('\u{2026}', "hellip"),
    ])
});

/// Named entity for `c`, if one is known.
#[must_use]
pub fn named_entity(c: char) -> Option<&'static str> {
    CHAR_TO_ENTITY.get(&c).copied()
}

/// Numeric character reference for `c` (always available).
#[must_use]
pub fn numeric_entity(c: char) -> String {
    format!("#{}", u32::from(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_entities() {
        assert_eq!(named_entity('&'), Some("amp"));
        assert_eq!(named_entity('<'), Some("lt"));
        assert_eq!(named_entity('\u{e9}'), Some("eacute"));
    }

    #[test]
    fn unknown_character_has_no_named_entity() {
        assert_eq!(named_entity('z'), None);
        assert_eq!(named_entity('5'), None);
    }

    #[test]
    fn numeric_entity_uses_codepoint() {
        assert_eq!(numeric_entity('A'), "#65");
        assert_eq!(numeric_entity('&'), "#38");
    }

    #[test]
    fn table_is_shared_and_stable() {
        let a = named_entity('&');
        let b = named_entity('&');
        assert_eq!(a, b);
    }
}
