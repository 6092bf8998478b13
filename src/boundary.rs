//! Character classes & boundary tables (regex fragments derived from [`Config`]).
//!
//! These are plain pattern-fragment strings, not compiled [`regex::Regex`]
//! values — they get spliced into the larger patterns assembled by
//! [`crate::regex_synth`] and [`crate::token`].

use crate::config::Config;

fn zero_or_more_class(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("[{body}]*")
    }
}

fn optional_class(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("[{body}]?")
    }
}

/// Regex fragments marking the transition into/out of word context, aware of
/// HTML markup and the configured ignorable-character classes.
#[derive(Debug, Clone)]
pub struct Boundaries {
    /// Start-of-word boundary: `\A`, `>`, an entity, whitespace, a non-word
    /// character, or an ignorable leading character.
    pub start_bound: String,
    /// End-of-word boundary: `\z`, `<`, `&`, whitespace, a non-word
    /// character, or an ignorable trailing character.
    pub end_bound: String,
    /// Inter-word boundary used between the words of a plain-text phrase.
    pub plain_phrase_bound: String,
    /// Inter-word boundary used between the words of an HTML-aware phrase.
    pub html_phrase_bound: String,
    /// `word_characters` with `<`, `>`, `&` removed.
    pub html_safe_word_characters: String,
}

impl Boundaries {
    /// Derive all boundary fragments from a validated [`Config`].
    #[must_use]
    pub fn from_config(cfg: &Config) -> Self {
        let wc = cfg.word_characters.as_str();
        let ws = cfg.whitespace.as_str();
        let ignf = cfg.ignore_first_char.as_str();
        let ignl = cfg.ignore_last_char.as_str();

        let start_bound = format!(
            r"(?:\A|>|&[\w#]+;|{ws}|[^{wc}]{ignf_alt})",
            ws = ws,
            wc = wc,
            ignf_alt = if ignf.is_empty() {
                String::new()
            } else {
                format!("|[{ignf}]")
            }
        );

        let end_bound = format!(
            r"(?:\z|<|&|{ws}|[^{wc}]{ignl_alt})",
            ws = ws,
            wc = wc,
            ignl_alt = if ignl.is_empty() {
                String::new()
            } else {
                format!("|[{ignl}]")
            }
        );

        let plain_phrase_bound = format!(
            "{}(?:\\s|[^{}]){}",
            zero_or_more_class(ignl),
            wc,
            optional_class(ignf)
        );

        let html_phrase_bound = format!(
            "{}(?:{}|[^{}]){}",
            zero_or_more_class(ignf),
            ws,
            wc,
            optional_class(ignl)
        );

        let html_safe_word_characters = cfg.html_safe_word_characters();

        Self {
            start_bound,
            end_bound,
            plain_phrase_bound,
            html_phrase_bound,
            html_safe_word_characters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn fragments_compile_standalone() {
        let cfg = Config::default();
        let b = Boundaries::from_config(&cfg);
        for frag in [
            &b.start_bound,
            &b.end_bound,
            &b.plain_phrase_bound,
            &b.html_phrase_bound,
        ] {
            regex::Regex::new(frag).unwrap_or_else(|e| panic!("{frag} failed: {e}"));
        }
    }

    #[test]
    fn fragments_compile_within_larger_pattern() {
        let cfg = Config::default();
        let b = Boundaries::from_config(&cfg);
        let pattern = format!("(?:{})foo(?:{})", b.start_bound, b.end_bound);
        let re = regex::Regex::new(&pattern).unwrap();
        assert!(re.is_match("foo"));
        assert!(re.is_match(" foo "));
        assert!(re.is_match(">foo<"));
    }

    #[test]
    fn html_safe_word_characters_excludes_markup() {
        let cfg = Config::builder()
            .with_word_characters(r"\p{L}\p{N}_<>&")
            .build()
            .unwrap();
        let b = Boundaries::from_config(&cfg);
        assert!(!b.html_safe_word_characters.contains('<'));
    }

    #[test]
    fn ignore_chars_extend_boundaries() {
        let cfg = Config::builder().with_ignore_first_char("'").build().unwrap();
        let b = Boundaries::from_config(&cfg);
        assert!(b.start_bound.contains('\''));
    }
}
