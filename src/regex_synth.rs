//! Regex synthesizer (§4.4): builds a plain and an HTML-aware [`regex::Regex`]
//! per term via a small typed fragment builder, rather than ad hoc
//! `format!`/`push_str` string concatenation threaded through the character
//! loop — this keeps the character-by-character HTML construction
//! independently unit-testable, per the teacher pack's REDESIGN FLAGS.

use regex::{Regex, RegexBuilder};

use crate::boundary::Boundaries;
use crate::config::Config;
use crate::entities::named_entity;
use crate::error::{SearchError, SearchResult};
use crate::term::Term;

/// The two regular expressions synthesized for one term.
#[derive(Debug, Clone)]
pub struct RegexPair {
    /// Matches the term in plain (non-markup) text.
    pub plain: Regex,
    /// Matches the term tolerant of interleaved tags and character entities.
    pub html: Regex,
}

/// One piece of a regex pattern under construction.
#[derive(Debug, Clone, PartialEq)]
enum RegexFragment {
    /// A literal run of already-escaped regex source, inserted verbatim.
    Literal(String),
    /// A single source character, rendered as an entity-tolerant alternation.
    CharAlt(char),
    /// The configured wildcard, rendered as zero-or-more html-safe word characters.
    Wildcard,
    /// Zero or more HTML tags, permitted between matched characters.
    TagGap,
    /// A word-boundary gap inside a phrase.
    PhraseBound(PhraseBoundKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PhraseBoundKind {
    Plain,
    Html,
}

struct FragmentBuilder {
    fragments: Vec<RegexFragment>,
}

impl FragmentBuilder {
    fn new() -> Self {
        Self {
            fragments: Vec::new(),
        }
    }

    fn push(&mut self, frag: RegexFragment) -> &mut Self {
        self.fragments.push(frag);
        self
    }

    fn render(&self, bounds: &Boundaries, tag_re: &str) -> String {
        let mut out = String::new();
        for frag in &self.fragments {
            match frag {
                RegexFragment::Literal(s) => out.push_str(s),
                RegexFragment::CharAlt(c) => out.push_str(&render_char_alt(*c)),
                RegexFragment::Wildcard => {
                    out.push('[');
                    out.push_str(&bounds.html_safe_word_characters);
                    out.push_str("]*");
                }
                RegexFragment::TagGap => {
                    out.push('(');
                    out.push_str(tag_re);
                    out.push_str(")*");
                }
                RegexFragment::PhraseBound(PhraseBoundKind::Plain) => {
                    out.push_str(&bounds.plain_phrase_bound);
                }
                RegexFragment::PhraseBound(PhraseBoundKind::Html) => {
                    out.push_str(&bounds.html_phrase_bound);
                }
            }
        }
        out
    }
}

fn render_char_alt(c: char) -> String {
    let literal = regex::escape(&c.to_string());
    let mut alts = vec![literal];
    if let Some(name) = named_entity(c) {
        alts.push(format!("&{name};"));
    }
    alts.push(format!("&{};", numeric_entity_ref(c)));
    format!("(?:{})", alts.join("|"))
}

fn numeric_entity_ref(c: char) -> String {
    crate::entities::numeric_entity(c)
}

/// Build the [`RegexPair`] for a single term.
///
/// # Errors
/// Returns [`SearchError::InvalidConfig`] if the synthesized pattern fails to
/// compile (would indicate a malformed `word_characters`/`tag_re` fragment).
pub fn synthesize(term: &Term, cfg: &Config, bounds: &Boundaries) -> SearchResult<RegexPair> {
    let plain_pattern = build_plain_pattern(term, cfg, bounds);
    let html_pattern = build_html_pattern(term, cfg, bounds);

    let plain = compile(&plain_pattern, "plain", cfg.ignore_case)?;
    let html = compile(&html_pattern, "html", cfg.ignore_case)?;

    Ok(RegexPair { plain, html })
}

fn compile(pattern: &str, which: &'static str, ignore_case: bool) -> SearchResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| SearchError::InvalidConfig {
            field: which,
            message: e.to_string(),
        })
}

fn build_plain_pattern(term: &Term, cfg: &Config, bounds: &Boundaries) -> String {
    let mut builder = FragmentBuilder::new();
    let mut body = String::new();
    for ch in term.text.chars() {
        if ch == cfg.wildcard {
            body.push_str(&format!("[{}]*", bounds.html_safe_word_characters));
        } else if ch == ' ' {
            body.push_str(&bounds.plain_phrase_bound);
        } else {
            body.push_str(&regex::escape(&ch.to_string()));
        }
    }
    builder.push(RegexFragment::Literal(format!(
        r"(?:\A|{bound})({body})(?:\z|{bound})",
        bound = bounds.plain_phrase_bound,
        body = body
    )));
    builder.render(bounds, &cfg.tag_re)
}

fn build_html_pattern(term: &Term, cfg: &Config, bounds: &Boundaries) -> String {
    let mut builder = FragmentBuilder::new();
    let chars: Vec<char> = term.text.chars().collect();
    let last_index = chars.len().saturating_sub(1);

    for (i, &ch) in chars.iter().enumerate() {
        if ch == cfg.wildcard {
            builder.push(RegexFragment::Wildcard);
        } else if ch == ' ' {
            builder.push(RegexFragment::PhraseBound(PhraseBoundKind::Html));
            builder.push(RegexFragment::TagGap);
            continue;
        } else {
            builder.push(RegexFragment::CharAlt(ch));
        }
        if i != last_index {
            builder.push(RegexFragment::TagGap);
        }
    }

    let body = builder.render(bounds, &cfg.tag_re);
    format!(
        "(?:{start})({body})(?:{end})",
        start = bounds.start_bound,
        end = bounds.end_bound
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn term(text: &str) -> Term {
        Term {
            text: text.to_string(),
            is_phrase: text.contains(' '),
            has_wildcard: text.contains('*'),
            order: 0,
        }
    }

    #[test]
    fn plain_regex_self_matches() {
        let cfg = Config::default();
        let bounds = Boundaries::from_config(&cfg);
        let pair = synthesize(&term("brown"), &cfg, &bounds).unwrap();
        assert!(pair.plain.is_match("brown"));
        assert!(pair.plain.is_match(" brown "));
        assert!(!pair.plain.is_match("browner"));
    }

    #[test]
    fn html_regex_self_matches() {
        let cfg = Config::default();
        let bounds = Boundaries::from_config(&cfg);
        let pair = synthesize(&term("brown"), &cfg, &bounds).unwrap();
        assert!(pair.html.is_match("brown"));
    }

    #[test]
    fn html_regex_tolerates_tags() {
        let cfg = Config::default();
        let bounds = Boundaries::from_config(&cfg);
        let pair = synthesize(&term("united states"), &cfg, &bounds).unwrap();
        assert!(pair.html.is_match("united <b>states</b>"));
        assert!(!pair.plain.is_match("united <b>states</b>"));
        assert!(pair.plain.is_match("united states"));
    }

    #[test]
    fn html_regex_tolerates_numeric_entities() {
        let cfg = Config::default();
        let bounds = Boundaries::from_config(&cfg);
        let pair = synthesize(&term("ab"), &cfg, &bounds).unwrap();
        assert!(pair.html.is_match("&#97;&#98;"));
    }

    #[test]
    fn wildcard_matches_suffix() {
        let cfg = Config::default();
        let bounds = Boundaries::from_config(&cfg);
        let pair = synthesize(&term("foo*"), &cfg, &bounds).unwrap();
        assert!(pair.plain.is_match("foobar"));
        assert!(pair.plain.is_match("foo"));
    }

    #[test]
    fn case_insensitive_by_default() {
        let cfg = Config::default();
        let bounds = Boundaries::from_config(&cfg);
        let pair = synthesize(&term("Brown"), &cfg, &bounds).unwrap();
        assert!(pair.plain.is_match("BROWN"));
    }

    #[test]
    fn fragment_builder_renders_char_alt_with_named_entity() {
        let rendered = render_char_alt('&');
        assert!(rendered.contains("&amp;"));
        assert!(rendered.contains("&#38;"));
    }
}
