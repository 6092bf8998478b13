//! Term extraction (§4.3): walks a parsed [`QueryTree`] into a normalized,
//! ordered list of [`Term`]s — stopwords dropped, wildcards deduplicated,
//! stemming applied, text folded to Unicode NFC.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::parser::{Leaf, LeafValue, QueryTree};

/// A single normalized word or phrase extracted from a query.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Term {
    /// NFC UTF-8 text; phrase words are single-space separated.
    pub text: String,
    /// Whether this term spans more than one word.
    pub is_phrase: bool,
    /// Whether any word in this term ends with the configured wildcard.
    pub has_wildcard: bool,
    /// Position in first-occurrence order within the original query.
    pub order: u32,
}

/// Extract the ordered, deduplicated term list from a parsed query tree.
///
/// # Errors
/// Returns [`SearchError::StemmerFailure`] if the configured stemmer panics
/// or returns an empty string for a non-empty word, and
/// [`SearchError::InvalidConfig`] if `word_characters` does not compile.
pub fn extract_terms(tree: &QueryTree, cfg: &Config) -> SearchResult<Vec<Term>> {
    let mut raw_values = Vec::new();
    collect_values(tree, cfg, &mut raw_values);

    let word_re = Regex::new(&format!(
        r"[{wc}]+{wild}?",
        wc = cfg.word_characters,
        wild = regex::escape(&cfg.wildcard.to_string())
    ))
    .map_err(|e| SearchError::InvalidConfig {
        field: "word_characters",
        message: e.to_string(),
    })?;
    let uri_re = Regex::new(&format!(
        r"[{wc}][@.\\][{wc}]",
        wc = cfg.word_characters
    ))
    .map_err(|e| SearchError::InvalidConfig {
        field: "word_characters",
        message: e.to_string(),
    })?;
    let ignore_first_re = compile_edge_class(&cfg.ignore_first_char, true)?;
    let ignore_last_re = compile_edge_class(&cfg.ignore_last_char, false)?;

    let mut terms: Vec<Term> = Vec::new();
    let mut position_of: HashMap<String, usize> = HashMap::new();

    for raw in raw_values {
        let Some(candidate) = build_candidate(
            &raw,
            cfg,
            &word_re,
            &uri_re,
            ignore_first_re.as_ref(),
            ignore_last_re.as_ref(),
        )?
        else {
            continue;
        };
        if let Some(&idx) = position_of.get(&candidate.text) {
            let order = terms[idx].order;
            terms[idx] = Term { order, ..candidate };
        } else {
            position_of.insert(candidate.text.clone(), terms.len());
            terms.push(Term {
                order: terms.len() as u32,
                ..candidate
            });
        }
    }

    dedup_wildcards(&mut terms, cfg.wildcard);
    Ok(terms)
}

fn collect_values(tree: &QueryTree, cfg: &Config, out: &mut Vec<String>) {
    for leaf in tree.plus.iter().chain(tree.neutral.iter()) {
        collect_leaf(leaf, cfg, out);
    }
}

fn collect_leaf(leaf: &Leaf, cfg: &Config, out: &mut Vec<String>) {
    if let Some(field) = &leaf.field {
        if cfg.ignore_fields.contains(&field.to_lowercase()) {
            return;
        }
    }
    match &leaf.value {
        LeafValue::Word(w) => out.push(w.clone()),
        LeafValue::Phrase { text, .. } => out.push(text.clone()),
        LeafValue::Group(inner) => collect_values(inner, cfg, out),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compile_edge_class(class_body: &str, leading: bool) -> SearchResult<Option<Regex>> {
    if class_body.is_empty() {
        return Ok(None);
    }
    let pattern = if leading {
        format!("^[{class_body}]+")
    } else {
        format!("[{class_body}]+$")
    };
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| SearchError::InvalidConfig {
            field: if leading {
                "ignore_first_char"
            } else {
                "ignore_last_char"
            },
            message: e.to_string(),
        })
}

fn strip_ignore_chars<'a>(s: &'a str, first: Option<&Regex>, last: Option<&Regex>) -> &'a str {
    let mut out = s;
    if let Some(re) = first {
        if let Some(m) = re.find(out) {
            if m.start() == 0 {
                out = &out[m.end()..];
            }
        }
    }
    if let Some(re) = last {
        if let Some(m) = re.find(out) {
            if m.end() == out.len() {
                out = &out[..m.start()];
            }
        }
    }
    out
}

fn is_operator_word(word: &str, cfg: &Config) -> bool {
    word.eq_ignore_ascii_case(&cfg.and_word)
        || word.eq_ignore_ascii_case(&cfg.or_word)
        || word.eq_ignore_ascii_case(&cfg.not_word)
}

fn longest_common_prefix(a: &str, b: &str) -> String {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

struct WordUnit {
    text: String,
    has_wildcard: bool,
}

fn build_candidate(
    raw: &str,
    cfg: &Config,
    word_re: &Regex,
    uri_re: &Regex,
    ignore_first_re: Option<&Regex>,
    ignore_last_re: Option<&Regex>,
) -> SearchResult<Option<Term>> {
    let collapsed = collapse_whitespace(raw);
    let cased = if cfg.ignore_case {
        collapsed.to_lowercase()
    } else {
        collapsed
    };
    // Normalize to NFC before tokenizing: a decomposed accent (e.g. a
    // combining acute after a bare `e`) sits outside `\p{L}` and would
    // otherwise get scanned as a word boundary instead of part of the word.
    let cased: String = cased.nfc().collect();

    let mut is_phrase = cased.contains(' ');
    if !is_phrase && cfg.treat_uris_like_phrases && uri_re.is_match(&cased) {
        is_phrase = true;
    }

    let mut units: Vec<WordUnit> = Vec::new();
    for m in word_re.find_iter(&cased) {
        let tok = m.as_str();
        let has_wildcard = tok.ends_with(cfg.wildcard);
        let core = if has_wildcard {
            &tok[..tok.len() - cfg.wildcard.len_utf8()]
        } else {
            tok
        };
        let stripped = strip_ignore_chars(core, ignore_first_re, ignore_last_re);
        if stripped.is_empty() {
            continue;
        }
        if !is_phrase {
            if cfg.stopwords.contains(&stripped.to_lowercase()) || is_operator_word(stripped, cfg)
            {
                continue;
            }
        }
        units.push(WordUnit {
            text: stripped.to_string(),
            has_wildcard,
        });
    }

    if units.is_empty() {
        return Ok(None);
    }

    let mut final_words = Vec::with_capacity(units.len());
    let mut any_wildcard = false;
    for unit in units {
        if unit.has_wildcard {
            any_wildcard = true;
            final_words.push(format!("{}{}", unit.text, cfg.wildcard));
            continue;
        }
        if let Some(stemmer) = &cfg.stemmer {
            let word = unit.text.clone();
            let stem = catch_unwind(AssertUnwindSafe(|| stemmer(&word)))
                .map_err(|_| SearchError::StemmerFailure(format!("stemmer panicked on `{word}`")))?;
            if stem.is_empty() {
                return Err(SearchError::StemmerFailure(format!(
                    "stemmer returned empty string for `{word}`"
                )));
            }
            if stem != unit.text {
                let prefix = longest_common_prefix(&unit.text, &stem);
                any_wildcard = true;
                final_words.push(format!("{prefix}{}", cfg.wildcard));
                continue;
            }
        }
        final_words.push(unit.text);
    }

    let is_phrase = is_phrase || final_words.len() > 1;
    let joined = final_words.join(" ");
    let text: String = joined.nfc().collect();
    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(Term {
        text,
        is_phrase,
        has_wildcard: any_wildcard,
        order: 0,
    }))
}

/// A wildcarded term `foo*` subsumes any plain single-word term whose text
/// it would itself match (`foo`, but also `food`/`foobar`) — the wildcard
/// form is kept, the plain form dropped.
fn dedup_wildcards(terms: &mut Vec<Term>, wildcard: char) {
    let wildcard_cores: Vec<String> = terms
        .iter()
        .filter(|t| !t.is_phrase && t.has_wildcard && t.text.ends_with(wildcard))
        .map(|t| t.text[..t.text.len() - wildcard.len_utf8()].to_string())
        .collect();
    if wildcard_cores.is_empty() {
        return;
    }
    terms.retain(|t| {
        t.is_phrase || t.has_wildcard || !wildcard_cores.iter().any(|core| t.text.starts_with(core.as_str()))
    });
}
