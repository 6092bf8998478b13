//! Token list (§4.5): a scanned, materialized sequence of word tokens over a
//! source buffer, flagged against a compiled [`crate::query::Query`].

use regex::Regex;

use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::query::Query;

/// A single maximal run of word characters in a source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's text, borrowed... copied, since tokens outlive the scan pass.
    pub text: String,
    /// Byte offset of the first byte of the token in the source buffer.
    pub start_offset: usize,
    /// Byte offset one past the last byte of the token in the source buffer.
    pub end_offset: usize,
    /// Whether this token participates in a query match.
    pub is_match: bool,
    /// Whether this token is the first token of a distinct match occurrence
    /// — every single-word match starts its own occurrence, but only the
    /// first word of a phrase match does. Two adjacent single-word matches
    /// (`red car` against two single-word terms) are therefore two
    /// occurrences, while `red car` matched as one phrase term is one.
    pub match_start: bool,
    /// Index of this token within its `TokenList`.
    pub pos: usize,
}

/// An ordered, indexable sequence of [`Token`]s scanned from one source buffer.
#[derive(Debug, Clone)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Scan `source` into tokens and flag matches against `query`.
    #[must_use]
    pub fn scan(source: &str, query: &Query, cfg: &Config) -> Self {
        let word_re = match Regex::new(&format!("[{}]+", cfg.word_characters)) {
            Ok(re) => re,
            Err(_) => return Self { tokens: Vec::new() },
        };

        let mut tokens: Vec<Token> = word_re
            .find_iter(source)
            .enumerate()
            .map(|(pos, m)| Token {
                text: m.as_str().to_string(),
                start_offset: m.start(),
                end_offset: m.end(),
                is_match: false,
                match_start: false,
                pos,
            })
            .collect();

        flag_single_word_matches(&mut tokens, query, cfg);
        flag_phrase_matches(&mut tokens, query, cfg);

        Self { tokens }
    }

    /// Number of tokens in this list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether this list has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Borrow the token at `i`, if in range.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// Iterate the positions of every token flagged `is_match`.
    pub fn iter_matches(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .filter(|t| t.is_match)
            .map(|t| t.pos)
    }

    /// Return the window of tokens around `pos`, snapped outward to the
    /// nearest match tokens on both ends, clamped to `[0, len-1]`.
    ///
    /// # Errors
    /// Returns [`SearchError::OutOfRange`] if `pos` is not a valid index.
    pub fn get_window(&self, pos: usize, size: usize) -> SearchResult<&[Token]> {
        if pos >= self.tokens.len() {
            return Err(SearchError::OutOfRange {
                pos,
                len: self.tokens.len(),
            });
        }

        let mut start = pos.saturating_sub(size);
        while start < pos && !self.tokens[start].is_match {
            start += 1;
        }

        let mut end = (pos + size).min(self.tokens.len() - 1);
        while end > pos && !self.tokens[end].is_match {
            end -= 1;
        }

        Ok(&self.tokens[start..=end])
    }
}

fn flag_single_word_matches(tokens: &mut [Token], query: &Query, cfg: &Config) {
    for term in query.terms() {
        if term.is_phrase {
            continue;
        }
        let Some(pair) = query.regex_for(term) else {
            continue;
        };
        for token in tokens.iter_mut() {
            if token.is_match {
                continue;
            }
            let folded = if cfg.ignore_case {
                token.text.to_lowercase()
            } else {
                token.text.clone()
            };
            if pair.plain.is_match(&folded) {
                token.is_match = true;
                token.match_start = true;
            }
        }
    }
}

fn flag_phrase_matches(tokens: &mut [Token], query: &Query, cfg: &Config) {
    for term in query.terms() {
        if !term.is_phrase {
            continue;
        }
        let words: Vec<&str> = term.text.split(' ').collect();
        if words.is_empty() {
            continue;
        }
        let len = tokens.len();
        if len < words.len() {
            continue;
        }
        for start in 0..=(len - words.len()) {
            let matches = words.iter().enumerate().all(|(offset, word)| {
                let candidate = &tokens[start + offset].text;
                if cfg.ignore_case {
                    candidate.eq_ignore_ascii_case(word)
                } else {
                    candidate == word
                }
            });
            if matches {
                for offset in 0..words.len() {
                    tokens[start + offset].is_match = true;
                }
                tokens[start].match_start = true;
            }
        }
    }
}
