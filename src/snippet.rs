//! Snippet extractor (§4.6): selects a bounded number of windows around
//! query matches, preferring sentence boundaries, and joins them with an
//! ellipsis marker. Degrades to the empty string rather than failing.

use tracing::{debug_span, warn};

use crate::config::Config;
use crate::query::Query;
use crate::token::TokenList;

const ELLIPSIS: &str = "...";

/// Budget and shaping options for one snippet-extraction call.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SnippetOptions {
    /// Maximum number of windows to return.
    pub occur: usize,
    /// Tokens of context on each side of a match.
    pub context: usize,
    /// Extend windows outward to the nearest sentence boundary.
    pub as_sentences: bool,
    /// Skip the `max_chars` truncation step entirely.
    pub ignore_length: bool,
    /// Maximum total characters across the joined snippet.
    pub max_chars: usize,
    /// Return the empty string (rather than a blind prefix) when nothing matched.
    pub show: bool,
    /// Count every matching token inside a phrase as its own position,
    /// instead of one position per whole-phrase occurrence.
    pub treat_phrases_as_singles: bool,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            occur: 3,
            context: 8,
            as_sentences: false,
            ignore_length: false,
            max_chars: 480,
            show: true,
            treat_phrases_as_singles: false,
        }
    }
}

/// Extract a snippet string from `source` around matches of `query`.
#[must_use]
pub fn extract(source: &str, query: &Query, cfg: &Config, opts: &SnippetOptions) -> String {
    let span = debug_span!(
        "snippet_extract",
        term_count = query.terms().len(),
        occur = opts.occur,
        context = opts.context
    );
    let _enter = span.enter();

    if query.terms().is_empty() {
        return String::new();
    }

    let tokens = TokenList::scan(source, query, cfg);
    if tokens.is_empty() {
        return String::new();
    }

    let positions = collect_positions(&tokens, opts);
    if positions.is_empty() {
        if !opts.show {
            return String::new();
        }
        // No match: fall back to a plain prefix of the source, still
        // respecting the character budget.
        let mut end = opts.max_chars.min(source.len());
        while end < source.len() && !source.is_char_boundary(end) {
            end += 1;
        }
        return source[..end].to_string();
    }

    let picked = spread_positions(&positions, opts.occur, opts.context);

    let mut windows: Vec<(usize, usize)> = Vec::new();
    for pos in picked {
        let Ok(window) = tokens.get_window(pos, opts.context) else {
            warn!(pos, "get_window requested an out-of-range position");
            continue;
        };
        if window.is_empty() {
            continue;
        }
        let (mut start, mut end) = (
            window.first().unwrap().start_offset,
            window.last().unwrap().end_offset,
        );
        if opts.as_sentences {
            extend_to_sentence_boundary(source, &mut start, &mut end, opts.context);
        }
        windows.push((start, end));
    }

    if windows.is_empty() {
        return String::new();
    }

    let mut pieces: Vec<String> = windows
        .into_iter()
        .map(|(start, end)| source[start..end].to_string())
        .collect();

    if !opts.ignore_length {
        truncate_to_budget(&mut pieces, opts.max_chars);
    }

    pieces.join(&format!(" {ELLIPSIS} "))
}

fn collect_positions(tokens: &TokenList, opts: &SnippetOptions) -> Vec<usize> {
    if opts.treat_phrases_as_singles {
        return tokens.iter_matches().collect();
    }
    // One position per distinct match occurrence: a whole phrase occurrence
    // collapses to its first word, but two adjacent single-word matches
    // (e.g. `red car` matching separate terms `red` and `car`) stay distinct
    // rather than merging just because their tokens are contiguous.
    (0..tokens.len())
        .filter(|&i| tokens.get(i).is_some_and(|t| t.match_start))
        .collect()
}

fn spread_positions(positions: &[usize], occur: usize, context: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    let mut last_picked: Option<usize> = None;
    for &pos in positions {
        if picked.len() >= occur {
            break;
        }
        if let Some(last) = last_picked {
            if pos < last + context {
                continue;
            }
        }
        picked.push(pos);
        last_picked = Some(pos);
    }
    picked
}

/// Extend `[start, end)` outward, looking for a sentence-terminating
/// character followed by whitespace, without crossing more than
/// `max_extra_chars` extra bytes in either direction.
fn extend_to_sentence_boundary(source: &str, start: &mut usize, end: &mut usize, max_extra_chars: usize) {
    let limit = max_extra_chars.saturating_mul(8).max(1);

    let lower_bound = start.saturating_sub(limit);
    let before = &source[lower_bound..*start];
    if let Some(rel_end) = before
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | '!' | '?'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
    {
        *start = lower_bound + rel_end;
    } else {
        *start = lower_bound;
    }

    let upper_bound = (*end + limit).min(source.len());
    let after = &source[*end..upper_bound];
    if let Some((i, c)) = after
        .char_indices()
        .find(|(_, c)| matches!(c, '.' | '!' | '?'))
    {
        *end += i + c.len_utf8();
    } else {
        *end = upper_bound;
    }

    while !source.is_char_boundary(*start) {
        *start -= 1;
    }
    while *end < source.len() && !source.is_char_boundary(*end) {
        *end += 1;
    }
}

fn truncate_to_budget(pieces: &mut [String], max_chars: usize) {
    let total: usize = pieces.iter().map(String::len).sum();
    if total <= max_chars || pieces.is_empty() {
        return;
    }
    let per_piece = (max_chars / pieces.len()).max(1);
    for piece in pieces.iter_mut() {
        if piece.len() <= per_piece {
            continue;
        }
        let mut cut = per_piece;
        while cut > 0 && !piece.is_char_boundary(cut) {
            cut -= 1;
        }
        if let Some(space) = piece[..cut].rfind(char::is_whitespace) {
            cut = space;
        }
        piece.truncate(cut);
        piece.push_str(&format!(" {ELLIPSIS}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::query::Query;

    #[test]
    fn empty_query_yields_empty_snippet() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "").unwrap();
        let snippet = extract("anything here", &q, &cfg, &SnippetOptions::default());
        assert_eq!(snippet, "");
    }

    #[test]
    fn no_match_with_show_false_yields_empty_snippet() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "zebra").unwrap();
        let opts = SnippetOptions {
            show: false,
            ..Default::default()
        };
        let snippet = extract("the quick brown fox", &q, &cfg, &opts);
        assert_eq!(snippet, "");
    }

    #[test]
    fn no_match_with_show_true_yields_prefix() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "zebra").unwrap();
        let opts = SnippetOptions {
            show: true,
            max_chars: 9,
            ..Default::default()
        };
        let snippet = extract("the quick brown fox", &q, &cfg, &opts);
        assert_eq!(snippet, "the quick");
    }

    #[test]
    fn single_match_produces_window() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "fox").unwrap();
        let opts = SnippetOptions {
            occur: 1,
            context: 2,
            ..Default::default()
        };
        let snippet = extract("the quick brown fox jumps over", &q, &cfg, &opts);
        assert!(snippet.contains("fox"));
    }

    #[test]
    fn phrase_window_covers_whole_phrase() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, r#""brown fox""#).unwrap();
        let opts = SnippetOptions {
            occur: 1,
            context: 1,
            ..Default::default()
        };
        let snippet = extract("the quick brown fox jumps", &q, &cfg, &opts);
        assert!(snippet.contains("brown"));
        assert!(snippet.contains("fox"));
    }

    #[test]
    fn respects_occur_budget() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "the").unwrap();
        let opts = SnippetOptions {
            occur: 1,
            context: 0,
            ..Default::default()
        };
        let snippet = extract("the cat the dog the bird", &q, &cfg, &opts);
        assert_eq!(snippet.matches(ELLIPSIS).count(), 0);
    }

    #[test]
    fn adjacent_distinct_term_matches_produce_separate_windows() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "red car").unwrap();
        let opts = SnippetOptions {
            occur: 2,
            context: 0,
            ..Default::default()
        };
        let snippet = extract("a red car drove by", &q, &cfg, &opts);
        assert_eq!(snippet.matches(ELLIPSIS).count(), 1);
        assert!(snippet.contains("red"));
        assert!(snippet.contains("car"));
    }

    #[test]
    fn truncates_to_max_chars() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "word").unwrap();
        let opts = SnippetOptions {
            occur: 1,
            context: 50,
            max_chars: 20,
            ..Default::default()
        };
        let long_text = "lorem ipsum dolor sit amet word consectetur adipiscing elit sed do";
        let snippet = extract(long_text, &q, &cfg, &opts);
        assert!(snippet.len() <= 40);
    }

    #[test]
    fn empty_source_yields_empty_snippet() {
        let cfg = Config::default();
        let q = Query::compile(&cfg, "fox").unwrap();
        let snippet = extract("", &q, &cfg, &SnippetOptions::default());
        assert_eq!(snippet, "");
    }
}
