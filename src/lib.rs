//! Boolean query compiler and HTML-aware match/snippet engine.
//!
//! Parses a compact Boolean query syntax into a normalized list of [`Term`]s,
//! synthesizes a plain and an HTML-tolerant [`regex::Regex`] per term, and
//! extracts bounded, sentence-aligned snippets around matches in source
//! text. Sits between a search index (which decides *which* documents
//! matched) and a presentation layer (which highlights matches and shows
//! excerpts).
//!
//! Deliberately out of scope: full HTML parsing, document indexing or
//! scoring, ranking, persistent storage, network transport.
#![forbid(unsafe_code)]

pub mod boundary;
pub mod config;
pub mod entities;
pub mod error;
pub mod parser;
pub mod query;
pub mod regex_synth;
pub mod snippet;
pub mod term;
pub mod token;

pub use boundary::Boundaries;
pub use config::{Config, ConfigBuilder, StemmerFn};
pub use error::{SearchError, SearchResult};
pub use parser::{Leaf, LeafValue, Operator, QueryTree, Sign};
pub use query::Query;
pub use regex_synth::RegexPair;
pub use snippet::{SnippetOptions, extract as extract_snippet};
pub use term::Term;
pub use token::{Token, TokenList};

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn end_to_end_compile_scan_snippet() {
        let cfg = Config::default();
        let query = Query::compile(&cfg, "brown fox").unwrap();
        let source = "The quick brown fox jumps over the lazy dog.";
        let list = TokenList::scan(source, &query, &cfg);
        assert!(list.iter_matches().count() >= 2);

        let snippet = extract_snippet(source, &query, &cfg, &SnippetOptions::default());
        assert!(snippet.contains("brown"));
    }

    #[test]
    fn html_aware_match_tolerates_markup() {
        let cfg = Config::default();
        let query = Query::compile(&cfg, r#""united states""#).unwrap();
        let term = &query.terms()[0];
        let pair = query.regex_for(term).unwrap();
        assert!(pair.html.is_match("united <b>states</b>"));
        assert!(!pair.plain.is_match("united <b>states</b>"));
    }
}
