//! Concrete scenario coverage for query compilation, matching, and snippets.

use snippetquery::{Config, Query, SnippetOptions, TokenList};

fn term_texts(query: &Query) -> Vec<String> {
    query.terms().iter().map(|t| t.text.clone()).collect()
}

#[test]
fn scenario_a_stopword_removed_outside_phrase() {
    let cfg = Config::builder().with_stopwords(["the"]).build().unwrap();
    let query = Query::compile(&cfg, "the quick").unwrap();
    assert_eq!(term_texts(&query), vec!["quick"]);

    let source = "The quick brown fox";
    let list = TokenList::scan(source, &query, &cfg);
    assert!(list.iter_matches().count() > 0);
}

#[test]
fn scenario_b_field_prefix_both_terms_present() {
    let cfg = Config::default();
    let query = Query::compile(&cfg, "color:brown fox").unwrap();
    assert_eq!(term_texts(&query), vec!["brown", "fox"]);

    let source = "brown fox";
    let list = TokenList::scan(source, &query, &cfg);
    assert_eq!(list.iter_matches().count(), 2);
}

#[test]
fn scenario_c_plus_minus_signs() {
    let cfg = Config::default();
    let query = Query::compile(&cfg, "+jumped and +ran -quickly").unwrap();
    assert_eq!(term_texts(&query), vec!["jumped", "ran"]);

    let source = "she jumped and ran";
    let list = TokenList::scan(source, &query, &cfg);
    assert_eq!(list.iter_matches().count(), 2);
}

#[test]
fn scenario_d_phrase_retains_stopwords() {
    let cfg = Config::builder().with_stopwords(["the"]).build().unwrap();
    let query = Query::compile(&cfg, r#""over the lazy dog""#).unwrap();
    assert_eq!(term_texts(&query), vec!["over the lazy dog"]);
    assert!(query.terms()[0].is_phrase);

    let source = "over the lazy dog";
    let list = TokenList::scan(source, &query, &cfg);
    assert_eq!(list.iter_matches().count(), 4);
}

#[test]
fn scenario_e_wildcard_absorbs_plain_form() {
    let cfg = Config::default();
    let query = Query::compile(&cfg, "foo* food bar").unwrap();
    assert_eq!(term_texts(&query), vec!["foo*", "bar"]);

    let source = "food bar foot";
    let list = TokenList::scan(source, &query, &cfg);
    assert!(list.iter_matches().count() >= 2);
}

#[test]
fn scenario_f_sentence_aligned_multi_window_snippet() {
    let cfg = Config::default();
    let query = Query::compile(&cfg, r#""united states""#).unwrap();
    let opts = SnippetOptions {
        occur: 3,
        context: 10,
        as_sentences: true,
        ..Default::default()
    };
    let essay = "The founding of the united states was a long process. \
It took many decades. Citizens of the united states celebrate each July. \
Historians still study the united states constitution today.";
    let snippet = snippetquery::extract_snippet(essay, &query, &cfg, &opts);
    assert!(snippet.to_lowercase().contains("united states"));
}

#[test]
fn scenario_g_proximity_phrase_matches_nearby_words() {
    let cfg = Config::default();
    let query = Query::compile(&cfg, r#""live united"~5"#).unwrap();
    assert_eq!(query.terms()[0].text, "live united");
    let opts = SnippetOptions {
        occur: 1,
        context: 5,
        ..Default::default()
    };
    let source = "we live as one united people";
    let snippet = snippetquery::extract_snippet(source, &query, &cfg, &opts);
    // Proximity is parsed but not consulted by matching (see DESIGN.md's
    // Open Question 3 decision), so the phrase only matches contiguous
    // occurrences and does not match "live ... united" here. With no match
    // and the default `show: true`, extraction falls back to a budget
    // -bounded prefix of the source rather than an empty string.
    assert_eq!(snippet, source);
}

#[test]
fn invalid_query_reports_byte_offset() {
    let cfg = Config::default();
    let err = Query::compile(&cfg, r#""unterminated"#).unwrap_err();
    assert_eq!(err.error_type(), "INVALID_QUERY");
}

#[test]
fn parenthesized_subquery_round_trips() {
    let cfg = Config::default();
    let query = Query::compile(&cfg, "+(foo OR bar) baz").unwrap();
    assert_eq!(query.tree().plus.len(), 1);
    assert_eq!(query.tree().neutral.len(), 1);
}
