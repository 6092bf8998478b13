//! Property-based tests for the round-trip invariants in SPEC_FULL.md §8.

use proptest::prelude::*;
use snippetquery::{Config, Query};

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{2,8}".prop_filter("must not collide with a Boolean operator keyword", |w| {
        !["and", "or", "not"].contains(&w.as_str())
    })
}

proptest! {
    #[test]
    fn self_match_plain(word in arb_word()) {
        let cfg = Config::default();
        let query = Query::compile(&cfg, &word).unwrap();
        prop_assert_eq!(query.terms().len(), 1);
        let term = &query.terms()[0];
        let pair = query.regex_for(term).unwrap();
        prop_assert!(pair.plain.is_match(&word));
    }

    #[test]
    fn self_match_html(word in arb_word()) {
        let cfg = Config::default();
        let query = Query::compile(&cfg, &word).unwrap();
        let term = &query.terms()[0];
        let pair = query.regex_for(term).unwrap();
        prop_assert!(pair.html.is_match(&word));
    }

    #[test]
    fn idempotent_reparse(a in arb_word(), b in arb_word()) {
        let cfg = Config::default();
        let raw = format!("{a} {b}");
        let q1 = Query::compile(&cfg, &raw).unwrap();
        let q2 = Query::compile(&cfg, q1.original_string()).unwrap();
        prop_assert_eq!(q1.terms().to_vec(), q2.terms().to_vec());
    }

    #[test]
    fn wildcard_dominance(a in arb_word()) {
        let cfg = Config::default();
        let raw = format!("{a}* {a}");
        let query = Query::compile(&cfg, &raw).unwrap();
        let texts: Vec<&str> = query.terms().iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(texts.len(), 1);
        prop_assert!(texts[0].ends_with('*'));
    }
}
