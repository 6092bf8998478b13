//! The compiled [`Query`] object (§3, §4.7): ordered terms, their regex pairs,
//! the original input, and the parse tree, all immutable after construction.

use std::collections::HashMap;

use tracing::debug_span;

use crate::boundary::Boundaries;
use crate::config::Config;
use crate::error::SearchResult;
use crate::parser::{self, QueryTree};
use crate::regex_synth::{self, RegexPair};
use crate::term::{self, Term};

/// A compiled Boolean query: normalized terms, their regex pairs, the
/// original query string, and the parse tree used to produce them.
///
/// Immutable once built; safe to share across threads for read access.
#[derive(Debug, Clone)]
pub struct Query {
    terms: Vec<Term>,
    regexes: HashMap<String, RegexPair>,
    original: String,
    tree: QueryTree,
}

impl Query {
    /// Parse, extract terms from, and synthesize regexes for `raw`.
    ///
    /// # Errors
    /// Propagates [`crate::error::SearchError::InvalidQuery`] from the
    /// parser, and [`crate::error::SearchError::InvalidConfig`] /
    /// [`crate::error::SearchError::StemmerFailure`] from term extraction and
    /// regex synthesis.
    pub fn compile(cfg: &Config, raw: &str) -> SearchResult<Self> {
        let span = debug_span!("query_compile", query_len = raw.len());
        let _enter = span.enter();

        let tree = parser::parse(raw, cfg)?;
        let terms = term::extract_terms(&tree, cfg)?;
        let bounds = Boundaries::from_config(cfg);

        let mut regexes = HashMap::with_capacity(terms.len());
        for t in &terms {
            let pair = regex_synth::synthesize(t, cfg, &bounds)?;
            regexes.insert(t.text.clone(), pair);
        }

        tracing::debug!(term_count = terms.len(), "query compiled");

        Ok(Self {
            terms,
            regexes,
            original: raw.to_string(),
            tree,
        })
    }

    /// The normalized terms, in first-occurrence order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The plain/HTML regex pair synthesized for `term`.
    #[must_use]
    pub fn regex_for(&self, term: &Term) -> Option<&RegexPair> {
        self.regexes.get(&term.text)
    }

    /// The original, unparsed query string.
    #[must_use]
    pub fn original_string(&self) -> &str {
        &self.original
    }

    /// The parsed Boolean tree this query was compiled from.
    #[must_use]
    pub fn tree(&self) -> &QueryTree {
        &self.tree
    }
}

const fn _assert_send_sync<T: Send + Sync>() {}
const _: () = _assert_send_sync::<Query>();
