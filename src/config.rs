//! Immutable configuration for query compilation and matching.
//!
//! Built once via [`ConfigBuilder`], validated at `build()` time, and shared
//! read-only afterward — see `SearchQuery`'s chained-builder shape in the
//! teacher crate this is grounded on.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{SearchError, SearchResult};

/// A user-supplied stemming function: `word -> stem`.
///
/// Must be deterministic and must not return an empty string for a non-empty
/// input; a violation surfaces as [`SearchError::StemmerFailure`] at the call
/// site in the term extractor, not here.
pub type StemmerFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Immutable, validated configuration shared by the parser, term extractor,
/// regex synthesizer, and snippet extractor.
#[derive(Clone)]
pub struct Config {
    /// Locale tag (e.g. `"en_US"`); informs defaults only, never mutates
    /// process-global locale state.
    pub locale: String,
    /// Declared source encoding, informational only: every entry point in
    /// this crate accepts `&str`, which Rust already guarantees is valid
    /// UTF-8, so no transcoding happens here. Kept for callers who track the
    /// original document encoding alongside a `Config` (e.g. to decide
    /// whether to run their own transcoding before calling in).
    pub charset: String,
    /// Lowercased stopwords ignored outside phrases.
    pub stopwords: HashSet<String>,
    /// Single character acting as a zero-or-more word-character wildcard.
    pub wildcard: char,
    /// Regex character-class body (the inside of `[...]`) defining word characters.
    pub word_characters: String,
    /// Regex character-class body stripped from the start of every token.
    pub ignore_first_char: String,
    /// Regex character-class body stripped from the end of every token.
    pub ignore_last_char: String,
    /// Word recognized as the Boolean AND operator (case-insensitive).
    pub and_word: String,
    /// Word recognized as the Boolean OR operator (case-insensitive).
    pub or_word: String,
    /// Word recognized as the Boolean NOT operator (case-insensitive).
    pub not_word: String,
    /// Quote character delimiting a phrase.
    pub phrase_delim: char,
    /// Lowercase queries and match case-insensitively.
    pub ignore_case: bool,
    /// Field names whose values are discarded entirely during extraction.
    pub ignore_fields: HashSet<String>,
    /// If a bare term contains `@`/`.` between word characters, treat it as a phrase.
    pub treat_uris_like_phrases: bool,
    /// Optional stemming function.
    pub stemmer: Option<StemmerFn>,
    /// Regex pattern matching exactly one HTML tag.
    pub tag_re: String,
    /// Regex pattern matching one whitespace unit, including HTML-entity forms.
    pub whitespace: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("locale", &self.locale)
            .field("charset", &self.charset)
            .field("stopwords", &self.stopwords)
            .field("wildcard", &self.wildcard)
            .field("word_characters", &self.word_characters)
            .field("ignore_first_char", &self.ignore_first_char)
            .field("ignore_last_char", &self.ignore_last_char)
            .field("and_word", &self.and_word)
            .field("or_word", &self.or_word)
            .field("not_word", &self.not_word)
            .field("phrase_delim", &self.phrase_delim)
            .field("ignore_case", &self.ignore_case)
            .field("ignore_fields", &self.ignore_fields)
            .field("treat_uris_like_phrases", &self.treat_uris_like_phrases)
            .field("has_stemmer", &self.stemmer.is_some())
            .field("tag_re", &self.tag_re)
            .field("whitespace", &self.whitespace)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new()
            .build()
            .expect("default configuration must validate")
    }
}

impl Config {
    /// Start building a configuration from defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Regex bracket-class body with `<`, `>`, `&` removed, used wherever a
    /// word-character match must not accidentally straddle raw markup.
    #[must_use]
    pub fn html_safe_word_characters(&self) -> String {
        self.word_characters
            .chars()
            .filter(|c| !matches!(c, '<' | '>' | '&'))
            .collect()
    }

    /// The full `[...]` word-character class.
    #[must_use]
    pub fn word_class(&self) -> String {
        format!("[{}]", self.word_characters)
    }

    /// The full `[...]` html-safe word-character class.
    #[must_use]
    pub fn html_safe_word_class(&self) -> String {
        format!("[{}]", self.html_safe_word_characters())
    }
}

/// Builder for [`Config`]; chained `with_*` setters mirror the teacher
/// crate's `SearchQuery::with_mode`/`with_limit` style.
pub struct ConfigBuilder {
    locale: String,
    charset: String,
    stopwords: HashSet<String>,
    wildcard: char,
    word_characters: String,
    ignore_first_char: String,
    ignore_last_char: String,
    and_word: String,
    or_word: String,
    not_word: String,
    phrase_delim: char,
    ignore_case: bool,
    ignore_fields: HashSet<String>,
    treat_uris_like_phrases: bool,
    stemmer: Option<StemmerFn>,
    tag_re: String,
    whitespace: String,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// A builder pre-loaded with the library defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locale: "en_US".to_string(),
            charset: "UTF-8".to_string(),
            stopwords: HashSet::new(),
            wildcard: '*',
            word_characters: r"\p{L}\p{N}_".to_string(),
            ignore_first_char: String::new(),
            ignore_last_char: String::new(),
            and_word: "AND".to_string(),
            or_word: "OR".to_string(),
            not_word: "NOT".to_string(),
            phrase_delim: '"',
            ignore_case: true,
            ignore_fields: HashSet::new(),
            treat_uris_like_phrases: false,
            stemmer: None,
            tag_re: r"<[^<>]*>".to_string(),
            whitespace: r"(?:\s|&nbsp;|&\#160;|&\#x[aA]0;)".to_string(),
        }
    }

    /// Set the locale tag.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the declared source charset.
    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Replace the stopword set (values are lowercased).
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = stopwords.into_iter().map(|s| s.into().to_lowercase()).collect();
        self
    }

    /// Set the wildcard character.
    #[must_use]
    pub const fn with_wildcard(mut self, wildcard: char) -> Self {
        self.wildcard = wildcard;
        self
    }

    /// Set the word-character regex class body.
    #[must_use]
    pub fn with_word_characters(mut self, class_body: impl Into<String>) -> Self {
        self.word_characters = class_body.into();
        self
    }

    /// Set the leading-ignorable-character regex class body.
    #[must_use]
    pub fn with_ignore_first_char(mut self, class_body: impl Into<String>) -> Self {
        self.ignore_first_char = class_body.into();
        self
    }

    /// Set the trailing-ignorable-character regex class body.
    #[must_use]
    pub fn with_ignore_last_char(mut self, class_body: impl Into<String>) -> Self {
        self.ignore_last_char = class_body.into();
        self
    }

    /// Set the AND/OR/NOT operator words.
    #[must_use]
    pub fn with_operator_words(
        mut self,
        and_word: impl Into<String>,
        or_word: impl Into<String>,
        not_word: impl Into<String>,
    ) -> Self {
        self.and_word = and_word.into();
        self.or_word = or_word.into();
        self.not_word = not_word.into();
        self
    }

    /// Set the phrase delimiter character.
    #[must_use]
    pub const fn with_phrase_delim(mut self, delim: char) -> Self {
        self.phrase_delim = delim;
        self
    }

    /// Set whether matching is case-insensitive.
    #[must_use]
    pub const fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Replace the set of fields whose values are discarded.
    #[must_use]
    pub fn with_ignore_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_fields = fields.into_iter().map(|s| s.into().to_lowercase()).collect();
        self
    }

    /// Set whether bare URI-like terms are upgraded to phrases.
    #[must_use]
    pub const fn with_treat_uris_like_phrases(mut self, enabled: bool) -> Self {
        self.treat_uris_like_phrases = enabled;
        self
    }

    /// Install a stemming function.
    #[must_use]
    pub fn with_stemmer(mut self, stemmer: StemmerFn) -> Self {
        self.stemmer = Some(stemmer);
        self
    }

    /// Set the tag-matching regex pattern.
    #[must_use]
    pub fn with_tag_re(mut self, pattern: impl Into<String>) -> Self {
        self.tag_re = pattern.into();
        self
    }

    /// Set the whitespace-unit regex pattern.
    #[must_use]
    pub fn with_whitespace(mut self, pattern: impl Into<String>) -> Self {
        self.whitespace = pattern.into();
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidConfig`] if `phrase_delim` equals the
    /// wildcard character, or if `tag_re`/`whitespace`/`word_characters` do
    /// not compile as regex fragments.
    pub fn build(self) -> SearchResult<Config> {
        if self.wildcard == self.phrase_delim {
            return Err(SearchError::InvalidConfig {
                field: "wildcard",
                message: "wildcard must differ from phrase_delim".to_string(),
            });
        }
        if self.and_word.is_empty() || self.or_word.is_empty() || self.not_word.is_empty() {
            return Err(SearchError::InvalidConfig {
                field: "and_word/or_word/not_word",
                message: "operator words must be non-empty".to_string(),
            });
        }
        // Validate that the configured fragments compile as regex pieces;
        // failures here are configuration errors, not per-query errors.
        for (field, pattern) in [
            ("tag_re", self.tag_re.as_str()),
            ("whitespace", self.whitespace.as_str()),
        ] {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(SearchError::InvalidConfig {
                    field,
                    message: e.to_string(),
                });
            }
        }
        if let Err(e) = regex::Regex::new(&format!("[{}]", self.word_characters)) {
            return Err(SearchError::InvalidConfig {
                field: "word_characters",
                message: e.to_string(),
            });
        }

        Ok(Config {
            locale: self.locale,
            charset: self.charset,
            stopwords: self.stopwords,
            wildcard: self.wildcard,
            word_characters: self.word_characters,
            ignore_first_char: self.ignore_first_char,
            ignore_last_char: self.ignore_last_char,
            and_word: self.and_word,
            or_word: self.or_word,
            not_word: self.not_word,
            phrase_delim: self.phrase_delim,
            ignore_case: self.ignore_case,
            ignore_fields: self.ignore_fields,
            treat_uris_like_phrases: self.treat_uris_like_phrases,
            stemmer: self.stemmer,
            tag_re: self.tag_re,
            whitespace: self.whitespace,
        })
    }
}
