//! Error types for the query/snippet subsystem

use thiserror::Error;

/// Result type alias for this crate's fallible operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while compiling a query or building configuration.
///
/// Match and snippet operations on an already-compiled [`crate::query::Query`]
/// are infallible by design (see module docs on [`crate::snippet`]); these
/// variants only ever surface from construction.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The Boolean query parser could not consume the input.
    #[error("invalid query at byte {offset}: {message}")]
    InvalidQuery {
        /// Byte offset into the raw query string where parsing failed.
        offset: usize,
        /// Human-readable description of the failure.
        message: String,
    },

    /// A configuration option was invalid (e.g. a multi-character wildcard).
    #[error("invalid config field `{field}`: {message}")]
    InvalidConfig {
        /// Name of the offending configuration field.
        field: &'static str,
        /// Human-readable description of the failure.
        message: String,
    },

    /// Transcoding from the declared charset to UTF-8 failed irrecoverably.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// A token index was outside the bounds of a `TokenList`.
    #[error("token position {pos} out of range (len={len})")]
    OutOfRange {
        /// The requested position.
        pos: usize,
        /// Number of tokens in the list.
        len: usize,
    },

    /// The user-supplied stemmer returned an empty string or panicked.
    #[error("stemmer failure: {0}")]
    StemmerFailure(String),
}

impl SearchError {
    /// Returns a machine-readable classifier for this error (for JSON responses
    /// or metrics tagging).
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidQuery { .. } => "INVALID_QUERY",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::EncodingError(_) => "ENCODING_ERROR",
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::StemmerFailure(_) => "STEMMER_FAILURE",
        }
    }

    /// Returns whether the error is transient and can be retried.
    ///
    /// Every variant here stems from caller input or caller configuration,
    /// not environment/resource conditions, so none are retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}
