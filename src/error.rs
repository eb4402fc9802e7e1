//! Error types shared across the assessment pipeline

use thiserror::Error;

/// Errors raised while collecting responses or scoring them.
///
/// None of these are transient: they point at a malformed answer sheet or a
/// broken questionnaire and are reported as-is, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// A configured dimension is missing some or all of its answers
    #[error("incomplete assessment: dimension '{dimension}' is missing answers{}", format_missing(.missing))]
    IncompleteAssessment {
        dimension: String,
        /// Prompts of the unanswered items (empty when no dimension exists at all)
        missing: Vec<String>,
    },

    /// Dimensions and weights do not line up, or the questionnaire is invalid
    #[error("configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// The answer sheet names a dimension the questionnaire does not define
    #[error("unknown dimension '{0}' in answer sheet")]
    UnknownDimension(String),

    /// More answers than the dimension has items
    #[error("dimension '{dimension}' expects {expected} answers, got {got}")]
    UnexpectedResponses {
        dimension: String,
        expected: usize,
        got: usize,
    },

    /// The same dimension appears under two keys (e.g. name and short name)
    #[error("dimension '{0}' is answered twice in the answer sheet")]
    DuplicateDimension(String),

    /// A rating outside the 1..=5 scale
    #[error("rating {0} is outside the 1-5 scale")]
    InvalidRating(u8),
}

fn format_missing(missing: &[String]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!(": {}", missing.join("; "))
    }
}

/// Failure of a narrative provider. Always recoverable: the caller falls
/// back to the template narrative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0} environment variable not set")]
    MissingCredential(String),

    #[error("narrative provider unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    #[error("rate limited - try again later")]
    RateLimited,

    #[error("API error: status={status}, body={body}")]
    Api { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure while rendering or writing a report document
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unsupported report format '{0}' (expected html, text or json)")]
    UnsupportedFormat(String),
}
