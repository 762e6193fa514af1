//! Failure values and error types

use thiserror::Error;

/// Fixed output for a Python fragment that cannot be tokenized at all
pub const CODE_FAILURE_SENTINEL: &str = "-1000";

/// Context field value meaning "no context available"; passed through untouched
pub const MISSING_CONTEXT_MARKER: &str = "-10000";

/// Fragment-level normalization failures
///
/// The `Display` text of each variant is exactly the value emitted in place
/// of a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The code lexer could not produce a single token from the fragment
    #[error("-1000")]
    UnrecoverableCode,

    /// The query anonymizer rejected the fragment
    #[error("{0}")]
    Query(String),
}

impl NormalizeError {
    /// Short label used when aggregating failures
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::UnrecoverableCode => "unrecoverable_code",
            NormalizeError::Query(_) => "query",
        }
    }
}

/// Result type for normalization operations
pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Configuration result type
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
