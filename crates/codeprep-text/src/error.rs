//! Lexical resource errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a lexicon
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed entry at {path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("WordNet directory has no index files: {0}")]
    EmptyDictionary(PathBuf),
}

/// Result type for lexicon operations
pub type LexiconResult<T> = std::result::Result<T, LexiconError>;
