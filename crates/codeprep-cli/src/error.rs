use codeprep_common::ConfigError;
use codeprep_text::LexiconError;
use thiserror::Error;

/// Batch driver errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_convert() {
        let err: CliError = ConfigError::Validation("shard_size must be positive".into()).into();
        assert!(matches!(err, CliError::Config(ConfigError::Validation(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Validation error: shard_size must be positive"
        );
    }

    #[test]
    fn test_io_errors_convert() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::NotFound, "corpus.jsonl").into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
