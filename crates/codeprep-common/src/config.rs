//! Layered configuration: defaults, optional TOML file, environment

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Language;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "codeprep.toml";

/// Prefix for environment overrides, e.g. `CODEPREP_SHARD_SIZE=500`
pub const DEFAULT_ENV_PREFIX: &str = "CODEPREP";

/// Batch normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeprepConfig {
    /// Corpus language; the CLI flag wins when both are set
    pub language: Option<Language>,
    /// Records per shard handed to one worker
    pub shard_size: usize,
    /// Worker threads; 0 uses every available core
    pub threads: usize,
    /// Rewrite query string literals into regex-shape tokens instead of `CODSTR`
    pub detailed_strings: bool,
    /// Optional WordNet `dict/` directory replacing the built-in lexicon
    pub wordnet_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CodeprepConfig {
    fn default() -> Self {
        Self {
            language: None,
            shard_size: 1000,
            threads: 0,
            detailed_strings: true,
            wordnet_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl CodeprepConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shard_size == 0 {
            return Err(ConfigError::Validation(
                "shard_size must be greater than 0".to_string(),
            ));
        }
        if let Some(dir) = &self.wordnet_dir {
            if !dir.is_dir() {
                return Err(ConfigError::Validation(format!(
                    "wordnet_dir is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Loads [`CodeprepConfig`] from its sources in precedence order
pub struct ConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Use an explicit config file instead of `codeprep.toml`
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
            ..Self::new()
        }
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(&self) -> ConfigResult<CodeprepConfig> {
        debug!(path = %self.config_path.display(), prefix = %self.env_prefix, "loading configuration");

        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true));

        let config = builder.build()?;
        let loaded: CodeprepConfig = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
