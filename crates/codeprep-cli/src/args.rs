//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use codeprep_common::{CodeprepConfig, Language};

/// Normalize a code-search corpus into token sequences
#[derive(Parser, Debug, Clone)]
#[command(name = "codeprep", version)]
#[command(about = "Normalize code-search corpus records into token sequences")]
pub struct Cli {
    /// Corpus language (python, sql)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// JSON Lines input file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to ./codeprep.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WordNet dict/ directory replacing the built-in lexicon
    #[arg(long)]
    pub wordnet_dir: Option<PathBuf>,

    /// Records per shard
    #[arg(long)]
    pub shard_size: Option<usize>,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Replace SQL string literals with CODSTR instead of their regex shape
    #[arg(long)]
    pub plain_strings: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay the flags that were given onto a loaded configuration
    pub fn apply(&self, config: &mut CodeprepConfig) {
        if let Some(language) = self.language {
            config.language = Some(language);
        }
        if let Some(dir) = &self.wordnet_dir {
            config.wordnet_dir = Some(dir.clone());
        }
        if let Some(shard_size) = self.shard_size {
            config.shard_size = shard_size;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.plain_strings {
            config.detailed_strings = false;
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
    }
}
