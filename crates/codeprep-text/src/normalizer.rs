//! Sentence normalization into lemmatized tokens

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use codeprep_common::cleanup::{filter_all, filter_part, respace, underscore};
use codeprep_common::{NormalizedTokens, TextRole};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::contractions;
use crate::error::LexiconResult;
use crate::lexicon::{Lexicon, WordPos};
use crate::tagger::{PosTagger, RuleTagger};

const INTEGER_TAG: &str = "TAGINT";
const STRING_TAG: &str = "TAGSTR";

lazy_static! {
    static ref WHITESPACE_CONTROL: Regex = Regex::new(r"[\t\n]+").unwrap();
    static ref SPACE_RUN: Regex = Regex::new(r" +").unwrap();
    static ref PAREN_ASIDE: Regex = Regex::new(r"\([^(|\^)]+\)").unwrap();
    // Word units are already space separated, so `3.14` reads `3 . 14` here.
    static ref DECIMAL: Regex = Regex::new(r"\b\d+(?: \. \d+)+\b").unwrap();
    static ref QUOTED: Regex = Regex::new(r#""[^"]+""#).unwrap();
    static ref HEX: Regex = Regex::new(r"\b0[xX][A-Fa-f0-9]+\b").unwrap();
    static ref INTEGER: Regex = Regex::new(r"\b\d+\b").unwrap();
    static ref DIGITS_THEN_LETTERS: Regex = Regex::new(r"(^|[^A-Za-z_])(\d+[A-Za-z]+)").unwrap();
}

/// Shared read-only lexical resources
pub struct NlpContext {
    lexicon: Arc<Lexicon>,
    tagger: Arc<dyn PosTagger>,
}

impl NlpContext {
    pub fn new(lexicon: Arc<Lexicon>, tagger: Arc<dyn PosTagger>) -> Self {
        Self { lexicon, tagger }
    }

    /// Built-in lexicon with the rule tagger
    pub fn builtin() -> Self {
        let lexicon = Lexicon::builtin();
        let tagger = Arc::new(RuleTagger::new(Arc::clone(&lexicon)));
        Self::new(lexicon, tagger)
    }

    /// WordNet `dict/` directory with the rule tagger
    pub fn from_wordnet_dir(dir: &Path) -> LexiconResult<Self> {
        let lexicon = Arc::new(Lexicon::from_wordnet_dir(dir)?);
        let tagger = Arc::new(RuleTagger::new(Arc::clone(&lexicon)));
        Ok(Self::new(lexicon, tagger))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn tagger(&self) -> &dyn PosTagger {
        self.tagger.as_ref()
    }
}

impl fmt::Debug for NlpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NlpContext")
            .field("lemmas", &self.lexicon.len())
            .finish_non_exhaustive()
    }
}

/// Turns natural-language text into normalized tokens
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    context: Arc<NlpContext>,
}

impl TextNormalizer {
    pub fn new(context: Arc<NlpContext>) -> Self {
        Self { context }
    }

    /// Normalizer over the built-in resources
    pub fn builtin() -> Self {
        Self::new(Arc::new(NlpContext::builtin()))
    }

    pub fn context(&self) -> &NlpContext {
        &self.context
    }

    /// Full sentence normalization: [`clean_line`] then [`lemmatized_words`]
    ///
    /// [`clean_line`]: TextNormalizer::clean_line
    /// [`lemmatized_words`]: TextNormalizer::lemmatized_words
    pub fn normalize(&self, text: &str) -> NormalizedTokens {
        let cleaned = Self::clean_line(text);
        self.lemmatized_words(&cleaned).into_iter().collect()
    }

    /// Query text: strict filter, normalize, then drop units holding parentheses
    pub fn query_tokens(&self, text: &str) -> NormalizedTokens {
        let mut tokens = self.normalize(&filter_all(text));
        tokens.retain(|token| !token.contains(&['(', ')'][..]));
        tokens
    }

    /// Context text: loose filter, then normalize
    pub fn context_tokens(&self, text: &str) -> NormalizedTokens {
        self.normalize(&filter_part(text))
    }

    pub fn tokens_for(&self, text: &str, role: TextRole) -> NormalizedTokens {
        match role {
            TextRole::Query => self.query_tokens(text),
            TextRole::Context => self.context_tokens(text),
        }
    }

    /// Expand contractions, collapse whitespace, underscore camelCase and
    /// strip parenthesized asides
    pub fn clean_line(line: &str) -> String {
        let line = contractions::expand(line);
        let line = WHITESPACE_CONTROL.replace_all(&line, " ");
        let line = SPACE_RUN.replace_all(&line, " ");
        let line = underscore(line.trim());
        PAREN_ASIDE.replace_all(&line, "").trim().to_string()
    }

    /// Mask literals, tag and lemmatize a cleaned line
    pub fn lemmatized_words(&self, line: &str) -> Vec<String> {
        let masked = mask_literals(&respace(line));
        let words: Vec<String> = masked.split_whitespace().map(str::to_lowercase).collect();
        let tags = self.context.tagger.tag(&words);
        let lexicon = self.context.lexicon();

        words
            .into_iter()
            .zip(tags.iter().map(String::as_str).chain(std::iter::repeat("")))
            .map(|(word, tag)| match WordPos::from_penn(tag) {
                Some(pos) => lexicon.lemmatize(&word, pos),
                None => lexicon.morphy(&word).unwrap_or(word),
            })
            .inspect(|word| trace!(%word, "lemmatized"))
            .collect()
    }
}

/// Replace numbers, double-quoted strings and hex literals with tags
pub fn mask_literals(line: &str) -> String {
    let line = DECIMAL.replace_all(line, INTEGER_TAG);
    let line = QUOTED.replace_all(&line, STRING_TAG);
    let line = HEX.replace_all(&line, INTEGER_TAG);
    let line = INTEGER.replace_all(&line, INTEGER_TAG);
    DIGITS_THEN_LETTERS
        .replace_all(&line, "${1}TAGOER")
        .into_owned()
}
