//! # codeprep text
//!
//! Natural-language normalization shared by the Python and SQL tracks.
//!
//! A sentence goes through contraction expansion, whitespace and case
//! cleanup, removal of parenthesized asides, numeric/string/hex masking,
//! part-of-speech tagging and lemmatization. The lexical resources
//! ([`Lexicon`] and a [`PosTagger`]) are read-only and shared through an
//! [`NlpContext`].

pub mod contractions;
pub mod error;
pub mod lexicon;
pub mod normalizer;
pub mod tagger;

pub use error::{LexiconError, LexiconResult};
pub use lexicon::{Lexicon, WordPos};
pub use normalizer::{NlpContext, TextNormalizer};
pub use tagger::{PosTagger, RuleTagger};
