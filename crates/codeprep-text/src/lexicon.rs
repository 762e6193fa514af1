//! WordNet-style lemma index with morphological analysis
//!
//! A [`Lexicon`] knows which lemmas exist for each part of speech plus the
//! irregular inflections WordNet lists in its exception files. Analysis
//! follows WordNet's morphy: exceptions first, then one round of suffix
//! detachment, keeping only candidates that are known lemmas.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LexiconError, LexiconResult};

const BUILTIN_LEMMAS: &str = include_str!("../data/lemmas.tsv");
const BUILTIN_EXCEPTIONS: &str = include_str!("../data/exceptions.tsv");

static BUILTIN: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    match Lexicon::from_tables(
        BUILTIN_LEMMAS,
        BUILTIN_EXCEPTIONS,
        Path::new("<builtin>"),
    ) {
        Ok(lexicon) => Arc::new(lexicon),
        Err(err) => {
            warn!("built-in lexicon failed to load, lemmatization disabled: {err}");
            Arc::new(Lexicon::empty())
        }
    }
});

/// Parts of speech WordNet distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordPos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl WordPos {
    /// Lookup order used when no part of speech is given
    pub const ALL: [WordPos; 4] = [WordPos::Noun, WordPos::Verb, WordPos::Adj, WordPos::Adv];

    /// Map a Penn Treebank tag onto a WordNet part of speech
    pub fn from_penn(tag: &str) -> Option<Self> {
        match tag.chars().next()? {
            'J' => Some(WordPos::Adj),
            'V' => Some(WordPos::Verb),
            'N' => Some(WordPos::Noun),
            'R' => Some(WordPos::Adv),
            _ => None,
        }
    }

    /// WordNet's one-letter codes; `s` (adjective satellite) folds into `a`
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(WordPos::Noun),
            'v' => Some(WordPos::Verb),
            'a' | 's' => Some(WordPos::Adj),
            'r' => Some(WordPos::Adv),
            _ => None,
        }
    }

    fn file_suffix(self) -> &'static str {
        match self {
            WordPos::Noun => "noun",
            WordPos::Verb => "verb",
            WordPos::Adj => "adj",
            WordPos::Adv => "adv",
        }
    }

    fn substitutions(self) -> &'static [(&'static str, &'static str)] {
        match self {
            WordPos::Noun => &[
                ("s", ""),
                ("ses", "s"),
                ("ves", "f"),
                ("xes", "x"),
                ("zes", "z"),
                ("ches", "ch"),
                ("shes", "sh"),
                ("men", "man"),
                ("ies", "y"),
            ],
            WordPos::Verb => &[
                ("s", ""),
                ("ies", "y"),
                ("es", "e"),
                ("es", ""),
                ("ed", "e"),
                ("ed", ""),
                ("ing", "e"),
                ("ing", ""),
            ],
            WordPos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
            WordPos::Adv => &[],
        }
    }
}

/// Read-only lemma dictionary
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    /// lemma -> parts of speech, most common usage first
    lemmas: HashMap<String, Vec<WordPos>>,
    exceptions: HashMap<WordPos, HashMap<String, Vec<String>>>,
}

impl Lexicon {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The general English dictionary compiled into the crate
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&BUILTIN)
    }

    /// Build from tab-separated tables
    ///
    /// `lemmas` rows are `lemma<TAB>codes` where codes is a run of `n v a r`
    /// letters in preference order. `exceptions` rows are
    /// `form<TAB>code<TAB>lemma`. Blank lines and `#` comments are ignored.
    pub fn from_tables(lemmas: &str, exceptions: &str, origin: &Path) -> LexiconResult<Self> {
        let mut lexicon = Self::empty();

        for (idx, row) in data_rows(lemmas) {
            let mut fields = row.split('\t');
            let (Some(lemma), Some(codes)) = (fields.next(), fields.next()) else {
                return Err(malformed(origin, idx, "expected lemma and part-of-speech codes"));
            };
            for code in codes.trim().chars() {
                let pos = WordPos::from_code(code)
                    .ok_or_else(|| malformed(origin, idx, &format!("unknown code '{code}'")))?;
                lexicon.insert_lemma(lemma.trim(), pos);
            }
        }

        for (idx, row) in data_rows(exceptions) {
            let fields: Vec<&str> = row.split('\t').map(str::trim).collect();
            let [form, code, lemma] = fields.as_slice() else {
                return Err(malformed(origin, idx, "expected form, code and lemma"));
            };
            let pos = code
                .chars()
                .next()
                .and_then(WordPos::from_code)
                .ok_or_else(|| malformed(origin, idx, &format!("unknown code '{code}'")))?;
            lexicon.insert_exception(pos, form, lemma);
        }

        debug!(
            origin = %origin.display(),
            lemmas = lexicon.lemmas.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    /// Load a WordNet `dict/` directory (`index.*` and `*.exc` files)
    pub fn from_wordnet_dir(dir: &Path) -> LexiconResult<Self> {
        let mut lexicon = Self::empty();
        let mut found_index = false;

        for pos in WordPos::ALL {
            let index_path = dir.join(format!("index.{}", pos.file_suffix()));
            if index_path.is_file() {
                found_index = true;
                for line in read_file(&index_path)?.lines() {
                    // License header lines start with whitespace.
                    if line.starts_with(' ') || line.is_empty() {
                        continue;
                    }
                    if let Some(lemma) = line.split(' ').next() {
                        lexicon.insert_lemma(&lemma.to_lowercase(), pos);
                    }
                }
            } else {
                warn!(path = %index_path.display(), "missing WordNet index file");
            }

            let exc_path = dir.join(format!("{}.exc", pos.file_suffix()));
            if exc_path.is_file() {
                for (idx, line) in read_file(&exc_path)?.lines().enumerate() {
                    let mut fields = line.split_whitespace();
                    let Some(form) = fields.next() else {
                        continue;
                    };
                    let lemmas: Vec<&str> = fields.collect();
                    if lemmas.is_empty() {
                        return Err(malformed(&exc_path, idx + 1, "exception without lemma"));
                    }
                    for lemma in lemmas {
                        lexicon.insert_exception(pos, form, lemma);
                    }
                }
            }
        }

        if !found_index {
            return Err(LexiconError::EmptyDictionary(dir.to_path_buf()));
        }
        Ok(lexicon)
    }

    pub fn insert_lemma(&mut self, lemma: &str, pos: WordPos) {
        let entry = self.lemmas.entry(lemma.to_string()).or_default();
        if !entry.contains(&pos) {
            entry.push(pos);
        }
    }

    pub fn insert_exception(&mut self, pos: WordPos, form: &str, lemma: &str) {
        let lemmas = self
            .exceptions
            .entry(pos)
            .or_default()
            .entry(form.to_string())
            .or_default();
        if !lemmas.iter().any(|known| known == lemma) {
            lemmas.push(lemma.to_string());
        }
    }

    pub fn contains(&self, lemma: &str, pos: WordPos) -> bool {
        self.lemmas
            .get(lemma)
            .is_some_and(|poses| poses.contains(&pos))
    }

    /// Parts of speech `lemma` is listed under, most common first
    pub fn parts_of_speech(&self, lemma: &str) -> &[WordPos] {
        self.lemmas.get(lemma).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Every known lemma `form` can be an inflection of, in discovery order
    pub fn analyses(&self, form: &str, pos: WordPos) -> Vec<String> {
        if let Some(irregular) = self.exceptions.get(&pos).and_then(|map| map.get(form)) {
            let candidates = std::iter::once(form.to_string()).chain(irregular.iter().cloned());
            return self.known_forms(candidates, pos);
        }

        let detached = pos
            .substitutions()
            .iter()
            .filter_map(|(old, new)| {
                form.strip_suffix(old)
                    .map(|stem| format!("{stem}{new}"))
            })
            .collect::<Vec<_>>();
        let candidates = std::iter::once(form.to_string()).chain(detached);
        self.known_forms(candidates, pos)
    }

    /// Shortest lemma for `word` under `pos`, or the word itself
    pub fn lemmatize(&self, word: &str, pos: WordPos) -> String {
        self.analyses(word, pos)
            .into_iter()
            .min_by_key(|lemma| lemma.len())
            .unwrap_or_else(|| word.to_string())
    }

    /// First analysis across all parts of speech, if any
    pub fn morphy(&self, form: &str) -> Option<String> {
        WordPos::ALL
            .iter()
            .find_map(|pos| self.analyses(form, *pos).into_iter().next())
    }

    fn known_forms<I>(&self, candidates: I, pos: WordPos) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut known: Vec<String> = Vec::new();
        for candidate in candidates {
            if self.contains(&candidate, pos) && !known.contains(&candidate) {
                known.push(candidate);
            }
        }
        known
    }
}

fn data_rows(table: &str) -> impl Iterator<Item = (usize, &str)> {
    table
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}

fn malformed(path: &Path, line: usize, message: &str) -> LexiconError {
    LexiconError::Malformed {
        path: PathBuf::from(path),
        line,
        message: message.to_string(),
    }
}

fn read_file(path: &Path) -> LexiconResult<String> {
    fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })
}
