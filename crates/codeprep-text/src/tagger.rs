//! Part-of-speech tagging with Penn Treebank tags

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::lexicon::{Lexicon, WordPos};

/// Assigns one Penn Treebank tag per word
pub trait PosTagger: Send + Sync {
    /// Tag `words` positionally; the result has the same length as the input
    fn tag(&self, words: &[String]) -> Vec<String>;
}

lazy_static! {
    static ref CLOSED_CLASS: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        for word in ["the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any", "no", "all", "another", "both", "either", "neither"] {
            map.insert(word, "DT");
        }
        for word in ["in", "on", "at", "of", "for", "with", "from", "by", "into", "onto", "over", "under", "about", "as", "between", "through", "without", "within", "after", "before", "during", "than", "if", "because", "while", "whether", "since", "until", "via", "per", "across", "against", "among", "upon"] {
            map.insert(word, "IN");
        }
        for word in ["and", "or", "but", "nor", "plus"] {
            map.insert(word, "CC");
        }
        for word in ["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "itself", "myself", "themselves"] {
            map.insert(word, "PRP");
        }
        for word in ["my", "your", "his", "its", "our", "their", "her"] {
            map.insert(word, "PRP$");
        }
        for word in ["can", "could", "will", "would", "should", "shall", "may", "might", "must"] {
            map.insert(word, "MD");
        }
        for word in ["not", "very", "also", "just", "only", "too", "so", "then", "now", "here", "again", "always", "never", "often", "already", "still", "instead", "even", "however", "once", "rather", "else"] {
            map.insert(word, "RB");
        }
        map.insert("to", "TO");
        map.insert("there", "EX");
        map.insert("which", "WDT");
        map.insert("what", "WP");
        map.insert("who", "WP");
        map.insert("whom", "WP");
        map.insert("whose", "WP$");
        for word in ["how", "when", "where", "why"] {
            map.insert(word, "WRB");
        }
        map.insert("is", "VBZ");
        map.insert("are", "VBP");
        map.insert("am", "VBP");
        map.insert("was", "VBD");
        map.insert("were", "VBD");
        map.insert("be", "VB");
        map.insert("been", "VBN");
        map.insert("being", "VBG");
        map.insert("do", "VBP");
        map.insert("does", "VBZ");
        map.insert("did", "VBD");
        map.insert("have", "VBP");
        map.insert("has", "VBZ");
        map.insert("had", "VBD");
        map
    };
}

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ical", "ic", "al"];

/// Deterministic tagger: closed-class lookup, lexicon-backed open classes,
/// suffix rules for unknown words and a few context rules
pub struct RuleTagger {
    lexicon: Arc<Lexicon>,
}

impl RuleTagger {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn tag_word(&self, word: &str, prev: Option<&str>, sentence_start: bool) -> &'static str {
        if let Some(tag) = CLOSED_CLASS.get(word) {
            return *tag;
        }
        if !word.chars().any(char::is_alphanumeric) {
            return punctuation_tag(word);
        }
        if word.chars().next().is_some_and(|c| c.is_ascii_digit())
            && word.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return "CD";
        }

        let poses = self.lexicon.parts_of_speech(word);
        if !poses.is_empty() {
            return self.tag_known_lemma(poses, prev, sentence_start);
        }
        self.tag_inflected(word, prev)
    }

    fn tag_known_lemma(&self, poses: &[WordPos], prev: Option<&str>, sentence_start: bool) -> &'static str {
        let has = |pos: WordPos| poses.contains(&pos);
        match prev {
            Some("TO") | Some("MD") if has(WordPos::Verb) => return "VB",
            Some("DT") | Some("PRP$") | Some("JJ") | Some("CD") | Some("POS") => {
                if has(WordPos::Noun) {
                    return "NN";
                }
                if has(WordPos::Adj) {
                    return "JJ";
                }
            }
            _ => {}
        }
        if sentence_start && has(WordPos::Verb) {
            return "VB";
        }
        match poses[0] {
            WordPos::Noun => "NN",
            WordPos::Verb => match prev {
                Some("PRP") | Some("NNS") => "VBP",
                _ => "VB",
            },
            WordPos::Adj => "JJ",
            WordPos::Adv => "RB",
        }
    }

    fn tag_inflected(&self, word: &str, prev: Option<&str>) -> &'static str {
        let after_auxiliary = matches!(prev, Some(tag) if tag.starts_with("VB"));
        let is_verb_form = !self.lexicon.analyses(word, WordPos::Verb).is_empty();

        if word.ends_with("ing") && (is_verb_form || word.len() > 5) {
            return "VBG";
        }
        if word.ends_with("ed") && (is_verb_form || word.len() > 4) {
            return if after_auxiliary { "VBN" } else { "VBD" };
        }
        if !self.lexicon.analyses(word, WordPos::Adj).is_empty() {
            if word.ends_with("est") {
                return "JJS";
            }
            if word.ends_with("er") {
                return "JJR";
            }
        }
        if word.ends_with('s') && !word.ends_with("ss") {
            if !self.lexicon.analyses(word, WordPos::Noun).is_empty() {
                return "NNS";
            }
            if is_verb_form {
                return "VBZ";
            }
        }
        // Only irregular forms from the exception lists get here as verbs.
        if is_verb_form && self.lexicon.analyses(word, WordPos::Noun).is_empty() {
            return if after_auxiliary { "VBN" } else { "VBD" };
        }
        if word.ends_with("ly") {
            return "RB";
        }
        if ADJECTIVE_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)) {
            return "JJ";
        }
        if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
            return "NNS";
        }
        "NN"
    }
}

impl PosTagger for RuleTagger {
    fn tag(&self, words: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(words.len());
        for (idx, word) in words.iter().enumerate() {
            let prev = tags.last().map(String::as_str);
            let sentence_start = idx == 0 || prev == Some(".");
            let tag = self.tag_word(word, prev, sentence_start);
            tags.push(tag.to_string());
        }
        tags
    }
}

fn punctuation_tag(word: &str) -> &'static str {
    match word {
        "." | "?" | "!" => ".",
        "," => ",",
        ":" | ";" | "..." => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\"" | "'" | "''" => "''",
        "`" | "``" => "``",
        "#" => "#",
        "$" => "$",
        _ => "SYM",
    }
}
