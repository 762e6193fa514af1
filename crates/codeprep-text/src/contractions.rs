//! English contraction expansion

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PRONOUN_IS: Regex = Regex::new(r"(?i)\b(it|he|she|that|this|there|here)'s\b").unwrap();
    static ref POSSESSIVE_S: Regex = Regex::new(r"([a-zA-Z])'s\b").unwrap();
    static ref PLURAL_POSSESSIVE: Regex = Regex::new(r"s'(?:s\b)?").unwrap();
    static ref NOT: Regex = Regex::new(r"([a-zA-Z])n't\b").unwrap();
    static ref WOULD: Regex = Regex::new(r"([a-zA-Z])'d\b").unwrap();
    static ref WILL: Regex = Regex::new(r"([a-zA-Z])'ll\b").unwrap();
    static ref AM: Regex = Regex::new(r"\b([Ii])'m\b").unwrap();
    static ref ARE: Regex = Regex::new(r"([a-zA-Z])'re\b").unwrap();
    static ref HAVE: Regex = Regex::new(r"([a-zA-Z])'ve\b").unwrap();
}

/// Expand contractions by ordered substitution
///
/// `it's` becomes `it is`, possessive `'s` is dropped, `s'` becomes `s`,
/// and `n't 'd 'll 'm 're 've` expand to their full words.
pub fn expand(line: &str) -> String {
    let line = PRONOUN_IS.replace_all(line, "${1} is");
    let line = POSSESSIVE_S.replace_all(&line, "${1}");
    let line = PLURAL_POSSESSIVE.replace_all(&line, "s");
    let line = NOT.replace_all(&line, "${1} not");
    let line = WOULD.replace_all(&line, "${1} would");
    let line = WILL.replace_all(&line, "${1} will");
    let line = AM.replace_all(&line, "${1} am");
    let line = ARE.replace_all(&line, "${1} are");
    HAVE.replace_all(&line, "${1} have").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pronoun_is() {
        assert_eq!(expand("It's broken"), "It is broken");
        assert_eq!(expand("there's a row"), "there is a row");
    }

    #[test]
    fn test_possessives() {
        assert_eq!(expand("the table's index"), "the table index");
        assert_eq!(expand("the users' rows"), "the users rows");
    }

    #[test]
    fn test_auxiliary_contractions() {
        assert_eq!(expand("doesn't work"), "does not work");
        assert_eq!(expand("I'd rather"), "I would rather");
        assert_eq!(expand("it'll fail"), "it will fail");
        assert_eq!(expand("I'm stuck"), "I am stuck");
        assert_eq!(expand("they're equal"), "they are equal");
        assert_eq!(expand("we've tried"), "we have tried");
    }

    #[test]
    fn test_plain_quotes_untouched() {
        assert_eq!(expand("'quoted' text"), "'quoted' text");
    }
}
