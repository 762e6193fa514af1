//! Regex-shape scanning of string literals
//!
//! Quoted text is reduced to a coarse description of the regular
//! expression it would be: runs of plain characters become `REFRE`, each
//! metacharacter becomes a named marker, bracket classes are kept verbatim
//! and anything else is dropped.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RULES: Vec<(Regex, Rule)> = vec![
        (Regex::new(r"^\[[^\]]*\]").unwrap(), Rule::Verbatim),
        (Regex::new(r"^\+").unwrap(), Rule::Marker("REGPLU")),
        (Regex::new(r"^\*").unwrap(), Rule::Marker("REGAST")),
        (Regex::new(r"^%").unwrap(), Rule::Marker("REGCOL")),
        (Regex::new(r"^\^").unwrap(), Rule::Marker("REGSTA")),
        (Regex::new(r"^\$").unwrap(), Rule::Marker("REGEND")),
        (Regex::new(r"^\?").unwrap(), Rule::Marker("REGQUE")),
        (
            Regex::new(r"^[.~`;_a-zA-Z0-9\s=:{}\-\\]+").unwrap(),
            Rule::Marker("REFRE"),
        ),
    ];
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Verbatim,
    Marker(&'static str),
}

/// Scan `text` into space-joined shape units
pub fn regex_shape(text: &str) -> String {
    let mut units: Vec<&str> = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let matched = RULES
            .iter()
            .find_map(|(pattern, rule)| pattern.find(rest).map(|m| (m.end(), *rule)));
        match matched {
            Some((end, Rule::Verbatim)) => {
                units.push(&rest[..end]);
                rest = &rest[end..];
            }
            Some((end, Rule::Marker(marker))) => {
                units.push(marker);
                rest = &rest[end..];
            }
            None => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }

    units.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_unit() {
        assert_eq!(regex_shape("'abc def'"), "REFRE");
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(regex_shape("'%abc%'"), "REGCOL REFRE REGCOL");
    }

    #[test]
    fn test_metacharacters_and_classes() {
        assert_eq!(
            regex_shape("'^[a-z]+x*$'"),
            "REGSTA [a-z] REGPLU REFRE REGAST REGEND"
        );
        assert_eq!(regex_shape("a?"), "REFRE REGQUE");
    }

    #[test]
    fn test_unknown_characters_are_dropped() {
        assert_eq!(regex_shape("'@!'"), "");
        assert_eq!(regex_shape(""), "");
    }
}
