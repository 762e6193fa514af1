//! Fragment sanitization ahead of lexing

use lazy_static::lazy_static;
use regex::Regex;

/// Words that collide with dialect-specific reserved words and are
/// suffixed with `1` so they lex as plain names
const COLLIDING_WORDS: &[&str] = &["index", "table", "day", "year", "user", "text"];

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Trim, lowercase, terminate with `;`, pad parentheses, suffix colliding
/// words and drop `#`
///
/// A colliding word is only suffixed when something precedes it, so a
/// fragment that starts with `table` keeps it.
pub fn sanitize(sql: &str) -> String {
    let mut text = sql.trim().to_lowercase();
    if !text.ends_with(';') {
        text.push(';');
    }
    let text = text.replace('(', " ( ").replace(')', " ) ");

    let text = WORD.replace_all(&text, |caps: &regex::Captures<'_>| {
        let word = &caps[0];
        let preceded = caps.get(0).is_some_and(|m| m.start() > 0);
        if preceded && COLLIDING_WORDS.contains(&word) {
            format!("{word}1")
        } else {
            word.to_string()
        }
    });

    text.replace('#', "")
}
