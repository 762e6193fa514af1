//! Character filters and re-spacing helpers shared by every field pipeline

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OUTSIDE_LOOSE_SET: Regex =
        Regex::new(r#"[^()|0-9a-zA-Z\-#/_,'=><"?.*+\[\]\^\{\}\n]+"#).unwrap();
    static ref OUTSIDE_STRICT_SET: Regex = Regex::new(r#"[^()|0-9a-zA-Z\-_'"\n]+"#).unwrap();
    static ref DASH_RUN: Regex = Regex::new(r"-+").unwrap();
    static ref UNDERSCORE_RUN: Regex = Regex::new(r"_+").unwrap();
    static ref DOT_RUN: Regex = Regex::new(r"\.+").unwrap();
    static ref TAB_RUN: Regex = Regex::new(r"\t+").unwrap();
    static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").unwrap();
    static ref SPACE_RUN: Regex = Regex::new(r" +").unwrap();
    static ref SHELL_REDIRECT: Regex = Regex::new(r">>+").unwrap();
    static ref WORD_OR_SYMBOL: Regex = Regex::new(r"\w+|[^\s\w]").unwrap();
    static ref WORD_OR_PUNCT_RUN: Regex = Regex::new(r"\w+|[^\w\s]+").unwrap();
    static ref UPPER_RUN_BEFORE_WORD: Regex = Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap();
    static ref LOWER_BEFORE_UPPER: Regex = Regex::new(r"([a-z\d])([A-Z])").unwrap();
}

/// Loose filter for code and context text
///
/// Keeps letters, digits, newlines and the punctuation code commonly needs;
/// every other run of characters becomes a single space.
pub fn filter_part(line: &str) -> String {
    finish_filter(&OUTSIDE_LOOSE_SET.replace_all(line, " "))
}

/// Strict filter for query text: letters, digits, newlines, `()|-_'"`
pub fn filter_all(line: &str) -> String {
    finish_filter(&OUTSIDE_STRICT_SET.replace_all(line, " "))
}

fn finish_filter(line: &str) -> String {
    let line = DASH_RUN.replace_all(line, "-");
    let line = UNDERSCORE_RUN.replace_all(&line, "_");
    line.replace(['|', '¦'], " ")
}

/// Collapse dot, tab, newline and space runs, dropping `>>` redirect runs
pub fn collapse_runs(line: &str) -> String {
    let line = DOT_RUN.replace_all(line, ".");
    let line = TAB_RUN.replace_all(&line, "\t");
    let line = NEWLINE_RUN.replace_all(&line, "\n");
    let line = SHELL_REDIRECT.replace_all(&line, "");
    SPACE_RUN.replace_all(&line, " ").into_owned()
}

/// Split into word runs and single non-space symbols, joined by one space
///
/// The result is always a single line.
pub fn respace(line: &str) -> String {
    WORD_OR_SYMBOL
        .find_iter(line)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split into word runs and punctuation runs
pub fn word_punct_split(line: &str) -> Vec<String> {
    WORD_OR_PUNCT_RUN
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// CamelCase to underscore form, `-` to `_`, lowercased
///
/// `HTTPServer` becomes `http_server`, `parseSql` becomes `parse_sql`.
pub fn underscore(text: &str) -> String {
    let text = UPPER_RUN_BEFORE_WORD.replace_all(text, "${1}_${2}");
    let text = LOWER_BEFORE_UPPER.replace_all(&text, "${1}_${2}");
    text.replace('-', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_part_keeps_code_punctuation() {
        assert_eq!(filter_part("a[i] = {'k': 2}"), "a[i] = {'k' 2}");
        assert_eq!(filter_part("x;y@z"), "x y z");
    }

    #[test]
    fn test_filter_part_collapses_dash_and_underscore_runs() {
        assert_eq!(filter_part("a---b__c"), "a-b_c");
    }

    #[test]
    fn test_filter_all_drops_operators() {
        assert_eq!(filter_all("how to sum(x) in a+b?"), "how to sum(x) in a b ");
    }

    #[test]
    fn test_pipes_become_spaces() {
        assert_eq!(filter_part("a|b"), "a b");
        assert_eq!(filter_all("a¦b"), "a b");
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(collapse_runs("a...b\t\t c  >> d\n\n"), "a.b\t c d\n");
    }

    #[test]
    fn test_respace_flattens_to_one_line() {
        assert_eq!(respace("x=foo(1)\ny"), "x = foo ( 1 ) y");
    }

    #[test]
    fn test_word_punct_split_groups_punctuation() {
        assert_eq!(word_punct_split("'abc + 1)):"), vec!["'", "abc", "+", "1", ")):"]);
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("HTTPServer"), "http_server");
        assert_eq!(underscore("parseSql"), "parse_sql");
        assert_eq!(underscore("row-height"), "row_height");
        assert_eq!(underscore("VAR NUMBER"), "var number");
        assert_eq!(underscore("utf8Encode"), "utf8_encode");
    }
}
