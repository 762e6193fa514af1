//! End-to-end checks of the documented behaviour of each track

use codeprep_common::{NormalizeError, CODE_FAILURE_SENTINEL};
use codeprep_python::{analyze, resolve};
use codeprep_sql::{anonymize, QueryCategory};
use codeprep_text::TextNormalizer;

#[test]
fn test_root_loop_collapses_every_local_name() {
    let code = "root = 0.0\nwhile root * root < n:\n    root = root + 1\nprint(root * root)";
    let analysis = analyze(code).expect("fragment tokenizes");
    let texts: Vec<&str> = analysis.texts().collect();

    assert!(!texts.contains(&"root"));
    assert_eq!(texts.iter().filter(|text| **text == "VAR").count(), 7);
    assert_eq!(texts[2], "NUMBER");
    for kept in ["while", "*", "<", "n", ":", "print", "(", ")"] {
        assert!(texts.contains(&kept), "{kept} should be kept verbatim");
    }
}

#[test]
fn test_for_bound_name_survives_broken_fragment() {
    let resolution = resolve("for row in rows:\n    print(row\n");
    assert!(resolution.degraded);
    assert!(resolution.symbols.contains("row"));
}

#[test]
fn test_qualified_select_is_anonymized() {
    let anonymized = anonymize("SELECT a.x FROM tbl AS a WHERE a.y = 1").expect("lexes");
    let find = |category: QueryCategory| {
        anonymized
            .tokens
            .iter()
            .filter(|token| token.category == category)
            .map(|token| token.text.as_str())
            .collect::<Vec<&str>>()
    };

    let tables = find(QueryCategory::Table);
    assert!(tables.iter().all(|text| text.starts_with("tab")));
    assert_eq!(anonymized.identifiers.table_count(), 2);
    assert_eq!(anonymized.identifiers.original("tab0"), Some("tbl"));
    assert_eq!(anonymized.identifiers.original(tables[0]), Some("a"));

    let columns = find(QueryCategory::Column);
    assert_eq!(columns.len(), 2);
    assert_ne!(columns[0], columns[1]);
    assert_eq!(find(QueryCategory::Integer), vec!["CODINT"]);
}

#[test]
fn test_text_masks_numbers_and_splits_punctuation() {
    let tokens = TextNormalizer::builtin().normalize("Convert INT to VARCHAR SQL 11?");
    assert!(!tokens.iter().any(|token| token == "11"));
    assert!(tokens.iter().any(|token| token == "?"));
    assert!(tokens.iter().all(|token| *token == token.to_lowercase()));
}

#[test]
fn test_failure_shapes_are_distinguishable() {
    let code_failure = codeprep_python::normalize_code("'").unwrap_err();
    assert_eq!(code_failure.to_string(), CODE_FAILURE_SENTINEL);

    let query_failure = codeprep_sql::normalize_code("select 'x", true).unwrap_err();
    assert!(matches!(query_failure, NormalizeError::Query(_)));
    assert_ne!(query_failure.to_string(), CODE_FAILURE_SENTINEL);
}
