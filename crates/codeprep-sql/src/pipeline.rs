//! Field pipeline for SQL code

use codeprep_common::cleanup::{collapse_runs, filter_part, respace, underscore};
use codeprep_common::{NormalizeResult, NormalizedTokens};
use lazy_static::lazy_static;
use regex::Regex;

use crate::anonymizer::{AnonymizerOptions, QueryAnonymizer};

lazy_static! {
    static ref DOTTED_NUMBER: Regex = Regex::new(r"\d+(\.\d+)+").unwrap();
}

/// Filter, re-space, anonymize and finalize a SQL code field
///
/// The trailing statement terminator is dropped from the output.
pub fn normalize_code(sql: &str, detailed_strings: bool) -> NormalizeResult<NormalizedTokens> {
    let line = collapse_runs(&filter_part(sql));
    let line = DOTTED_NUMBER.replace_all(&line, "number");
    let line = respace(line.trim());

    let anonymizer = QueryAnonymizer::new(AnonymizerOptions {
        detailed_strings,
        rename: true,
    });
    let anonymized = anonymizer.anonymize(&line)?;

    let mut texts: Vec<&str> = anonymized.texts().collect();
    texts.pop();
    let joined = underscore(&texts.join(" "));
    Ok(joined.split(' ').collect())
}
