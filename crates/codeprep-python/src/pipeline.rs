//! Field pipeline for Python code

use codeprep_common::cleanup::{collapse_runs, filter_part, respace, underscore};
use codeprep_common::{NormalizeResult, NormalizedTokens};

use crate::tokenizer::analyze;

/// Normalized code plus the diagnostics raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonCode {
    pub tokens: NormalizedTokens,
    pub symbols_degraded: bool,
    pub lexing_recovered: bool,
}

/// Filter, re-space, analyze and finalize a Python code field
///
/// Re-spacing into word/symbol units puts the whole fragment on one line
/// before analysis.
pub fn normalize_code(code: &str) -> NormalizeResult<PythonCode> {
    let line = collapse_runs(&filter_part(code));
    let line = respace(line.trim_matches('\n').trim());

    let analysis = analyze(&line)?;
    let joined = analysis.texts().collect::<Vec<_>>().join(" ");
    let tokens = underscore(&joined)
        .split(' ')
        .map(str::trim)
        .collect::<NormalizedTokens>();

    Ok(PythonCode {
        tokens,
        symbols_degraded: analysis.symbols_degraded,
        lexing_recovered: analysis.lexing_recovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeprep_common::NormalizeError;

    fn tokens(code: &str) -> Vec<String> {
        normalize_code(code).unwrap().tokens.into_inner()
    }

    #[test]
    fn test_assignment_line() {
        assert_eq!(
            tokens("total = getValue(x) + 1"),
            vec!["var", "=", "get_value", "(", "x", ")", "+", "number", "newline"]
        );
    }

    #[test]
    fn test_prompts_and_noise_are_filtered() {
        let out = tokens(">>> items = [1, 2]  # list");
        assert!(out.iter().all(|token| !token.is_empty()));
        assert!(!out.contains(&">".to_string()));
        assert!(out.contains(&"var".to_string()));
    }

    #[test]
    fn test_strings_collapse() {
        assert_eq!(
            tokens("print(\"hello world\")"),
            vec!["print", "(", "string", ")", "newline"]
        );
    }

    #[test]
    fn test_lone_quote_is_the_failure_sentinel() {
        let err = normalize_code("'").unwrap_err();
        assert_eq!(err, NormalizeError::UnrecoverableCode);
        assert_eq!(err.to_string(), "-1000");
    }
}
