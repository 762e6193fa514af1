//! Corpus record shapes

use codeprep_common::{NormalizeResult, NormalizedTokens};
use serde::{Deserialize, Serialize};

/// One input line: `{ "qid", "context": [s1, s2], "code", "query" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Opaque record id, copied to the output as is
    pub qid: serde_json::Value,
    #[serde(default)]
    pub context: Vec<String>,
    pub code: String,
    pub query: String,
}

/// Normalized code, or the failure value emitted in its place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeField {
    Tokens(NormalizedTokens),
    Failure(String),
}

impl CodeField {
    pub fn is_failure(&self) -> bool {
        matches!(self, CodeField::Failure(_))
    }
}

impl From<NormalizeResult<NormalizedTokens>> for CodeField {
    fn from(result: NormalizeResult<NormalizedTokens>) -> Self {
        match result {
            Ok(tokens) => CodeField::Tokens(tokens),
            Err(err) => CodeField::Failure(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub qid: serde_json::Value,
    pub context: Vec<NormalizedTokens>,
    pub code: CodeField,
    pub query: NormalizedTokens,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeprep_common::NormalizeError;

    #[test]
    fn test_input_record_parses_corpus_line() {
        let line = r#"{"qid": 42, "context": ["a", "-10000"], "code": "x = 1", "query": "how"}"#;
        let record: InputRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.qid, serde_json::json!(42));
        assert_eq!(record.context, vec!["a", "-10000"]);
    }

    #[test]
    fn test_code_field_serializes_untagged() {
        let tokens: CodeField = Ok(["var", "="].into_iter().collect::<NormalizedTokens>()).into();
        assert_eq!(serde_json::to_string(&tokens).unwrap(), r#"["var","="]"#);

        let failure: CodeField = Err(NormalizeError::UnrecoverableCode).into();
        assert!(failure.is_failure());
        assert_eq!(serde_json::to_string(&failure).unwrap(), r#""-1000""#);
    }
}
