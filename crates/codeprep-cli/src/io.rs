//! JSON Lines input and output

use std::io::{BufRead, Write};

use tracing::warn;

use crate::error::CliResult;
use crate::record::{InputRecord, OutputRecord};

/// Parsed records plus the number of malformed lines that were skipped
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub records: Vec<InputRecord>,
    pub skipped: usize,
}

/// Read one record per line; blank lines are ignored, malformed ones skipped
pub fn read_records<R: BufRead>(reader: R) -> CliResult<ReadOutcome> {
    let mut outcome = ReadOutcome::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InputRecord>(&line) {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                warn!(line = idx + 1, error = %err, "skipping malformed record");
                outcome.skipped += 1;
            }
        }
    }
    Ok(outcome)
}

pub fn write_records<W: Write>(mut writer: W, records: &[OutputRecord]) -> CliResult<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CodeField;
    use codeprep_common::NormalizedTokens;

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = concat!(
            r#"{"qid": 1, "context": ["a", "b"], "code": "x", "query": "q"}"#,
            "\n\nnot json\n",
            r#"{"qid": 2, "code": "y"}"#,
            "\n",
            r#"{"qid": 3, "context": [], "code": "z", "query": "r"}"#,
        );
        let outcome = read_records(input.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.records[1].qid, serde_json::json!(3));
    }

    #[test]
    fn test_write_one_record_per_line() {
        let record = OutputRecord {
            qid: serde_json::json!("q"),
            context: vec![NormalizedTokens::marker("-10000")],
            code: CodeField::Failure("-1000".to_string()),
            query: ["how"].into_iter().collect(),
        };
        let mut buffer = Vec::new();
        write_records(&mut buffer, &[record.clone(), record]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"qid":"q","context":[["-10000"]],"code":"-1000","query":["how"]}"#
        );
    }
}
