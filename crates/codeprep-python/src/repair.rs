//! Interactive-session transcript repair
//!
//! Fragments copied out of IPython or the standard REPL carry prompt
//! markers and echoed output. Each line is classified against the known
//! prompt shapes, the sequence of classifications picks a strategy, and a
//! separate pass groups lines into sub-blocks wherever the marker status
//! flips.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

const PROMPT_SOURCES: [&str; 5] = [
    r"In ?\[\d+]: ?",
    r"Out ?\[\d+]: ?",
    r"( )+\.+: ?",
    r">>> ?",
    r"\.\.\. ?",
];

lazy_static! {
    static ref LINE_PROMPTS: Vec<Regex> = PROMPT_SOURCES
        .iter()
        .map(|source| Regex::new(&format!("^(?:{source})")).unwrap())
        .collect();
    static ref ANY_PROMPT: Vec<Regex> = PROMPT_SOURCES
        .iter()
        .map(|source| Regex::new(source).unwrap())
        .collect();
    static ref STRUCTURED_SHAPE: Regex = Regex::new(r"^(?:(?:0*1+3*2*0*)+|(?:0*4+5*0*)+)").unwrap();
}

/// What a single line looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Ordinary,
    /// `In [n]:`
    SessionInput,
    /// `Out[n]:`
    SessionOutput,
    /// `   ...:`
    SessionContinuation,
    /// `>>>`
    ReplInput,
    /// `...`
    ReplContinuation,
}

impl LineKind {
    const MARKERS: [LineKind; 5] = [
        LineKind::SessionInput,
        LineKind::SessionOutput,
        LineKind::SessionContinuation,
        LineKind::ReplInput,
        LineKind::ReplContinuation,
    ];

    /// First prompt shape the line starts with
    pub fn classify(line: &str) -> Self {
        Self::MARKERS
            .iter()
            .zip(LINE_PROMPTS.iter())
            .find(|(_, prompt)| prompt.is_match(line))
            .map(|(kind, _)| *kind)
            .unwrap_or(LineKind::Ordinary)
    }

    pub fn is_marker(self) -> bool {
        self != LineKind::Ordinary
    }

    /// Digit used in the classification string
    pub fn code(self) -> char {
        match self {
            LineKind::Ordinary => '0',
            LineKind::SessionInput => '1',
            LineKind::SessionOutput => '2',
            LineKind::SessionContinuation => '3',
            LineKind::ReplInput => '4',
            LineKind::ReplContinuation => '5',
        }
    }

    /// Remove every occurrence of this kind's prompt from `line`
    fn strip(self, line: &str) -> String {
        match self.prompt_index() {
            Some(idx) => ANY_PROMPT[idx].replace_all(line, "").into_owned(),
            None => line.to_string(),
        }
    }

    fn prompt_index(self) -> Option<usize> {
        Self::MARKERS.iter().position(|kind| *kind == self)
    }
}

/// How a fragment was repaired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStrategy {
    /// No prompt markers; text returned as is
    Unchanged,
    /// Classification matched a clean session or REPL shape
    Structured,
    /// Prompts stripped and echoed output dropped
    Generic,
}

/// Repaired text plus the sub-blocks the input splits into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairResult {
    pub text: String,
    pub blocks: Vec<String>,
    pub strategy: RepairStrategy,
}

/// Classify every line of `code`
pub fn classify_lines(code: &str) -> Vec<LineKind> {
    code.split('\n').map(LineKind::classify).collect()
}

/// The classification as a digit string, e.g. `1120`
pub fn classification_string(kinds: &[LineKind]) -> String {
    kinds.iter().map(|kind| kind.code()).collect()
}

/// Strip interactive-session artifacts from `code`
///
/// Never fails. Marker-free input comes back unchanged with a single
/// trimmed block.
pub fn repair(code: &str) -> RepairResult {
    let lines: Vec<&str> = code.split('\n').collect();
    let kinds: Vec<LineKind> = lines.iter().map(|line| LineKind::classify(line)).collect();

    if !kinds.iter().any(|kind| kind.is_marker()) {
        let trimmed = code.trim();
        let blocks = if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
        return RepairResult {
            text: code.to_string(),
            blocks,
            strategy: RepairStrategy::Unchanged,
        };
    }

    let shape = classification_string(&kinds);
    if STRUCTURED_SHAPE.is_match(&shape) {
        let result = structured_repair(&lines, &kinds);
        if !result.text.trim().is_empty() {
            debug!(%shape, "structured transcript repair");
            return result;
        }
    }

    debug!(%shape, "generic transcript repair");
    generic_repair(&lines, &kinds)
}

fn structured_repair(lines: &[&str], kinds: &[LineKind]) -> RepairResult {
    let mut text = String::new();
    let mut blocks = BlockGrouper::default();

    let leading = kinds.iter().take_while(|kind| !kind.is_marker()).count();
    for line in &lines[..leading] {
        text.push_str(line);
        text.push('\n');
    }
    blocks.close_with(&text);

    for idx in leading..lines.len() {
        let kind = kinds[idx];
        let boundary = idx > 0 && kinds[idx - 1].is_marker() != kind.is_marker();
        let line = kind.strip(lines[idx]);
        text.push_str(&line);
        text.push('\n');
        blocks.push(&line, boundary);
    }

    RepairResult {
        text,
        blocks: blocks.finish(),
        strategy: RepairStrategy::Structured,
    }
}

fn generic_repair(lines: &[&str], kinds: &[LineKind]) -> RepairResult {
    let mut text = String::new();
    let mut blocks = BlockGrouper::default();
    let mut after_output = false;

    for (idx, (line, kind)) in lines.iter().zip(kinds).enumerate() {
        let boundary = idx > 0 && kinds[idx - 1].is_marker() != kind.is_marker();
        let line = kind.strip(line);
        if kind.is_marker() {
            after_output = *kind == LineKind::SessionOutput;
            text.push_str(&line);
            text.push('\n');
        } else if !after_output {
            text.push_str(&line);
            text.push('\n');
        }
        blocks.push(&line, boundary);
    }

    RepairResult {
        text,
        blocks: blocks.finish(),
        strategy: RepairStrategy::Generic,
    }
}

/// Accumulates lines into trimmed, non-blank sub-blocks
#[derive(Default)]
struct BlockGrouper {
    blocks: Vec<String>,
    current: String,
}

impl BlockGrouper {
    fn push(&mut self, line: &str, boundary: bool) {
        if boundary {
            self.flush();
        }
        self.current.push_str(line);
        self.current.push('\n');
    }

    /// Emit `block` as its own sub-block, independent of the running one
    fn close_with(&mut self, block: &str) {
        let trimmed = block.trim();
        if !trimmed.is_empty() {
            self.blocks.push(trimmed.to_string());
        }
    }

    fn flush(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.close_with(&current);
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_lines() {
        let kinds = classify_lines("In [1]: x\n   ...: y\nOut[1]: 2\n>>> z\n... w\nplain");
        assert_eq!(classification_string(&kinds), "132450");
    }

    #[test]
    fn test_marker_free_fragment_is_unchanged() {
        let code = "\n  x = 1\ny = x\n";
        let result = repair(code);
        assert_eq!(result.text, code);
        assert_eq!(result.blocks, vec!["x = 1\ny = x"]);
        assert_eq!(result.strategy, RepairStrategy::Unchanged);
    }

    #[test]
    fn test_ipython_session() {
        let result = repair("In [1]: x = 1\nIn [2]: x + 1\nOut[2]: 2\n");
        assert_eq!(result.strategy, RepairStrategy::Structured);
        assert_eq!(result.text, "x = 1\nx + 1\n2\n\n");
        assert_eq!(result.blocks, vec!["x = 1\nx + 1\n2"]);
    }

    #[test]
    fn test_repl_session_splits_output_block() {
        let result = repair(">>> for i in range(3):\n...     print(i)\n0\n1\n2");
        assert_eq!(result.strategy, RepairStrategy::Structured);
        assert_eq!(result.text, "for i in range(3):\n    print(i)\n0\n1\n2\n");
        assert_eq!(result.blocks, vec!["for i in range(3):\n    print(i)", "0\n1\n2"]);
    }

    #[test]
    fn test_leading_ordinary_lines_form_first_block() {
        let result = repair("import os\n>>> os.getcwd()\n'/tmp'");
        assert_eq!(result.strategy, RepairStrategy::Structured);
        assert_eq!(result.text, "import os\nos.getcwd()\n'/tmp'\n");
        assert_eq!(result.blocks, vec!["import os", "os.getcwd()", "'/tmp'"]);
    }

    #[test]
    fn test_generic_repair_drops_stale_output() {
        // Lossy: the ordinary line after `Out` vanishes from the text but
        // survives in the sub-blocks.
        let result = repair("Out[1]: 5\nstale\nIn [2]: y = 2");
        assert_eq!(result.strategy, RepairStrategy::Generic);
        assert_eq!(result.text, "5\ny = 2\n");
        assert_eq!(result.blocks, vec!["5", "stale", "y = 2"]);
    }

    #[test]
    fn test_all_prompt_occurrences_are_removed() {
        let result = repair(">>> a = '>>> '");
        assert_eq!(result.text, "a = ''\n");
    }

    #[test]
    fn test_blocks_preserve_line_order() {
        let code = "x = 1\n>>> y = 2\n... z = 3\nout\n>>> w";
        let result = repair(code);
        let joined = result.blocks.join("\n");
        let order: Vec<&str> = ["x = 1", "y = 2", "z = 3", "out", "w"].to_vec();
        let mut last = 0;
        for piece in order {
            let found = joined[last..].find(piece).map(|pos| pos + last);
            assert!(found.is_some(), "{piece} missing or out of order");
            last = found.unwrap_or(last);
        }
    }

    #[test]
    fn test_one_classification_code_per_line() {
        proptest!(|(lines in prop::collection::vec("[a-zA-Z>. \\[\\]0-9:]{0,10}", 0..8))| {
            let code = lines.join("\n");
            let kinds = classify_lines(&code);
            prop_assert_eq!(classification_string(&kinds).len(), code.split('\n').count());
            let result = repair(&code);
            prop_assert!(result.blocks.iter().all(|block| !block.trim().is_empty()));
        });
    }
}
