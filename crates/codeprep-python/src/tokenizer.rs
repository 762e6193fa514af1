//! Canonical token streams for Python fragments

use std::fmt;

use codeprep_common::cleanup::word_punct_split;
use codeprep_common::{NormalizeError, NormalizeResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexer::{Lexer, TokenKind};
use crate::symbols::{resolve, SymbolSet};

/// Category of an emitted code token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeCategory {
    Number,
    String,
    Newline,
    /// A locally bound identifier
    Var,
    /// Any other token, emitted with its surface text
    Literal,
}

impl CodeCategory {
    fn placeholder(self) -> Option<&'static str> {
        match self {
            CodeCategory::Number => Some("NUMBER"),
            CodeCategory::String => Some("STRING"),
            CodeCategory::Newline => Some("NEWLINE"),
            CodeCategory::Var => Some("VAR"),
            CodeCategory::Literal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeToken {
    pub category: CodeCategory,
    pub text: String,
}

impl CodeToken {
    fn placeholder(category: CodeCategory) -> Self {
        Self {
            category,
            text: category.placeholder().unwrap_or_default().to_string(),
        }
    }

    fn literal(text: impl Into<String>) -> Self {
        Self {
            category: CodeCategory::Literal,
            text: text.into(),
        }
    }
}

impl fmt::Display for CodeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Output of [`tokenize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<CodeToken>,
    /// Lexing hit an error and continued on the following lines
    pub lexing_recovered: bool,
}

/// Output of [`analyze`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub tokens: Vec<CodeToken>,
    /// Symbols came from the line heuristics rather than a full parse
    pub symbols_degraded: bool,
    pub lexing_recovered: bool,
}

impl Analysis {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|token| token.text.as_str())
    }
}

/// Resolve symbols and tokenize the original fragment
pub fn analyze(code: &str) -> NormalizeResult<Analysis> {
    let resolution = resolve(code);
    let tokenized = tokenize(code, &resolution.symbols)?;
    Ok(Analysis {
        tokens: tokenized.tokens,
        symbols_degraded: resolution.degraded,
        lexing_recovered: tokenized.lexing_recovered,
    })
}

/// Tokenize `code`, collapsing literals and the names in `symbols`
///
/// Leading characters are dropped until the lexer accepts the first token.
/// A lexer error mid-stream splits the rest of the failing line into
/// word/punctuation runs and restarts on the following lines.
pub fn tokenize(code: &str, symbols: &SymbolSet) -> NormalizeResult<Tokenized> {
    let mut source = skip_unlexable_prefix(code)?.to_string();
    let mut tokens = Vec::new();
    let mut lexing_recovered = false;

    loop {
        let mut last_end = None;
        let mut failure = None;

        for item in Lexer::new(&source) {
            match item {
                Ok(token) => {
                    last_end = Some(token.end);
                    if let Some(emitted) = emit(token.kind, token.text, symbols) {
                        tokens.push(emitted);
                    }
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let Some(err) = failure else {
            break;
        };
        lexing_recovered = true;
        debug!(error = %err, "lexer failed, recovering on following lines");

        let lines: Vec<&str> = source.split('\n').collect();
        let (line, column) = last_end.unwrap_or((0, 0));
        let Some(failed_line) = lines.get(line) else {
            break;
        };
        let remainder = failed_line.get(column..).unwrap_or_default();
        tokens.extend(word_punct_split(remainder).into_iter().map(CodeToken::literal));

        if line + 1 >= lines.len() {
            break;
        }
        let rest = lines[line + 1..].join("\n");
        source = rest;
    }

    Ok(Tokenized {
        tokens,
        lexing_recovered,
    })
}

fn emit(kind: TokenKind, text: &str, symbols: &SymbolSet) -> Option<CodeToken> {
    match kind {
        TokenKind::Number => Some(CodeToken::placeholder(CodeCategory::Number)),
        TokenKind::String => Some(CodeToken::placeholder(CodeCategory::String)),
        TokenKind::Newline => Some(CodeToken::placeholder(CodeCategory::Newline)),
        TokenKind::Comment | TokenKind::EndMarker => None,
        _ => {
            let candidate = text.trim();
            if candidate.is_empty() {
                None
            } else if symbols.contains(candidate) {
                Some(CodeToken::placeholder(CodeCategory::Var))
            } else {
                Some(CodeToken::literal(candidate))
            }
        }
    }
}

/// Drop leading characters until the first token lexes
fn skip_unlexable_prefix(code: &str) -> NormalizeResult<&str> {
    let mut rest = code;
    loop {
        if rest.is_empty() {
            return if code.is_empty() {
                Ok(rest)
            } else {
                debug!("no lexable prefix, fragment rejected");
                Err(NormalizeError::UnrecoverableCode)
            };
        }
        if matches!(Lexer::new(rest).next(), Some(Ok(_))) {
            return Ok(rest);
        }
        let mut chars = rest.chars();
        chars.next();
        rest = chars.as_str();
    }
}
