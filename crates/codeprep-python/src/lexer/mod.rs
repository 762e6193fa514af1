//! Tokenize-compatible Python lexer
//!
//! Produces the same token stream shape as CPython's `tokenize` module:
//! `NEWLINE` ends a logical line, `NL` a non-logical one, indentation
//! changes surface as `INDENT`/`DEDENT`, and the stream closes with
//! `ENDMARKER`. Positions are `(line, column)` pairs, zero-based, with
//! columns in bytes.
//!
//! Lexing runs in two stages:
//!
//! 1. Base tokenization ([`base`]): a logos lexer producing raw tokens with
//!    byte spans
//! 2. Layout: bracket depth decides between `NEWLINE` and `NL`, and the
//!    leading whitespace of every logical line is compared against the
//!    indentation stack to produce `INDENT`/`DEDENT`
//!
//! The lexer stops for good at the first error; callers that want to keep
//! going restart a fresh [`Lexer`] on the remaining input.

pub mod base;

use std::collections::VecDeque;
use std::ops::Range;

use logos::Logos;
use thiserror::Error;

use self::base::{RawError, RawToken};

const TAB_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Op,
    Newline,
    Nl,
    Comment,
    Indent,
    Dedent,
    EndMarker,
    ErrorToken,
}

impl TokenKind {
    /// Name `tokenize` uses for this kind
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Op => "OP",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndMarker => "ENDMARKER",
            TokenKind::ErrorToken => "ERRORTOKEN",
        }
    }
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Newline => TokenKind::Nl,
            RawToken::Comment => TokenKind::Comment,
            RawToken::Name => TokenKind::Name,
            RawToken::Number => TokenKind::Number,
            RawToken::String => TokenKind::String,
            RawToken::UnterminatedString => TokenKind::ErrorToken,
            RawToken::Open | RawToken::Close | RawToken::Op => TokenKind::Op,
        }
    }
}

/// A token borrowing its text from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyToken<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: (usize, usize),
    pub end: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("EOF in multi-line string starting at line {line}, column {column}")]
    UnterminatedTripleQuote { line: usize, column: usize },

    #[error("EOF in multi-line statement at line {line}")]
    UnclosedBracket { line: usize },

    #[error("unindent does not match any outer indentation level at line {line}")]
    InconsistentDedent { line: usize },
}

pub struct Lexer<'a> {
    src: &'a str,
    raw: logos::Lexer<'a, RawToken>,
    /// Byte offset of every physical line start
    line_starts: Vec<usize>,
    indents: Vec<usize>,
    depth: usize,
    at_line_start: bool,
    /// Byte offset where the current logical line begins
    line_begin: usize,
    logical_line_open: bool,
    pending: VecDeque<PyToken<'a>>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self {
            src,
            raw: RawToken::lexer(src),
            line_starts,
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            line_begin: 0,
            logical_line_open: false,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line, offset - line_start)
    }

    fn push(&mut self, kind: TokenKind, span: Range<usize>) {
        let start = self.line_col(span.start);
        let end = self.line_col(span.end);
        self.pending.push_back(PyToken {
            kind,
            text: &self.src[span],
            start,
            end,
        });
    }

    fn push_empty(&mut self, kind: TokenKind, offset: usize) {
        let at = self.line_col(offset);
        self.pending.push_back(PyToken {
            kind,
            text: "",
            start: at,
            end: at,
        });
    }

    /// Pull one raw token and queue what it turns into
    fn advance(&mut self) -> Result<(), LexError> {
        let Some(raw) = self.raw.next() else {
            return self.end_of_input();
        };
        let span = self.raw.span();

        match raw {
            Ok(RawToken::Newline) => self.line_break(span),
            Ok(RawToken::Comment) => self.push(TokenKind::Comment, span),
            Ok(RawToken::UnterminatedString) => {
                let (line, column) = self.open_token(span.start)?;
                return Err(LexError::UnterminatedString { line, column });
            }
            Err(RawError::UnterminatedTripleQuote) => {
                let (line, column) = self.open_token(span.start)?;
                return Err(LexError::UnterminatedTripleQuote { line, column });
            }
            Err(RawError::Unrecognized) => {
                self.open_token(span.start)?;
                self.push(TokenKind::ErrorToken, span);
            }
            Ok(token) => {
                self.open_token(span.start)?;
                match token {
                    RawToken::Open => self.depth += 1,
                    RawToken::Close => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                self.push(token.into(), span);
            }
        }
        Ok(())
    }

    fn line_break(&mut self, span: Range<usize>) {
        let kind = if self.depth == 0 && self.logical_line_open {
            self.logical_line_open = false;
            TokenKind::Newline
        } else {
            TokenKind::Nl
        };
        // tokenize reports line breaks as ending on their own line.
        let (line, column) = self.line_col(span.start);
        self.pending.push_back(PyToken {
            kind,
            text: &self.src[span.clone()],
            start: (line, column),
            end: (line, column + 1),
        });
        if self.depth == 0 {
            self.at_line_start = true;
            self.line_begin = span.end;
        }
    }

    /// Account for a significant token starting at `offset`
    fn open_token(&mut self, offset: usize) -> Result<(usize, usize), LexError> {
        if self.at_line_start {
            self.at_line_start = false;
            self.indentation(offset)?;
        }
        self.logical_line_open = true;
        Ok(self.line_col(offset))
    }

    /// Compare the logical line's leading whitespace with the indent stack
    fn indentation(&mut self, first_token: usize) -> Result<(), LexError> {
        let (width, len) = indent_width(&self.src[self.line_begin..first_token]);
        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, self.line_begin..self.line_begin + len);
        } else if width < current {
            while self.indents.last().is_some_and(|level| width < *level) {
                self.indents.pop();
                self.push_empty(TokenKind::Dedent, first_token);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(LexError::InconsistentDedent {
                    line: self.line_col(first_token).0,
                });
            }
        }
        Ok(())
    }

    fn end_of_input(&mut self) -> Result<(), LexError> {
        let end = self.src.len();
        if self.depth > 0 {
            return Err(LexError::UnclosedBracket {
                line: self.line_col(end).0,
            });
        }
        if self.logical_line_open {
            self.logical_line_open = false;
            self.push_empty(TokenKind::Newline, end);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push_empty(TokenKind::Dedent, end);
        }
        self.push_empty(TokenKind::EndMarker, end);
        self.finished = true;
        Ok(())
    }
}

/// Column width and byte length of the indentation opening `prefix`
fn indent_width(prefix: &str) -> (usize, usize) {
    let mut width = 0;
    let mut len = 0;
    for ch in prefix.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width = (width / TAB_SIZE + 1) * TAB_SIZE,
            '\x0c' => width = 0,
            _ => break,
        }
        len += ch.len_utf8();
    }
    (width, len)
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<PyToken<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.advance() {
                self.finished = true;
                self.pending.clear();
                return Some(Err(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds_and_texts(src: &str) -> Vec<(&'static str, String)> {
        Lexer::new(src)
            .map(|token| {
                let token = token.unwrap();
                (token.kind.name(), token.text.to_string())
            })
            .collect()
    }

    fn kinds(src: &str) -> Vec<&'static str> {
        kinds_and_texts(src).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_simple_statement() {
        let tokens = kinds_and_texts("x = 0.5 + f(y)");
        assert_eq!(
            tokens,
            vec![
                ("NAME", "x".into()),
                ("OP", "=".into()),
                ("NUMBER", "0.5".into()),
                ("OP", "+".into()),
                ("NAME", "f".into()),
                ("OP", "(".into()),
                ("NAME", "y".into()),
                ("OP", ")".into()),
                ("NEWLINE", "".into()),
                ("ENDMARKER", "".into()),
            ]
        );
    }

    #[test]
    fn test_indentation_blocks() {
        assert_eq!(
            kinds("if x:\n    y = 1\n\n# note\nz = 2\n"),
            vec![
                "NAME", "NAME", "OP", "NEWLINE", "INDENT", "NAME", "OP", "NUMBER", "NEWLINE", "NL",
                "COMMENT", "NL", "DEDENT", "NAME", "OP", "NUMBER", "NEWLINE", "ENDMARKER",
            ]
        );
    }

    #[test]
    fn test_open_blocks_close_at_end_of_input() {
        assert_eq!(
            kinds("def f():\n    if x:\n        return 1"),
            vec![
                "NAME", "NAME", "OP", "OP", "OP", "NEWLINE", "INDENT", "NAME", "NAME", "OP",
                "NEWLINE", "INDENT", "NAME", "NUMBER", "NEWLINE", "DEDENT", "DEDENT", "ENDMARKER",
            ]
        );
    }

    #[test]
    fn test_brackets_suppress_newlines() {
        assert_eq!(
            kinds("f(a,\n  b)\n"),
            vec!["NAME", "OP", "NAME", "OP", "NL", "NAME", "OP", "NEWLINE", "ENDMARKER"]
        );
    }

    #[test]
    fn test_continuation_joins_lines() {
        assert_eq!(
            kinds("x = 1 + \\\n    2\n"),
            vec!["NAME", "OP", "NUMBER", "OP", "NUMBER", "NEWLINE", "ENDMARKER"]
        );
    }

    #[test]
    fn test_strings_and_prefixes() {
        let tokens = kinds_and_texts("rb'\\x00' + \"\"\"a\nb\"\"\" + f\"{x}\"");
        let strings: Vec<String> = tokens
            .into_iter()
            .filter(|(kind, _)| *kind == "STRING")
            .map(|(_, text)| text)
            .collect();
        assert_eq!(strings, vec!["rb'\\x00'", "\"\"\"a\nb\"\"\"", "f\"{x}\""]);
    }

    #[test]
    fn test_numbers() {
        let numbers: Vec<String> = kinds_and_texts("0x1F 0o17 0b101 1_000 3.14e-2 2j .5")
            .into_iter()
            .filter(|(kind, _)| *kind == "NUMBER")
            .map(|(_, text)| text)
            .collect();
        assert_eq!(numbers, vec!["0x1F", "0o17", "0b101", "1_000", "3.14e-2", "2j", ".5"]);
    }

    #[test]
    fn test_unknown_character_is_error_token() {
        let tokens = kinds_and_texts("a $ b");
        assert_eq!(tokens[1], ("ERRORTOKEN", "$".into()));
    }

    #[test]
    fn test_positions() {
        let tokens: Vec<PyToken> = Lexer::new("ab = 1\ncd").map(Result::unwrap).collect();
        assert_eq!(tokens[0].start, (0, 0));
        assert_eq!(tokens[0].end, (0, 2));
        let newline = tokens.iter().find(|token| token.kind == TokenKind::Newline).unwrap();
        assert_eq!(newline.start, (0, 6));
        assert_eq!(newline.end, (0, 7));
        let cd = tokens.iter().find(|token| token.text == "cd").unwrap();
        assert_eq!(cd.start, (1, 0));
        assert_eq!(cd.end, (1, 2));
    }

    #[test]
    fn test_unterminated_string() {
        let results: Vec<_> = Lexer::new("x = 'abc\ny = 2").collect();
        assert!(matches!(
            results.last(),
            Some(Err(LexError::UnterminatedString { line: 0, column: 4 }))
        ));
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn test_unterminated_triple_quote() {
        let last = Lexer::new("s = '''abc\nmore").last();
        assert!(matches!(
            last,
            Some(Err(LexError::UnterminatedTripleQuote { line: 0, column: 4 }))
        ));
    }

    #[test]
    fn test_unclosed_bracket() {
        let last = Lexer::new("f(a,\n b").last();
        assert!(matches!(last, Some(Err(LexError::UnclosedBracket { line: 1 }))));
    }

    #[test]
    fn test_inconsistent_dedent() {
        let last = Lexer::new("if x:\n        a\n    b\n").last();
        assert!(matches!(last, Some(Err(LexError::InconsistentDedent { line: 2 }))));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds_and_texts(""), vec![("ENDMARKER", String::new())]);
    }

    #[test]
    fn test_indent_width_expands_tabs() {
        assert_eq!(indent_width("    x"), (4, 4));
        assert_eq!(indent_width("  \tx"), (8, 3));
        assert_eq!(indent_width("\\\n  x"), (0, 0));
    }

    #[test]
    fn test_stream_stops_after_first_error() {
        proptest!(|(src in "[a-z ='\"()\n]{0,40}")| {
            let results: Vec<_> = Lexer::new(&src).collect();
            let errors = results.iter().filter(|result| result.is_err()).count();
            prop_assert!(errors <= 1);
            if errors == 1 {
                prop_assert!(results.last().is_some_and(|result| result.is_err()));
            } else {
                prop_assert!(results
                    .last()
                    .is_some_and(|result| matches!(result, Ok(token) if token.kind == TokenKind::EndMarker)));
            }
        });
    }
}
