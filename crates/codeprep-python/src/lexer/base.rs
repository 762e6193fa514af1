//! Base tokenization
//!
//! A logos lexer over the raw source. It only knows character-level token
//! shapes and byte spans; line structure, indentation and bracket nesting
//! are added afterwards by [`super::Lexer`].
//!
//! Horizontal whitespace and backslash line continuations are skipped here,
//! so a physical line break inside a continuation never reaches the layout
//! pass.

use logos::Logos;

/// Failures the base pass can report for a span
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawError {
    /// No token shape matches; surfaces as an `ERRORTOKEN`
    #[default]
    Unrecognized,
    /// A triple-quoted string runs to the end of input
    UnterminatedTripleQuote,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\x0c\r]+")]
#[logos(skip r"\\\r?\n")]
pub enum RawToken {
    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*")]
    Comment,

    #[regex(r"[_a-zA-Z\x{80}-\x{10FFFF}][_a-zA-Z0-9\x{80}-\x{10FFFF}]*")]
    Name,

    #[regex(r"0[xX][0-9a-fA-F_]*")]
    #[regex(r"0[oO][0-7_]*")]
    #[regex(r"0[bB][01_]*")]
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9][0-9_]*)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[jJ]?")]
    Number,

    #[regex(r#"([rRuUbBfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?'([^'\\\n]|\\[^\n]|\\\n)*'"#)]
    #[regex(r#"([rRuUbBfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?"([^"\\\n]|\\[^\n]|\\\n)*""#)]
    #[regex(r#"([rRuUbBfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?('''|""")"#, triple_quoted)]
    String,

    /// Single-quoted string cut off by a line break or the end of input
    #[regex(r#"([rRuUbBfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?'([^'\\\n]|\\[^\n]|\\\n)*"#)]
    #[regex(r#"([rRuUbBfF]|[bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])?"([^"\\\n]|\\[^\n]|\\\n)*"#)]
    UnterminatedString,

    #[token("(")]
    #[token("[")]
    #[token("{")]
    Open,

    #[token(")")]
    #[token("]")]
    #[token("}")]
    Close,

    #[token("**=")]
    #[token("//=")]
    #[token(">>=")]
    #[token("<<=")]
    #[token("...")]
    #[token("->")]
    #[token(":=")]
    #[token("**")]
    #[token("//")]
    #[token(">>")]
    #[token("<<")]
    #[token("<=")]
    #[token(">=")]
    #[token("==")]
    #[token("!=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("@=")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("@")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("<")]
    #[token(">")]
    #[token(",")]
    #[token(":")]
    #[token(";")]
    #[token(".")]
    #[token("=")]
    Op,
}

/// Consume a triple-quoted body up to and including its closing delimiter
fn triple_quoted(lex: &mut logos::Lexer<'_, RawToken>) -> Result<(), RawError> {
    let delimiter = if lex.slice().ends_with('"') { "\"\"\"" } else { "'''" };
    let rest = lex.remainder();

    let mut chars = rest.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if rest[idx..].starts_with(delimiter) {
            lex.bump(idx + delimiter.len());
            return Ok(());
        }
    }

    lex.bump(rest.len());
    Err(RawError::UnterminatedTripleQuote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(src: &str) -> Vec<(Result<RawToken, RawError>, &str)> {
        let mut lex = RawToken::lexer(src);
        let mut out = Vec::new();
        while let Some(token) = lex.next() {
            out.push((token, lex.slice()));
        }
        out
    }

    #[test]
    fn test_whitespace_and_continuations_are_skipped() {
        assert_eq!(
            raw("a \\\n  + b"),
            vec![
                (Ok(RawToken::Name), "a"),
                (Ok(RawToken::Op), "+"),
                (Ok(RawToken::Name), "b"),
            ]
        );
    }

    #[test]
    fn test_string_prefix_is_part_of_the_literal() {
        assert_eq!(raw("rb'x'"), vec![(Ok(RawToken::String), "rb'x'")]);
        assert_eq!(raw("rb x"), vec![(Ok(RawToken::Name), "rb"), (Ok(RawToken::Name), "x")]);
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        assert_eq!(raw(r#""a\"b""#), vec![(Ok(RawToken::String), r#""a\"b""#)]);
    }

    #[test]
    fn test_line_break_cuts_short_string() {
        let tokens = raw("'abc\n");
        assert_eq!(tokens[0], (Ok(RawToken::UnterminatedString), "'abc"));
    }

    #[test]
    fn test_triple_quote_spans_lines() {
        assert_eq!(raw("'''a\n'b'''"), vec![(Ok(RawToken::String), "'''a\n'b'''")]);
        assert_eq!(
            raw("\"\"\"open"),
            vec![(Err(RawError::UnterminatedTripleQuote), "\"\"\"open")]
        );
    }

    #[test]
    fn test_brackets_are_distinguished() {
        let kinds: Vec<_> = raw("f(x[0])").into_iter().map(|(token, _)| token).collect();
        assert_eq!(
            kinds,
            vec![
                Ok(RawToken::Name),
                Ok(RawToken::Open),
                Ok(RawToken::Name),
                Ok(RawToken::Open),
                Ok(RawToken::Number),
                Ok(RawToken::Close),
                Ok(RawToken::Close),
            ]
        );
    }
}
