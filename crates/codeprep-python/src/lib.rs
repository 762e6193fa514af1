//! # codeprep python
//!
//! Normalization of Python fragments into canonical token sequences.
//!
//! ## Stages
//!
//! - **Transcript repair** ([`repair`]): strips IPython and REPL prompts and
//!   regroups the fragment into compilable blocks
//! - **Symbol resolution** ([`symbols`]): collects locally bound names from a
//!   tree-sitter parse, falling back to line heuristics when parsing fails
//! - **Lexing** ([`lexer`]): tokenize-compatible tokens from a logos base
//!   pass plus indentation and bracket layout
//! - **Tokenizing** ([`tokenizer`]): collapses literals and local names,
//!   recovering from lexer failures line by line
//! - **Pipeline** ([`pipeline`]): character filtering and final token cleanup

pub mod lexer;
pub mod pipeline;
pub mod repair;
pub mod symbols;
pub mod tokenizer;

pub use lexer::{LexError, Lexer, PyToken, TokenKind};
pub use pipeline::{normalize_code, PythonCode};
pub use repair::{repair, LineKind, RepairResult, RepairStrategy};
pub use symbols::{resolve, Resolution, SymbolSet};
pub use tokenizer::{analyze, tokenize, Analysis, CodeCategory, CodeToken, Tokenized};
