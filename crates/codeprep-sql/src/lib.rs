//! # codeprep sql
//!
//! Anonymization of SQL fragments.
//!
//! A fragment is sanitized, lexed with `sqlparser`'s tokenizer, grouped into
//! a tree of statement, parenthesis and function nodes, and walked in a
//! fixed order to classify every leaf. Tables and columns are then renamed
//! to positional placeholders (`tab0`, `col0`, ...) that restart for every
//! fragment.

pub mod anonymizer;
pub mod classify;
pub mod identifiers;
pub mod keywords;
pub mod pipeline;
pub mod sanitize;
pub mod strings;
pub mod tree;

pub use anonymizer::{anonymize, Anonymized, AnonymizerOptions, QueryAnonymizer, QueryToken};
pub use classify::QueryCategory;
pub use identifiers::IdentifierMap;
pub use pipeline::normalize_code;
pub use sanitize::sanitize;
