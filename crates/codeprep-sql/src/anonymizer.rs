//! Query anonymization
//!
//! Sanitizes a fragment, builds and classifies its tree, then flattens the
//! leaves in source order while replacing literals with fixed codes and
//! tables/columns with positional placeholders. Tables named in `from`
//! clauses are numbered before any other table reference, so a qualifier
//! alias used in the select list never takes `tab0` from the table itself.

use std::fmt;

use codeprep_common::NormalizeResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify, QueryCategory};
use crate::identifiers::IdentifierMap;
use crate::keywords::TABLE_SCOPE_CLOSERS;
use crate::sanitize::sanitize;
use crate::strings::regex_shape;
use crate::tree::{self, Leaf};

/// Replacement for string literals outside detailed mode
pub const STRING_CODE: &str = "CODSTR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizerOptions {
    /// Describe string literals by their regex shape instead of `CODSTR`
    pub detailed_strings: bool,
    /// Replace tables and columns with `tabN` / `colN`
    pub rename: bool,
}

impl Default for AnonymizerOptions {
    fn default() -> Self {
        Self {
            detailed_strings: false,
            rename: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryToken {
    pub category: QueryCategory,
    pub text: String,
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Flattened tokens plus the placeholders assigned while producing them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anonymized {
    pub tokens: Vec<QueryToken>,
    pub identifiers: IdentifierMap,
}

impl Anonymized {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|token| token.text.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryAnonymizer {
    options: AnonymizerOptions,
}

impl QueryAnonymizer {
    pub fn new(options: AnonymizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AnonymizerOptions {
        self.options
    }

    /// Anonymize one fragment
    ///
    /// Fails with [`codeprep_common::NormalizeError::Query`] when the
    /// fragment does not lex.
    pub fn anonymize(&self, sql: &str) -> NormalizeResult<Anonymized> {
        let sanitized = sanitize(sql);
        let mut root = tree::parse(&sanitized).inspect_err(|err| {
            debug!(error = %err, "sql fragment rejected by the lexer");
        })?;
        classify(&mut root);

        let leaves = root.leaves();
        let mut identifiers = IdentifierMap::new();
        if self.options.rename {
            register_from_tables(&leaves, &mut identifiers);
        }
        let mut tokens = Vec::new();

        for leaf in leaves {
            let category = leaf.category;
            match category {
                QueryCategory::String => {
                    let replaced = if self.options.detailed_strings {
                        regex_shape(&leaf.text)
                    } else {
                        STRING_CODE.to_string()
                    };
                    tokens.extend(replaced.split_whitespace().map(|part| QueryToken {
                        category,
                        text: part.to_string(),
                    }));
                }
                QueryCategory::Table if self.options.rename => tokens.push(QueryToken {
                    category,
                    text: identifiers.table(&leaf.text),
                }),
                QueryCategory::Column if self.options.rename => tokens.push(QueryToken {
                    category,
                    text: identifiers.column(&leaf.text),
                }),
                _ => tokens.push(QueryToken {
                    category,
                    text: category
                        .literal_code()
                        .map(str::to_string)
                        .unwrap_or_else(|| leaf.text.clone()),
                }),
            }
        }

        Ok(Anonymized {
            tokens,
            identifiers,
        })
    }
}

/// Number the tables of every `from` clause in source order
fn register_from_tables(leaves: &[&Leaf], identifiers: &mut IdentifierMap) {
    let mut in_from = false;
    for leaf in leaves {
        if leaf.is_keyword("from") {
            in_from = true;
        } else if TABLE_SCOPE_CLOSERS.iter().any(|word| leaf.is_keyword(word)) {
            in_from = false;
        } else if in_from && leaf.category == QueryCategory::Table {
            identifiers.table(&leaf.text);
        }
    }
}

/// Anonymize with the default options
pub fn anonymize(sql: &str) -> NormalizeResult<Anonymized> {
    QueryAnonymizer::default().anonymize(sql)
}
