//! Normalized token sequences

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Ordered sequence of lowercase, non-empty tokens
///
/// Every constructor funnels through [`FromIterator`], which trims each
/// element, splits it on interior whitespace, lowercases it and drops what is
/// left empty. A `NormalizedTokens` therefore never holds an empty or
/// whitespace-bearing element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedTokens(Vec<String>);

impl NormalizedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-element sequence, used for marker values passed through verbatim
    pub fn marker(value: &str) -> Self {
        Self(vec![value.to_string()])
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Keep only tokens matching `keep`
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&String) -> bool,
    {
        self.0.retain(keep);
    }

    /// Tokens joined by single spaces
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl<S: AsRef<str>> FromIterator<S> for NormalizedTokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let tokens = iter
            .into_iter()
            .flat_map(|item| {
                item.as_ref()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self(tokens)
    }
}

impl Deref for NormalizedTokens {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for NormalizedTokens {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NormalizedTokens {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for NormalizedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}
