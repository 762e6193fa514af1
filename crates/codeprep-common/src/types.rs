//! Fragment and track types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The normalization track a fragment is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// General-purpose language code (Python)
    GeneralCode,
    /// Query language code (SQL)
    QueryCode,
    /// Natural-language query or context text
    NaturalLanguage,
}

/// Source language of a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Sql,
}

impl Language {
    /// Track used for the code field of a record in this language
    pub fn code_track(self) -> Track {
        match self {
            Language::Python => Track::GeneralCode,
            Language::Sql => Track::QueryCode,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Sql => write!(f, "sql"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "sql" | "sqlang" => Ok(Language::Sql),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Which natural-language field a text fragment came from
///
/// Queries go through the strict character filter, context text through the
/// loose one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Query,
    Context,
}

/// An immutable input string tagged with its track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub track: Track,
}

impl Fragment {
    pub fn new(text: impl Into<String>, track: Track) -> Self {
        Self {
            text: text.into(),
            track,
        }
    }

    pub fn python(text: impl Into<String>) -> Self {
        Self::new(text, Track::GeneralCode)
    }

    pub fn sql(text: impl Into<String>) -> Self {
        Self::new(text, Track::QueryCode)
    }

    pub fn natural_language(text: impl Into<String>) -> Self {
        Self::new(text, Track::NaturalLanguage)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
