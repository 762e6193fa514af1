//! # codeprep common
//!
//! Shared building blocks for the codeprep normalization engine.
//!
//! ## Contents
//!
//! - **Fragments**: the input unit, tagged with the track it belongs to
//! - **Normalized tokens**: the output unit, an ordered sequence of non-empty
//!   lowercase tokens
//! - **Failure values**: the fixed code sentinel and query error shapes
//! - **Cleanup**: the character filters and re-spacing helpers every field
//!   pipeline starts with
//! - **Configuration**: layered loading of batch settings

pub mod cleanup;
pub mod config;
pub mod error;
pub mod tokens;
pub mod types;

pub use config::{CodeprepConfig, ConfigLoader};
pub use error::{
    ConfigError, ConfigResult, NormalizeError, NormalizeResult, CODE_FAILURE_SENTINEL,
    MISSING_CONTEXT_MARKER,
};
pub use tokens::NormalizedTokens;
pub use types::{Fragment, Language, TextRole, Track};
