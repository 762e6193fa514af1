//! Per-record normalization

use std::sync::Arc;

use codeprep_common::{
    CodeprepConfig, Fragment, Language, NormalizeResult, NormalizedTokens, Track,
    MISSING_CONTEXT_MARKER,
};
use codeprep_text::{NlpContext, TextNormalizer};
use tracing::debug;

use crate::error::CliResult;
use crate::record::{CodeField, InputRecord, OutputRecord};

/// Routes every field of a record through its track
#[derive(Debug, Clone)]
pub struct Pipeline {
    language: Language,
    text: TextNormalizer,
    detailed_strings: bool,
}

/// Normalized code plus the diagnostic flags raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeOutcome {
    pub result: NormalizeResult<NormalizedTokens>,
    pub symbols_degraded: bool,
    pub lexing_recovered: bool,
}

/// Output record plus what the batch summary needs to know about it
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRecord {
    pub output: OutputRecord,
    pub failure: Option<&'static str>,
    pub symbols_degraded: bool,
    pub lexing_recovered: bool,
}

impl Pipeline {
    pub fn new(language: Language, text: TextNormalizer, detailed_strings: bool) -> Self {
        Self {
            language,
            text,
            detailed_strings,
        }
    }

    /// Build the lexical context once from `config`
    pub fn from_config(language: Language, config: &CodeprepConfig) -> CliResult<Self> {
        let context = match &config.wordnet_dir {
            Some(dir) => NlpContext::from_wordnet_dir(dir)?,
            None => NlpContext::builtin(),
        };
        debug!(?context, %language, "pipeline ready");
        Ok(Self::new(
            language,
            TextNormalizer::new(Arc::new(context)),
            config.detailed_strings,
        ))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Normalize a single fragment along its track
    pub fn normalize(&self, fragment: &Fragment) -> NormalizeResult<NormalizedTokens> {
        match fragment.track {
            Track::GeneralCode => {
                codeprep_python::normalize_code(fragment.as_str()).map(|code| code.tokens)
            }
            Track::QueryCode => {
                codeprep_sql::normalize_code(fragment.as_str(), self.detailed_strings)
            }
            Track::NaturalLanguage => Ok(self.text.normalize(fragment.as_str())),
        }
    }

    /// Code field in the pipeline's language
    pub fn code(&self, code: &str) -> CodeOutcome {
        match self.language {
            Language::Python => match codeprep_python::normalize_code(code) {
                Ok(normalized) => CodeOutcome {
                    result: Ok(normalized.tokens),
                    symbols_degraded: normalized.symbols_degraded,
                    lexing_recovered: normalized.lexing_recovered,
                },
                Err(err) => CodeOutcome {
                    result: Err(err),
                    symbols_degraded: false,
                    lexing_recovered: false,
                },
            },
            Language::Sql => CodeOutcome {
                result: codeprep_sql::normalize_code(code, self.detailed_strings),
                symbols_degraded: false,
                lexing_recovered: false,
            },
        }
    }

    /// Context text; the missing-context marker passes through untouched
    pub fn context(&self, text: &str) -> NormalizedTokens {
        if text == MISSING_CONTEXT_MARKER {
            NormalizedTokens::marker(MISSING_CONTEXT_MARKER)
        } else {
            self.text.context_tokens(text)
        }
    }

    pub fn query(&self, text: &str) -> NormalizedTokens {
        self.text.query_tokens(text)
    }

    pub fn process_record(&self, record: &InputRecord) -> ProcessedRecord {
        let code = self.code(&record.code);
        let failure = code.result.as_ref().err().map(|err| {
            debug!(qid = %record.qid, error = %err, "code normalization failed");
            err.kind()
        });

        let output = OutputRecord {
            qid: record.qid.clone(),
            context: record.context.iter().map(|text| self.context(text)).collect(),
            code: CodeField::from(code.result),
            query: self.query(&record.query),
        };

        ProcessedRecord {
            output,
            failure,
            symbols_degraded: code.symbols_degraded,
            lexing_recovered: code.lexing_recovered,
        }
    }
}
