//! Sharded parallel processing of corpus records

use std::collections::BTreeMap;

use codeprep_common::CodeprepConfig;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CliResult;
use crate::pipeline::{Pipeline, ProcessedRecord};
use crate::record::{InputRecord, OutputRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub shard_size: usize,
    /// 0 lets rayon pick one thread per core
    pub threads: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            shard_size: 1000,
            threads: 0,
        }
    }
}

impl From<&CodeprepConfig> for BatchOptions {
    fn from(config: &CodeprepConfig) -> Self {
        Self {
            shard_size: config.shard_size,
            threads: config.threads,
        }
    }
}

/// Counters reported once a batch finishes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub records: usize,
    /// Code failures by [`codeprep_common::NormalizeError::kind`]
    pub code_failures: BTreeMap<&'static str, usize>,
    pub symbols_degraded: usize,
    pub lexing_recovered: usize,
}

impl BatchStats {
    fn observe(&mut self, processed: &ProcessedRecord) {
        self.records += 1;
        if let Some(kind) = processed.failure {
            *self.code_failures.entry(kind).or_default() += 1;
        }
        self.symbols_degraded += usize::from(processed.symbols_degraded);
        self.lexing_recovered += usize::from(processed.lexing_recovered);
    }

    fn merge(&mut self, other: BatchStats) {
        self.records += other.records;
        for (kind, count) in other.code_failures {
            *self.code_failures.entry(kind).or_default() += count;
        }
        self.symbols_degraded += other.symbols_degraded;
        self.lexing_recovered += other.lexing_recovered;
    }

    pub fn failures(&self) -> usize {
        self.code_failures.values().sum()
    }

    /// Emit the summary at `info`
    pub fn log_summary(&self, skipped_lines: usize) {
        info!(
            records = self.records,
            code_failures = self.failures(),
            symbols_degraded = self.symbols_degraded,
            lexing_recovered = self.lexing_recovered,
            skipped_lines,
            "batch complete"
        );
        for (kind, count) in &self.code_failures {
            info!(kind, count, "code failures");
        }
    }
}

/// Normalizes records shard by shard on a dedicated pool
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pipeline: Pipeline,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(pipeline: Pipeline, options: BatchOptions) -> Self {
        Self { pipeline, options }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Process every record; output order equals input order
    pub fn run(&self, records: &[InputRecord]) -> CliResult<(Vec<OutputRecord>, BatchStats)> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()?;
        let shard_size = self.options.shard_size.max(1);
        debug!(
            records = records.len(),
            shard_size,
            threads = pool.current_num_threads(),
            "starting batch"
        );

        let shards: Vec<(Vec<OutputRecord>, BatchStats)> = pool.install(|| {
            records
                .par_chunks(shard_size)
                .map(|shard| self.run_shard(shard))
                .collect()
        });

        let mut outputs = Vec::with_capacity(records.len());
        let mut stats = BatchStats::default();
        for (shard_outputs, shard_stats) in shards {
            outputs.extend(shard_outputs);
            stats.merge(shard_stats);
        }
        Ok((outputs, stats))
    }

    fn run_shard(&self, shard: &[InputRecord]) -> (Vec<OutputRecord>, BatchStats) {
        let mut stats = BatchStats::default();
        let outputs = shard
            .iter()
            .map(|record| {
                let processed = self.pipeline.process_record(record);
                stats.observe(&processed);
                processed.output
            })
            .collect();
        (outputs, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeprep_common::Language;
    use codeprep_text::TextNormalizer;

    fn record(qid: usize, code: &str) -> InputRecord {
        InputRecord {
            qid: serde_json::json!(qid),
            context: vec!["-10000".to_string(), "see above".to_string()],
            code: code.to_string(),
            query: "how to sum values".to_string(),
        }
    }

    fn runner(language: Language, shard_size: usize) -> BatchRunner {
        BatchRunner::new(
            Pipeline::new(language, TextNormalizer::builtin(), true),
            BatchOptions {
                shard_size,
                threads: 2,
            },
        )
    }

    #[test]
    fn test_order_is_preserved_across_shards() {
        let records: Vec<InputRecord> = (0..25).map(|qid| record(qid, "x = 1")).collect();
        let (outputs, stats) = runner(Language::Python, 4).run(&records).unwrap();
        let qids: Vec<serde_json::Value> = outputs.iter().map(|out| out.qid.clone()).collect();
        let expected: Vec<serde_json::Value> = (0..25).map(|qid| serde_json::json!(qid)).collect();
        assert_eq!(qids, expected);
        assert_eq!(stats.records, 25);
        assert_eq!(stats.failures(), 0);
    }

    #[test]
    fn test_failures_are_counted_by_kind() {
        let records = vec![
            record(1, "select a from t"),
            record(2, "select 'open from t"),
            record(3, "select 'again"),
        ];
        let (outputs, stats) = runner(Language::Sql, 1).run(&records).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(!outputs[0].code.is_failure());
        assert_eq!(stats.code_failures.get("query"), Some(&2));
        assert_eq!(stats.failures(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let (outputs, stats) = runner(Language::Python, 10).run(&[]).unwrap();
        assert!(outputs.is_empty());
        assert_eq!(stats, BatchStats::default());
    }
}
