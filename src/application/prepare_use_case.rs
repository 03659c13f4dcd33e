// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates the full data-preparation pipeline in order:
//
//   Step 1: Load phrase-pair records      (Layer 4 - data)
//   Step 2: Load vocabularies + indexes   (Layer 5 - infra)
//   Step 3: Load the pinned tokenizer     (Layer 5 - infra)
//   Step 4: Build the training dataset    (Layer 4 - data)
//   Step 5: Write the coverage report     (Layer 5 - infra)
//   Step 6: Drive the DataLoader          (Layer 4 - data)
//
// Step 6 exists so a prepared corpus can be validated end to
// end — every batch is materialized once with the same batcher
// the (external) training loop would use, and the resulting
// shapes are reported back.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use burn::data::dataloader::DataLoaderBuilder;
use burn::data::dataset::Dataset;

use crate::data::{
    batcher::{EvalBatcher, RetrievalConfig, TrainingBatcher},
    dataset::TrainingDataset,
    encoder::{TextEncoder, DEFAULT_MAX_SEQ_LEN},
    loader::JsonRecordLoader,
};
use crate::domain::language::Language;
use crate::domain::record::Record;
use crate::domain::traits::RecordSource;
use crate::infra::{
    index_store::IndexStore,
    report::{CoverageReport, LanguageCoverage},
    tokenizer_store::TokenizerStore,
};

// Data preparation runs on CPU; the batchers stay generic over
// the backend so the training side can use its own device.
type PipelineBackend = burn::backend::NdArray;

// ─── Prepare Configuration ───────────────────────────────────────────────────
/// Everything a preparation run needs. Serializable so a run's
/// configuration can be saved next to its coverage report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub records_path:   String,
    pub index_dir:      String,
    pub tokenizer_path: String,
    pub report_dir:     String,
    pub max_seq_length: usize,
    pub batch_size:     usize,

    /// Some(k) switches to evaluation batches, which carry the
    /// retrieval configuration {index_dir, k} through unchanged
    pub eval_k: Option<usize>,

    /// Shuffle seed for the DataLoader; None keeps record order
    pub shuffle_seed: Option<u64>,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            records_path:   "data/filtered/train.json".to_string(),
            index_dir:      "models/index".to_string(),
            tokenizer_path: "models/tokenizer.json".to_string(),
            report_dir:     "reports".to_string(),
            max_seq_length: DEFAULT_MAX_SEQ_LEN,
            batch_size:     128,
            eval_k:         None,
            shuffle_seed:   None,
        }
    }
}

/// What a preparation run produced, for reporting.
#[derive(Debug, Clone)]
pub struct PrepareSummary {
    pub records:       usize,
    pub items:         usize,
    pub unresolved:    usize,
    pub batches:       usize,
    pub seq_len:       usize,
    pub embedding_dim: usize,
    pub coverage:      Vec<LanguageCoverage>,
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Execute the full preparation pipeline end to end.
    pub fn execute(&self) -> Result<PrepareSummary> {
        let cfg = &self.config;

        // ── Step 1: Load records ─────────────────────────────────────────────
        let records = JsonRecordLoader::new(&cfg.records_path).load_all()?;

        // ── Step 2: Load artifacts for the languages in use ──────────────────
        // Only languages that actually occur as a target need a
        // vocabulary/index pair; a missing pair for one of those
        // is still fatal.
        let target_langs = distinct_target_langs(&records);
        let indexes = IndexStore::load_for(PathBuf::from(&cfg.index_dir).as_path(), &target_langs)?;

        // ── Step 3: Load the pinned tokenizer ────────────────────────────────
        let tokenizer = TokenizerStore::new(&cfg.tokenizer_path).load()?;
        let encoder   = Arc::new(TextEncoder::new(tokenizer, cfg.max_seq_length)?);

        // ── Step 4: Build the training dataset ───────────────────────────────
        let dataset = TrainingDataset::new(records, &indexes, encoder)?;

        // ── Step 5: Coverage report + run config ─────────────────────────────
        let report   = CoverageReport::new(&cfg.report_dir)?;
        let coverage = log_coverage(&report, &dataset)?;

        // The exact configuration lands next to the coverage CSV
        // so a report is reproducible later.
        let config_path = PathBuf::from(&cfg.report_dir).join("prepare_config.json");
        std::fs::write(&config_path, serde_json::to_string_pretty(cfg)?)?;

        let records_total = dataset.num_records();
        let items         = dataset.len();
        let unresolved    = dataset.unresolved().len();
        let embedding_dim = dataset.embedding_dim();

        // ── Step 6: Materialize every batch once ─────────────────────────────
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let batches = match cfg.eval_k {
            None => {
                let batcher = TrainingBatcher::<PipelineBackend>::new(device);
                let mut builder = DataLoaderBuilder::new(batcher)
                    .batch_size(cfg.batch_size)
                    .num_workers(1);
                if let Some(seed) = cfg.shuffle_seed {
                    builder = builder.shuffle(seed);
                }
                let loader = builder.build(dataset);

                let mut count = 0usize;
                for batch in loader.iter() {
                    tracing::debug!(
                        "Batch {}: input_ids {:?}, targets {:?}",
                        count,
                        batch.input_ids.dims(),
                        batch.targets.dims()
                    );
                    count += 1;
                }
                count
            }
            Some(k) => {
                let retrieval = RetrievalConfig {
                    index_dir: PathBuf::from(&cfg.index_dir),
                    k,
                };
                let batcher = EvalBatcher::<PipelineBackend>::new(device, retrieval);
                // Evaluation keeps record order — no shuffle
                let loader = DataLoaderBuilder::new(batcher)
                    .batch_size(cfg.batch_size)
                    .num_workers(1)
                    .build(dataset);

                let mut count = 0usize;
                for eval in loader.iter() {
                    tracing::debug!(
                        "Eval batch {}: input_ids {:?}, k={}",
                        count,
                        eval.batch.input_ids.dims(),
                        eval.retrieval.k
                    );
                    count += 1;
                }
                count
            }
        };

        tracing::info!(
            "Prepared {} items in {} batches ({} records, {} unresolved)",
            items,
            batches,
            records_total,
            unresolved
        );

        Ok(PrepareSummary {
            records: records_total,
            items,
            unresolved,
            batches,
            seq_len: cfg.max_seq_length,
            embedding_dim,
            coverage,
        })
    }
}

/// Distinct target languages, in first-appearance order.
fn distinct_target_langs(records: &[Record]) -> Vec<Language> {
    let mut langs = Vec::new();
    for rec in records {
        if !langs.contains(&rec.target_lang) {
            langs.push(rec.target_lang);
        }
    }
    langs
}

/// One CSV row per record, then the per-language totals.
fn log_coverage(
    report:  &CoverageReport,
    dataset: &TrainingDataset,
) -> Result<Vec<LanguageCoverage>> {
    let mut coverage: Vec<LanguageCoverage> = Vec::new();

    for (i, rec) in dataset.records().iter().enumerate() {
        let resolved = dataset.is_resolved(i);
        report.log_record(i, rec.target_lang, &rec.target_keyword, resolved)?;

        match coverage.iter_mut().find(|c| c.lang == rec.target_lang) {
            Some(c) => {
                c.total += 1;
                if !resolved {
                    c.missing += 1;
                }
            }
            None => coverage.push(LanguageCoverage {
                lang:    rec.target_lang,
                total:   1,
                missing: usize::from(!resolved),
            }),
        }
    }

    report.log_summary(&coverage);
    Ok(coverage)
}
