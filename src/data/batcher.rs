// ============================================================
// Layer 4 — Batch Collators (Burn Batchers)
// ============================================================
// Stacks per-item feature structures into batch tensors.
//
// How batching works here:
//   Input:  Vec of N items, each with arrays of length L
//           (and a target vector of length D for training)
//   Output: tensors of shape [N, L] / [N, D]
//
//   Each array is flattened into one long Vec, then reshaped:
//   [i1_t1, ..., i1_tL, i2_t1, ..., iN_tL] → [N, L]
//
// Stacking is purely structural — no resampling, no shuffling
// (the surrounding DataLoader owns shuffling). Items reach a
// collator pre-padded to one fixed L; a length mismatch inside
// one batch is an upstream bug and panics rather than being
// papered over.
//
// Three variants:
//   TrainingBatcher — embedding-target batches
//   EvalBatcher     — same stacking + retrieval config carried
//                     through unchanged for the ranking stage
//   FeatureBatcher  — token-feature batches for both ends

use burn::{data::dataloader::batcher::Batcher, prelude::*};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::dataset::{FeatureItem, TrainingItem};
use crate::domain::language::Language;

// ─── TrainingBatch ────────────────────────────────────────────────────────────
/// A batch of embedding-target samples.
/// All tensors have batch size N as their first dimension.
#[derive(Debug, Clone)]
pub struct TrainingBatch<B: Backend> {
    /// Token id sequences — shape [N, L]
    pub input_ids: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding — shape [N, L]
    pub attention_mask: Tensor<B, 2, Int>,

    /// All zeros (single-segment encoding) — shape [N, L]
    pub type_ids: Tensor<B, 2, Int>,

    /// Target embedding vectors — shape [N, D]
    pub targets: Tensor<B, 2>,

    /// Constant positive labels — shape [N]
    pub labels: Tensor<B, 1>,

    /// Per-item language tags and keywords, in batch order
    pub source_langs: Vec<Language>,
    pub target_langs: Vec<Language>,
    pub target_words: Vec<String>,
}

// ─── TrainingBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct TrainingBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TrainingBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TrainingItem, TrainingBatch<B>> for TrainingBatcher<B> {
    fn batch(&self, items: Vec<TrainingItem>) -> TrainingBatch<B> {
        assert!(!items.is_empty(), "Cannot collate an empty batch");

        let batch_size = items.len();
        let seq_len    = items[0].phrase.input_ids.len();
        let dim        = items[0].target.len();

        // Fixed-shape invariant from the encoder and the target
        // resolver; a mismatch here is a bug, not bad data.
        for item in &items {
            assert_eq!(item.phrase.input_ids.len(), seq_len, "Heterogeneous sequence length in batch");
            assert_eq!(item.target.len(), dim, "Heterogeneous target dimension in batch");
        }

        let flatten_ids = |select: fn(&TrainingItem) -> &Vec<u32>| -> Vec<i32> {
            items
                .iter()
                .flat_map(|it| select(it).iter().map(|&x| x as i32))
                .collect()
        };

        let ids_flat  = flatten_ids(|it| &it.phrase.input_ids);
        let mask_flat = flatten_ids(|it| &it.phrase.attention_mask);
        let type_flat = flatten_ids(|it| &it.phrase.type_ids);

        let target_flat: Vec<f32> = items.iter().flat_map(|it| it.target.iter().copied()).collect();
        let labels:      Vec<f32> = items.iter().map(|it| it.label).collect();

        TrainingBatch {
            input_ids: Tensor::<B, 1, Int>::from_ints(ids_flat.as_slice(), &self.device)
                .reshape([batch_size, seq_len]),
            attention_mask: Tensor::<B, 1, Int>::from_ints(mask_flat.as_slice(), &self.device)
                .reshape([batch_size, seq_len]),
            type_ids: Tensor::<B, 1, Int>::from_ints(type_flat.as_slice(), &self.device)
                .reshape([batch_size, seq_len]),
            targets: Tensor::<B, 1>::from_floats(target_flat.as_slice(), &self.device)
                .reshape([batch_size, dim]),
            labels: Tensor::<B, 1>::from_floats(labels.as_slice(), &self.device),
            source_langs: items.iter().map(|it| it.source_lang).collect(),
            target_langs: items.iter().map(|it| it.target_lang).collect(),
            target_words: items.into_iter().map(|it| it.target_word).collect(),
        }
    }
}

// ─── RetrievalConfig ──────────────────────────────────────────────────────────
/// Caller-supplied, batch-invariant configuration for the
/// nearest-neighbor stage that consumes evaluation batches.
/// Not derived from the batch — threaded through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory holding the per-language index artifacts
    pub index_dir: PathBuf,

    /// Number of nearest neighbors to retrieve downstream
    pub k: usize,
}

// ─── EvalBatch / EvalBatcher ──────────────────────────────────────────────────
/// A training-shaped batch plus the retrieval configuration for
/// the next pipeline stage.
#[derive(Debug, Clone)]
pub struct EvalBatch<B: Backend> {
    pub batch:     TrainingBatch<B>,
    pub retrieval: RetrievalConfig,
}

#[derive(Clone, Debug)]
pub struct EvalBatcher<B: Backend> {
    inner:     TrainingBatcher<B>,
    retrieval: RetrievalConfig,
}

impl<B: Backend> EvalBatcher<B> {
    pub fn new(device: B::Device, retrieval: RetrievalConfig) -> Self {
        Self { inner: TrainingBatcher::new(device), retrieval }
    }
}

impl<B: Backend> Batcher<TrainingItem, EvalBatch<B>> for EvalBatcher<B> {
    fn batch(&self, items: Vec<TrainingItem>) -> EvalBatch<B> {
        EvalBatch {
            batch:     self.inner.batch(items),
            retrieval: self.retrieval.clone(),
        }
    }
}

// ─── FeatureBatch / FeatureBatcher ────────────────────────────────────────────
/// A batch of token-feature samples: both the phrase and the
/// keyword as [N, L] feature triples, languages as id tensors.
#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    pub phrase_input_ids:      Tensor<B, 2, Int>,
    pub phrase_attention_mask: Tensor<B, 2, Int>,
    pub phrase_type_ids:       Tensor<B, 2, Int>,

    pub target_input_ids:      Tensor<B, 2, Int>,
    pub target_attention_mask: Tensor<B, 2, Int>,
    pub target_type_ids:       Tensor<B, 2, Int>,

    /// Dense language ids — shape [N]
    pub source_lang_ids: Tensor<B, 1, Int>,
    pub target_lang_ids: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct FeatureBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FeatureBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<FeatureItem, FeatureBatch<B>> for FeatureBatcher<B> {
    fn batch(&self, items: Vec<FeatureItem>) -> FeatureBatch<B> {
        assert!(!items.is_empty(), "Cannot collate an empty batch");

        let batch_size = items.len();
        let seq_len    = items[0].phrase.input_ids.len();

        for item in &items {
            assert_eq!(item.phrase.input_ids.len(), seq_len, "Heterogeneous sequence length in batch");
            assert_eq!(item.target.input_ids.len(), seq_len, "Heterogeneous sequence length in batch");
        }

        let stack = |select: fn(&FeatureItem) -> &Vec<u32>| -> Tensor<B, 2, Int> {
            let flat: Vec<i32> = items
                .iter()
                .flat_map(|it| select(it).iter().map(|&x| x as i32))
                .collect();
            Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
                .reshape([batch_size, seq_len])
        };

        let src_ids: Vec<i32> = items.iter().map(|it| it.source_lang_id).collect();
        let tgt_ids: Vec<i32> = items.iter().map(|it| it.target_lang_id).collect();

        FeatureBatch {
            phrase_input_ids:      stack(|it| &it.phrase.input_ids),
            phrase_attention_mask: stack(|it| &it.phrase.attention_mask),
            phrase_type_ids:       stack(|it| &it.phrase.type_ids),
            target_input_ids:      stack(|it| &it.target.input_ids),
            target_attention_mask: stack(|it| &it.target.attention_mask),
            target_type_ids:       stack(|it| &it.target.type_ids),
            source_lang_ids: Tensor::<B, 1, Int>::from_ints(src_ids.as_slice(), &self.device),
            target_lang_ids: Tensor::<B, 1, Int>::from_ints(tgt_ids.as_slice(), &self.device),
        }
    }
}
