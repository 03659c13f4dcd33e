// ============================================================
// Layer 4 — Item Builders (Burn Datasets)
// ============================================================
// Two views over the same record list, differing in how the
// target side of each pair is represented:
//
//   TrainingDataset — target is the keyword's pre-computed
//                     embedding vector, resolved through the
//                     target language's vocabulary + index
//   FeatureDataset  — target is the keyword's own tokenized
//                     feature triple; no embedding store
//
// Both share one TextEncoder for all tokenization, so the
// padding policy cannot drift between them.
//
// Target resolution runs as a SINGLE indexed pass over the
// records at construction time: record i's target lives at
// targets[i], an unresolved keyword is an explicit None at
// position i, and the iterable view selects only resolved
// positions through `kept`. A record's target can therefore
// never be another record's vector, whatever the scan order.

use anyhow::Result;
use burn::data::dataset::Dataset;
use std::sync::Arc;

use crate::data::encoder::{EncodedText, TextEncoder};
use crate::domain::language::Language;
use crate::domain::record::Record;
use crate::infra::index_store::LanguageIndexes;

// ─── TrainingItem ─────────────────────────────────────────────────────────────
/// One embedding-target sample, built on demand per access.
#[derive(Debug, Clone)]
pub struct TrainingItem {
    /// Tokenized source phrase, exactly max_seq_length long
    pub phrase: EncodedText,

    /// The target keyword's embedding vector (length D)
    pub target: Vec<f32>,

    pub source_lang: Language,
    pub target_lang: Language,

    /// The literal keyword, carried for evaluation/reporting
    pub target_word: String,

    /// Constant 1.0 — this stage only produces positive pairs;
    /// negative sampling is the model side's concern
    pub label: f32,
}

/// A record whose keyword was absent from its language's
/// vocabulary. Reported, never silently realigned.
#[derive(Debug, Clone)]
pub struct UnresolvedTarget {
    pub record_index: usize,
    pub lang:         Language,
    pub keyword:      String,
}

// ─── TrainingDataset ──────────────────────────────────────────────────────────
pub struct TrainingDataset {
    records: Vec<Record>,
    /// Record-aligned: targets[i] belongs to records[i]
    targets: Vec<Option<Vec<f32>>>,
    /// Indices of records with a resolved target, in record order
    kept: Vec<usize>,
    unresolved: Vec<UnresolvedTarget>,
    encoder: Arc<TextEncoder>,
    embedding_dim: usize,
}

impl TrainingDataset {
    /// Resolve every record's target in one indexed pass.
    ///
    /// A keyword missing from its vocabulary is recoverable:
    /// warned, recorded, and excluded from the iterable view.
    /// A reconstruct failure (id outside the index) or an
    /// embedding-dimension mismatch across languages is fatal.
    pub fn new(
        records: Vec<Record>,
        indexes: &LanguageIndexes,
        encoder: Arc<TextEncoder>,
    ) -> Result<Self> {
        let embedding_dim = if records.is_empty() {
            0
        } else {
            indexes.embedding_dim()?
        };

        let mut targets    = Vec::with_capacity(records.len());
        let mut kept       = Vec::new();
        let mut unresolved = Vec::new();

        for (i, rec) in records.iter().enumerate() {
            match indexes.resolve(rec.target_lang, &rec.target_keyword)? {
                Some(vector) => {
                    targets.push(Some(vector));
                    kept.push(i);
                }
                None => {
                    tracing::warn!(
                        "'{}' not found in {} vocabulary (record {})",
                        rec.target_keyword,
                        rec.target_lang,
                        i
                    );
                    targets.push(None);
                    unresolved.push(UnresolvedTarget {
                        record_index: i,
                        lang:         rec.target_lang,
                        keyword:      rec.target_keyword.clone(),
                    });
                }
            }
        }

        tracing::info!(
            "Resolved targets for {}/{} records",
            kept.len(),
            records.len()
        );

        Ok(Self { records, targets, kept, unresolved, encoder, embedding_dim })
    }

    /// Total records loaded, including those without a target.
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether record `record_index` resolved to a target vector.
    pub fn is_resolved(&self, record_index: usize) -> bool {
        self.targets
            .get(record_index)
            .map(Option::is_some)
            .unwrap_or(false)
    }

    pub fn unresolved(&self) -> &[UnresolvedTarget] {
        &self.unresolved
    }

    /// Embedding dimensionality D shared by all targets.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

impl Dataset<TrainingItem> for TrainingDataset {
    fn get(&self, index: usize) -> Option<TrainingItem> {
        let record_index = *self.kept.get(index)?;
        let rec = &self.records[record_index];

        // kept only holds resolved positions
        let target = self.targets[record_index].clone()?;

        let phrase = match self.encoder.encode_padded(&rec.source_text) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Tokenization failed for record {}: {e}", record_index);
                return None;
            }
        };

        Some(TrainingItem {
            phrase,
            target,
            source_lang: rec.source_lang,
            target_lang: rec.target_lang,
            target_word: rec.target_keyword.clone(),
            label: 1.0,
        })
    }

    fn len(&self) -> usize {
        self.kept.len()
    }
}

// ─── FeatureItem ──────────────────────────────────────────────────────────────
/// One token-feature sample: both ends of the pair tokenized,
/// languages as dense integer ids (not vocabulary ids).
#[derive(Debug, Clone)]
pub struct FeatureItem {
    pub phrase: EncodedText,
    pub target: EncodedText,
    pub source_lang_id: i32,
    pub target_lang_id: i32,
}

// ─── FeatureDataset ───────────────────────────────────────────────────────────
/// Tokenizer-only view: no vocabulary or embedding store, so
/// every record is iterable.
pub struct FeatureDataset {
    records: Vec<Record>,
    encoder: Arc<TextEncoder>,
}

impl FeatureDataset {
    pub fn new(records: Vec<Record>, encoder: Arc<TextEncoder>) -> Self {
        Self { records, encoder }
    }
}

impl Dataset<FeatureItem> for FeatureDataset {
    fn get(&self, index: usize) -> Option<FeatureItem> {
        let rec = self.records.get(index)?;

        let encode = |text: &str| match self.encoder.encode_padded(text) {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::error!("Tokenization failed for record {}: {e}", index);
                None
            }
        };

        Some(FeatureItem {
            phrase: encode(&rec.source_text)?,
            target: encode(&rec.target_keyword)?,
            source_lang_id: rec.source_lang.id() as i32,
            target_lang_id: rec.target_lang.id() as i32,
        })
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::fixture_encoder;
    use crate::infra::index_store::{write_fixture_pair, IndexStore};

    const PHRASE_WORDS: [&str; 6] = ["w0", "w1", "w2", "w3", "पानी", "केला"];

    /// Hindi index over ["पानी", "केला"], D = 4, vectors
    /// [10,10,10,10] and [11,11,11,11].
    fn fixture_indexes(dir: &std::path::Path) -> LanguageIndexes {
        write_fixture_pair(dir, Language::Hindi, &["पानी", "केला"], 4, 10.0);
        IndexStore::load_for(dir, &[Language::Hindi]).unwrap()
    }

    fn records_with_one_miss() -> Vec<Record> {
        vec![
            Record::new("w0 w1", Language::English, Language::Hindi, "केला"),
            Record::new("w1 w2", Language::English, Language::Hindi, "absent"),
            Record::new("w2 w3", Language::English, Language::Hindi, "पानी"),
        ]
    }

    #[test]
    fn test_unresolved_keyword_never_shifts_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let indexes = fixture_indexes(dir.path());
        let encoder = Arc::new(fixture_encoder(&PHRASE_WORDS, 8));

        let ds = TrainingDataset::new(records_with_one_miss(), &indexes, encoder).unwrap();

        // Record 1 is excluded, not realigned
        assert_eq!(ds.num_records(), 3);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.unresolved().len(), 1);
        assert_eq!(ds.unresolved()[0].record_index, 1);
        assert_eq!(ds.unresolved()[0].keyword, "absent");
        assert!(ds.is_resolved(0));
        assert!(!ds.is_resolved(1));
        assert!(ds.is_resolved(2));

        // Each surviving item carries its OWN record's vector:
        // item 1 is record 2 ("पानी" → id 0 → [10; 4]), not the
        // vector that record 1 would have had
        let item0 = ds.get(0).unwrap();
        let item1 = ds.get(1).unwrap();
        assert_eq!(item0.target, vec![11.0; 4]);
        assert_eq!(item0.target_word, "केला");
        assert_eq!(item1.target, vec![10.0; 4]);
        assert_eq!(item1.target_word, "पानी");
    }

    #[test]
    fn test_item_fields_and_fixed_length_phrase() {
        let dir = tempfile::tempdir().unwrap();
        let indexes = fixture_indexes(dir.path());
        let encoder = Arc::new(fixture_encoder(&PHRASE_WORDS, 8));

        let ds = TrainingDataset::new(records_with_one_miss(), &indexes, encoder).unwrap();
        let item = ds.get(0).unwrap();

        assert_eq!(item.phrase.input_ids.len(), 8);
        assert_eq!(item.phrase.attention_mask.len(), 8);
        assert_eq!(item.phrase.type_ids.len(), 8);
        assert_eq!(item.source_lang, Language::English);
        assert_eq!(item.target_lang, Language::Hindi);
        assert_eq!(item.label, 1.0);
        assert_eq!(ds.embedding_dim(), 4);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let indexes = fixture_indexes(dir.path());
        let encoder = Arc::new(fixture_encoder(&PHRASE_WORDS, 8));

        let ds = TrainingDataset::new(records_with_one_miss(), &indexes, encoder).unwrap();
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_feature_dataset_keeps_every_record() {
        let encoder = Arc::new(fixture_encoder(&PHRASE_WORDS, 8));
        let ds = FeatureDataset::new(records_with_one_miss(), encoder);

        // No vocabulary involved — record 1 is iterable here
        assert_eq!(ds.len(), 3);

        let item = ds.get(0).unwrap();
        assert_eq!(item.phrase.input_ids.len(), 8);
        assert_eq!(item.target.input_ids.len(), 8);
        assert_eq!(item.source_lang_id, Language::English.id() as i32);
        assert_eq!(item.target_lang_id, Language::Hindi.id() as i32);

        // Keyword "केला" is in the tokenizer's word list: [CLS] केला [SEP]
        let keyword_feature = item.target;
        assert_eq!(keyword_feature.input_ids[0], 2);
        assert_eq!(keyword_feature.attention_mask.iter().sum::<u32>(), 3);
    }
}
