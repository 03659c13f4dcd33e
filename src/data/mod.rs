// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw record file to tensor batches.
//
// The pipeline flows in this order:
//
//   records.json
//       │
//       ▼
//   JsonRecordLoader   → parses the phrase-pair records
//       │
//       ▼
//   TextEncoder        → fixed-length token feature triples
//       │
//       ▼
//   TrainingDataset /  → Burn Dataset impls; resolve targets
//   FeatureDataset       (vocabulary + embedding index) or
//       │                tokenize both ends of the pair
//       ▼
//   TrainingBatcher /  → stack items into [N, L] / [N, D]
//   EvalBatcher /        tensor batches
//   FeatureBatcher
//       │
//       ▼
//   DataLoader         → feeds batches to the (external) model
//
// Each module is responsible for exactly one step.

/// Loads the phrase-pair record file
pub mod loader;

/// Fixed-length tokenization (the padding/truncation policy)
pub mod encoder;

/// Implements Burn's Dataset trait for both item flavors
pub mod dataset;

/// Implements Burn's Batcher trait for the three batch shapes
pub mod batcher;
