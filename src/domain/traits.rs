// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the domain and the outer layers.
//
// Implementations:
//   - JsonRecordLoader implements RecordSource
//   - EmbeddingIndex   implements VectorIndex
//
// VectorIndex keeps the vector index a black box: the data
// layer only ever sees id → vector reconstruction and
// query → top-k search, never the index's storage format.

use anyhow::Result;

use crate::domain::record::Record;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load the full record list.
///
/// The whole list is materialized at once — there is no
/// streaming contract. A malformed source is an error, not an
/// empty list.
pub trait RecordSource {
    /// Load every record, in file order.
    fn load_all(&self) -> Result<Vec<Record>>;
}

// ─── VectorIndex ──────────────────────────────────────────────────────────────
/// Read-side contract of a per-language vector index.
///
/// Row `i` of the index is the embedding of vocabulary id `i`;
/// the index and its vocabulary must come from the same
/// snapshot. All methods are cheap in-memory operations once
/// the index is constructed.
pub trait VectorIndex: Send + Sync {
    /// Embedding dimensionality D.
    fn dim(&self) -> usize;

    /// Number of vectors (rows) in the index.
    fn len(&self) -> usize;

    /// Exact reconstruction of the vector stored at `id`.
    /// An out-of-range id means the vocabulary and index are
    /// misaligned — that is an error, never a default vector.
    fn reconstruct(&self, id: u32) -> Result<Vec<f32>>;

    /// Top-k ids by inner-product score, best first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
