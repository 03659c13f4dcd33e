// ============================================================
// Layer 5 — Infrastructure Layer
// ============================================================
// Artifact loading and cross-cutting concerns:
//
//   index_store.rs     — Per-language vocabulary (.vocab) and
//                        embedding matrix (.npy) loading, plus
//                        the (language, keyword) → vector
//                        resolution used by the target builder.
//
//   tokenizer_store.rs — Loads the pinned subword tokenizer
//                        model (tokenizer.json). The same
//                        instance serves every item access.
//
//   report.rs          — Target-coverage CSV so unresolved
//                        keywords in the corpus are auditable
//                        record by record.

/// Vocabulary tables and embedding indexes, per language
pub mod index_store;

/// Pinned subword tokenizer loading
pub mod tokenizer_store;

/// Target resolution coverage CSV
pub mod report;
