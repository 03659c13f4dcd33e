// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal per use
// case. No tensor math, no printing, no direct file parsing —
// only workflow coordination.

// Build datasets and materialize batches (training or eval shape)
pub mod prepare_use_case;

// Record/vocabulary coverage audit without tensor work
pub mod audit_use_case;
