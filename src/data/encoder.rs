// ============================================================
// Layer 4 — Text Encoder (Tokenizer Adapter)
// ============================================================
// Wraps the pinned subword tokenizer behind the fixed-length
// encoding every downstream consumer relies on.
//
// Padding/truncation policy, given raw token ids T and the
// configured maximum length L:
//   1. Reserve 2 slots for the boundary markers
//   2. If len(T) > L - 2, keep only the first L - 2 tokens
//   3. Sequence becomes [CLS] T [SEP]  (length ≤ L)
//   4. attention_mask: 1 per real position, 0 per pad
//   5. type_ids: all zeros (single-segment encoding)
//   6. Right-pad input_ids with [PAD], masks with 0, to exactly L
//
// All three output arrays are always exactly length L. Nothing
// downstream re-checks this — the batchers stack rows on the
// assumption that it holds.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

/// Slots reserved for the [CLS]/[SEP] boundary markers.
pub const NUM_SPECIAL_TOKENS: usize = 2;

/// Default maximum sequence length L.
pub const DEFAULT_MAX_SEQ_LEN: usize = 128;

// ─── EncodedText ──────────────────────────────────────────────────────────────
/// One text span as fixed-length feature arrays.
/// Every array has exactly the encoder's configured length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedText {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub type_ids:       Vec<u32>,
}

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// The shared tokenizer handle plus the padding policy.
///
/// Constructed once per run; both item builders borrow the same
/// instance for every access (tokenization is stateless and the
/// wrapped tokenizer is Send + Sync).
pub struct TextEncoder {
    tokenizer:      Tokenizer,
    max_seq_length: usize,
    cls_id:         u32,
    sep_id:         u32,
    pad_id:         u32,
}

impl TextEncoder {
    /// Wrap a loaded tokenizer model. Fails if the model lacks
    /// any of the [CLS]/[SEP]/[PAD] special tokens, or if the
    /// maximum length leaves no room for real tokens.
    pub fn new(tokenizer: Tokenizer, max_seq_length: usize) -> Result<Self> {
        if max_seq_length <= NUM_SPECIAL_TOKENS {
            bail!(
                "max_seq_length must exceed {} (got {})",
                NUM_SPECIAL_TOKENS,
                max_seq_length
            );
        }

        let cls_id = tokenizer
            .token_to_id("[CLS]")
            .context("Tokenizer model has no [CLS] token")?;
        let sep_id = tokenizer
            .token_to_id("[SEP]")
            .context("Tokenizer model has no [SEP] token")?;
        let pad_id = tokenizer
            .token_to_id("[PAD]")
            .context("Tokenizer model has no [PAD] token")?;

        Ok(Self { tokenizer, max_seq_length, cls_id, sep_id, pad_id })
    }

    pub fn max_seq_length(&self) -> usize {
        self.max_seq_length
    }

    pub fn num_special_tokens(&self) -> usize {
        NUM_SPECIAL_TOKENS
    }

    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    /// Raw subword tokens for a text, without boundary markers.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenization error: {e}"))?;
        Ok(enc.get_tokens().to_vec())
    }

    /// Encode a text to the fixed-length feature triple.
    pub fn encode_padded(&self, text: &str) -> Result<EncodedText> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenization error: {e}"))?;

        let max_real = self.max_seq_length - NUM_SPECIAL_TOKENS;
        let mut ids: Vec<u32> = enc.get_ids().to_vec();
        ids.truncate(max_real);

        // [CLS] tokens [SEP]
        let mut input_ids = Vec::with_capacity(self.max_seq_length);
        input_ids.push(self.cls_id);
        input_ids.extend_from_slice(&ids);
        input_ids.push(self.sep_id);

        let real_len = input_ids.len();
        let mut attention_mask = vec![1u32; real_len];
        let mut type_ids       = vec![0u32; real_len];

        // Right-pad all three arrays to exactly max_seq_length
        input_ids.resize(self.max_seq_length, self.pad_id);
        attention_mask.resize(self.max_seq_length, 0);
        type_ids.resize(self.max_seq_length, 0);

        Ok(EncodedText { input_ids, attention_mask, type_ids })
    }
}

// ─── Test Fixture ─────────────────────────────────────────────────────────────
/// Encoder over a word-level fixture tokenizer; word ids start
/// at 4 in list order ([PAD]=0, [UNK]=1, [CLS]=2, [SEP]=3).
#[cfg(test)]
pub(crate) fn fixture_encoder(words: &[&str], max_seq_length: usize) -> TextEncoder {
    use crate::infra::tokenizer_store::{write_fixture_tokenizer, TokenizerStore};

    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture_tokenizer(dir.path(), words);
    let tokenizer = TokenizerStore::new(&path).load().unwrap();
    TextEncoder::new(tokenizer, max_seq_length).unwrap()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 10] = [
        "w0", "w1", "w2", "w3", "w4", "w5", "w6", "w7", "w8", "w9",
    ];

    #[test]
    fn test_output_is_always_exactly_max_len() {
        let enc = fixture_encoder(&WORDS, 8);

        for text in ["", "w0", "w0 w1 w2", "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9"] {
            let out = enc.encode_padded(text).unwrap();
            assert_eq!(out.input_ids.len(), 8, "input_ids for {text:?}");
            assert_eq!(out.attention_mask.len(), 8, "attention_mask for {text:?}");
            assert_eq!(out.type_ids.len(), 8, "type_ids for {text:?}");
        }
    }

    #[test]
    fn test_boundary_markers_and_word_ids() {
        let enc = fixture_encoder(&WORDS, 8);
        let out = enc.encode_padded("w0 w1 w2").unwrap();

        // [CLS] w0 w1 w2 [SEP] [PAD] [PAD] [PAD]
        assert_eq!(out.input_ids, vec![2, 4, 5, 6, 3, 0, 0, 0]);
        assert_eq!(out.attention_mask, vec![1, 1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(out.type_ids, vec![0; 8]);
    }

    #[test]
    fn test_truncation_keeps_first_l_minus_2_tokens() {
        let enc = fixture_encoder(&WORDS, 8);
        let out = enc.encode_padded("w0 w1 w2 w3 w4 w5 w6 w7 w8 w9").unwrap();

        // Exactly the first 6 raw tokens survive, wrapped in markers;
        // no padding remains.
        assert_eq!(out.input_ids, vec![2, 4, 5, 6, 7, 8, 9, 3]);
        assert_eq!(out.attention_mask, vec![1; 8]);
    }

    #[test]
    fn test_mask_has_min_raw_plus_two_ones() {
        let enc = fixture_encoder(&WORDS, 8);

        for (text, raw_len) in [("", 0usize), ("w0 w1", 2), ("w0 w1 w2 w3 w4 w5 w6 w7", 8)] {
            let out  = enc.encode_padded(text).unwrap();
            let ones = out.attention_mask.iter().filter(|&&m| m == 1).count();
            assert_eq!(ones, raw_len.min(6) + 2, "mask ones for {text:?}");
        }
    }

    #[test]
    fn test_empty_text_is_markers_plus_padding() {
        let enc = fixture_encoder(&WORDS, 8);
        let out = enc.encode_padded("").unwrap();

        assert_eq!(out.input_ids, vec![2, 3, 0, 0, 0, 0, 0, 0]);
        assert_eq!(out.attention_mask, vec![1, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_tokenize_exposes_raw_tokens() {
        let enc = fixture_encoder(&WORDS, 8);
        let tokens = enc.tokenize("w3 w1").unwrap();
        assert_eq!(tokens, vec!["w3".to_string(), "w1".to_string()]);
    }

    #[test]
    fn test_max_len_must_leave_room_for_tokens() {
        use crate::infra::tokenizer_store::{write_fixture_tokenizer, TokenizerStore};

        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture_tokenizer(dir.path(), &WORDS);
        let tokenizer = TokenizerStore::new(&path).load().unwrap();
        assert!(TextEncoder::new(tokenizer, 2).is_err());
    }
}
