// ============================================================
// Layer 5 — Tokenizer Store
// ============================================================
// Loads the pinned subword tokenizer model from disk.
//
// The tokenizer is an external artifact (a HuggingFace
// tokenizer.json, e.g. the indic-bert sentencepiece export) —
// this crate never trains or mutates it. One instance is
// loaded per run and shared by reference with every per-item
// transform.

use anyhow::Result;
use std::path::PathBuf;
use tokenizers::Tokenizer;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the pinned tokenizer JSON.
    pub fn load(&self) -> Result<Tokenizer> {
        tracing::info!("Loading tokenizer from '{}'", self.path.display());
        Tokenizer::from_file(&self.path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", self.path.display(), e)
        })
    }
}

// ─── Test Fixture ─────────────────────────────────────────────────────────────
// A minimal word-level tokenizer over a fixed word list, written
// in the tokenizer.json format that Tokenizer::from_file expects.
// Special ids: [PAD]=0, [UNK]=1, [CLS]=2, [SEP]=3; words follow
// from id 4 in list order.
#[cfg(test)]
pub(crate) fn word_level_tokenizer_json(words: &[&str]) -> String {
    let mut vocab = serde_json::json!({
        "[PAD]": 0,
        "[UNK]": 1,
        "[CLS]": 2,
        "[SEP]": 3,
    });

    let mut next_id = 4usize;
    for word in words {
        if vocab.get(word).is_none() {
            vocab[word] = serde_json::json!(next_id);
            next_id += 1;
        }
    }

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 1, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 2, "content": "[CLS]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 3, "content": "[SEP]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    })
    .to_string()
}

/// Write the fixture tokenizer JSON into `dir` and return its path.
#[cfg(test)]
pub(crate) fn write_fixture_tokenizer(dir: &std::path::Path, words: &[&str]) -> PathBuf {
    let path = dir.join("tokenizer.json");
    std::fs::write(&path, word_level_tokenizer_json(words)).unwrap();
    path
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_fixture_tokenizer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture_tokenizer(dir.path(), &["sweet", "yellow", "fruit"]);

        let tokenizer = TokenizerStore::new(&path).load().unwrap();
        assert_eq!(tokenizer.token_to_id("[CLS]"), Some(2));
        assert_eq!(tokenizer.token_to_id("sweet"), Some(4));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let store = TokenizerStore::new("no/such/tokenizer.json");
        assert!(store.load().is_err());
    }
}
