// ============================================================
// Layer 5 — Vocabulary + Embedding Index Store
// ============================================================
// Loads the two per-language artifacts the target side of the
// pipeline depends on:
//
//   <dir>/<code>.vocab — one word per line; the 0-indexed line
//                        number is that word's id
//   <dir>/<code>.npy   — 2-D f32 matrix of shape [V, D]; row i
//                        is the embedding of vocabulary id i
//
// The two files must come from the same vocabulary snapshot —
// the store cannot verify that, it can only warn when the row
// counts disagree. Everything is loaded eagerly; after
// construction both structures are read-only and shareable.

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::language::Language;
use crate::domain::traits::VectorIndex;

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Per-language word → id table, built once from a line-delimited
/// vocabulary file and never mutated afterward.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_to_id: HashMap<String, u32>,
}

impl Vocabulary {
    /// Load a vocabulary file. Line number (0-indexed) = word id.
    /// A duplicated word is malformed input: ids must be unique
    /// per word, so construction fails rather than letting the
    /// last occurrence win silently.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open vocabulary file '{}'", path.display()))?;

        let mut word_to_id = HashMap::new();

        for (id, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Cannot read vocabulary file '{}'", path.display()))?;
            let word = line.trim().to_string();

            if word_to_id.insert(word.clone(), id as u32).is_some() {
                bail!(
                    "Duplicate word '{}' at line {} in '{}'",
                    word,
                    id,
                    path.display()
                );
            }
        }

        Ok(Self { word_to_id })
    }

    /// Look up a word's id. None means the word is not in this
    /// vocabulary snapshot.
    pub fn id_of(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.word_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_to_id.is_empty()
    }
}

// ─── EmbeddingIndex ───────────────────────────────────────────────────────────
/// Dense [V, D] embedding matrix backing exact reconstruction
/// and exact inner-product search.
pub struct EmbeddingIndex {
    data: Array2<f32>,
}

impl EmbeddingIndex {
    /// Load a 2-D f32 .npy artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open index file '{}'", path.display()))?;

        let data = Array2::<f32>::read_npy(file)
            .with_context(|| format!("Cannot read index .npy '{}'", path.display()))?;

        if data.ncols() == 0 {
            bail!("Index '{}' has zero embedding dimension", path.display());
        }

        Ok(Self { data })
    }
}

impl VectorIndex for EmbeddingIndex {
    fn dim(&self) -> usize {
        self.data.ncols()
    }

    fn len(&self) -> usize {
        self.data.nrows()
    }

    fn reconstruct(&self, id: u32) -> Result<Vec<f32>> {
        let row = id as usize;
        if row >= self.data.nrows() {
            bail!(
                "Vector id {} out of range (index has {} rows) — vocabulary and index are misaligned",
                id,
                self.data.nrows()
            );
        }
        Ok(self.data.row(row).to_vec())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>> {
        if query.len() != self.data.ncols() {
            bail!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.data.ncols()
            );
        }

        // Exact scan: score every row, keep the k best.
        let query = ndarray::ArrayView1::from(query);
        let scores = self.data.dot(&query);

        let mut ranked: Vec<(u32, f32)> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as u32, s))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        Ok(ranked)
    }
}

// ─── IndexStore ───────────────────────────────────────────────────────────────
/// A matched (vocabulary, index) pair for one language.
pub struct LanguageIndex {
    pub vocab: Vocabulary,
    pub index: EmbeddingIndex,
}

/// Loader for per-language artifact pairs rooted at one directory.
pub struct IndexStore;

impl IndexStore {
    /// Load the vocabulary and embedding index for one language.
    /// Either artifact missing or malformed fails construction.
    pub fn load(dir: &Path, lang: Language) -> Result<LanguageIndex> {
        let vocab_path = dir.join(format!("{}.vocab", lang.code()));
        let index_path = dir.join(format!("{}.npy", lang.code()));

        let vocab = Vocabulary::from_file(&vocab_path)
            .with_context(|| format!("Loading vocabulary for {}", lang))?;
        let index = EmbeddingIndex::load(&index_path)
            .with_context(|| format!("Loading embedding index for {}", lang))?;

        // Matched snapshots are the caller's responsibility; a row
        // count mismatch is the one symptom visible from here.
        if vocab.len() != index.len() {
            tracing::warn!(
                "{}: vocabulary has {} words but index has {} rows — artifacts may be from different snapshots",
                lang,
                vocab.len(),
                index.len()
            );
        }

        tracing::info!(
            "Loaded {}: {} words, {} vectors of dim {}",
            lang,
            vocab.len(),
            index.len(),
            index.dim()
        );

        Ok(LanguageIndex { vocab, index })
    }

    /// Load artifact pairs for every language in `langs`.
    pub fn load_for(dir: &Path, langs: &[Language]) -> Result<LanguageIndexes> {
        let mut map = HashMap::new();
        for &lang in langs {
            map.insert(lang, Self::load(dir, lang)?);
        }
        Ok(LanguageIndexes { map })
    }
}

// ─── LanguageIndexes ──────────────────────────────────────────────────────────
/// All loaded (vocabulary, index) pairs, keyed by language.
/// The single (language, keyword) → vector lookup the target
/// builder runs per record lives here.
pub struct LanguageIndexes {
    map: HashMap<Language, LanguageIndex>,
}

impl LanguageIndexes {
    pub fn get(&self, lang: Language) -> Option<&LanguageIndex> {
        self.map.get(&lang)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.map.keys().copied()
    }

    /// Resolve a keyword to its embedding vector.
    ///
    ///   Ok(Some(v)) — keyword found, vector reconstructed
    ///   Ok(None)    — keyword absent from the vocabulary
    ///                 (recoverable, per-record condition)
    ///   Err(_)      — language not loaded, or the resolved id
    ///                 falls outside the index (misaligned
    ///                 snapshots — never substituted silently)
    pub fn resolve(&self, lang: Language, word: &str) -> Result<Option<Vec<f32>>> {
        let entry = self
            .map
            .get(&lang)
            .with_context(|| format!("No vocabulary/index loaded for {}", lang))?;

        match entry.vocab.id_of(word) {
            None => Ok(None),
            Some(id) => Ok(Some(entry.index.reconstruct(id)?)),
        }
    }

    /// The common embedding dimensionality D across all loaded
    /// languages. Targets of different widths cannot be stacked
    /// into one [N, D] batch, so a mismatch is fatal.
    pub fn embedding_dim(&self) -> Result<usize> {
        let mut dims = self.map.iter().map(|(l, e)| (*l, e.index.dim()));

        let (first_lang, dim) = dims.next().context("No language indexes loaded")?;
        for (lang, other) in dims {
            if other != dim {
                bail!(
                    "Embedding dimension mismatch: {} has D={} but {} has D={}",
                    first_lang,
                    dim,
                    lang,
                    other
                );
            }
        }
        Ok(dim)
    }
}

// ─── Test Fixture ─────────────────────────────────────────────────────────────
/// Write `<code>.vocab` and `<code>.npy` fixtures into `dir`.
/// Row i of the matrix is filled with `base + i` so every word
/// gets a distinct, predictable vector.
#[cfg(test)]
pub(crate) fn write_fixture_pair(
    dir:   &Path,
    lang:  Language,
    words: &[&str],
    dim:   usize,
    base:  f32,
) {
    use ndarray_npy::WriteNpyExt;
    use std::io::Write;

    let vocab_path = dir.join(format!("{}.vocab", lang.code()));
    let mut f = File::create(vocab_path).unwrap();
    for word in words {
        writeln!(f, "{word}").unwrap();
    }

    let matrix = Array2::from_shape_fn((words.len(), dim), |(i, _)| base + i as f32);
    let index_path = dir.join(format!("{}.npy", lang.code()));
    matrix.write_npy(File::create(index_path).unwrap()).unwrap();
}
