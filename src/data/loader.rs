// ============================================================
// Layer 4 — Record Loader
// ============================================================
// Loads the phrase-pair record file: a JSON array of objects
// with the corpus field names (Source_text, Source_ID,
// Target_ID, Target_keyword).
//
// The whole list is parsed in one pass at construction time —
// no lazy loading, no streaming. The record file is a single
// structured artifact, so any parse failure (including an
// unsupported language tag on any record) is fatal here rather
// than surfacing later as a half-loaded dataset.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::record::Record;
use crate::domain::traits::RecordSource;

/// Loads records from a JSON file on disk.
pub struct JsonRecordLoader {
    path: PathBuf,
}

impl JsonRecordLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonRecordLoader {
    fn load_all(&self) -> Result<Vec<Record>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read record file '{}'", self.path.display()))?;

        let records: Vec<Record> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed record file '{}'", self.path.display()))?;

        tracing::info!("Loaded {} records from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::Language;

    #[test]
    fn test_loads_record_array_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(
            &path,
            r#"[
                {"Source_text": "a sweet yellow fruit", "Source_ID": "EN",
                 "Target_ID": "HI", "Target_keyword": "केला"},
                {"Source_text": "जहाँ किताबें रखी जाती हैं", "Source_ID": "HI",
                 "Target_ID": "EN", "Target_keyword": "library"}
            ]"#,
        )
        .unwrap();

        let records = JsonRecordLoader::new(&path).load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target_lang, Language::Hindi);
        assert_eq!(records[1].target_keyword, "library");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let loader = JsonRecordLoader::new("no/such/records.json");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"Source_text\": ").unwrap();

        assert!(JsonRecordLoader::new(&path).load_all().is_err());
    }

    #[test]
    fn test_unsupported_tag_anywhere_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_lang.json");
        std::fs::write(
            &path,
            r#"[{"Source_text": "x", "Source_ID": "EN",
                 "Target_ID": "FR", "Target_keyword": "eau"}]"#,
        )
        .unwrap();

        assert!(JsonRecordLoader::new(&path).load_all().is_err());
    }
}
