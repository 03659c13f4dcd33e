// ============================================================
// Layer 2 — Audit Use Case
// ============================================================
// Corpus-quality pass without any tensor work:
//   1. Load the record file
//   2. Load the vocabulary for each target language in use
//   3. Count which target keywords resolve to a vocabulary id
//
// The embedding indexes are deliberately not loaded — keyword
// coverage only needs the word → id tables, so an audit stays
// cheap even when the .npy artifacts are large.

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::data::loader::JsonRecordLoader;
use crate::domain::language::Language;
use crate::domain::traits::RecordSource;
use crate::infra::index_store::Vocabulary;
use crate::infra::report::LanguageCoverage;

pub struct AuditConfig {
    pub records_path: String,
    pub index_dir:    String,
}

#[derive(Debug)]
pub struct AuditSummary {
    pub records:  usize,
    pub coverage: Vec<LanguageCoverage>,
}

impl AuditSummary {
    pub fn total_missing(&self) -> usize {
        self.coverage.iter().map(|c| c.missing).sum()
    }
}

pub struct AuditUseCase {
    config: AuditConfig,
}

impl AuditUseCase {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<AuditSummary> {
        let records = JsonRecordLoader::new(&self.config.records_path).load_all()?;
        let index_dir = PathBuf::from(&self.config.index_dir);

        // Vocabulary per target language in use, loaded once
        let mut vocabs: HashMap<Language, Vocabulary> = HashMap::new();
        for rec in &records {
            if !vocabs.contains_key(&rec.target_lang) {
                let path = index_dir.join(format!("{}.vocab", rec.target_lang.code()));
                vocabs.insert(rec.target_lang, Vocabulary::from_file(&path)?);
            }
        }

        let mut coverage: Vec<LanguageCoverage> = Vec::new();
        for (i, rec) in records.iter().enumerate() {
            let resolved = vocabs[&rec.target_lang].id_of(&rec.target_keyword).is_some();
            if !resolved {
                tracing::warn!(
                    "'{}' not found in {} vocabulary (record {})",
                    rec.target_keyword,
                    rec.target_lang,
                    i
                );
            }

            match coverage.iter_mut().find(|c| c.lang == rec.target_lang) {
                Some(c) => {
                    c.total += 1;
                    if !resolved {
                        c.missing += 1;
                    }
                }
                None => coverage.push(LanguageCoverage {
                    lang:    rec.target_lang,
                    total:   1,
                    missing: usize::from(!resolved),
                }),
            }
        }

        Ok(AuditSummary { records: records.len(), coverage })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::index_store::write_fixture_pair;

    #[test]
    fn test_audit_counts_missing_keywords_per_language() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_pair(dir.path(), Language::Hindi, &["पानी", "केला"], 4, 0.0);
        write_fixture_pair(dir.path(), Language::English, &["water"], 4, 0.0);

        let records_path = dir.path().join("records.json");
        std::fs::write(
            &records_path,
            r#"[
                {"Source_text": "x", "Source_ID": "EN", "Target_ID": "HI", "Target_keyword": "केला"},
                {"Source_text": "y", "Source_ID": "EN", "Target_ID": "HI", "Target_keyword": "absent"},
                {"Source_text": "z", "Source_ID": "HI", "Target_ID": "EN", "Target_keyword": "water"}
            ]"#,
        )
        .unwrap();

        let summary = AuditUseCase::new(AuditConfig {
            records_path: records_path.to_string_lossy().into_owned(),
            index_dir:    dir.path().to_string_lossy().into_owned(),
        })
        .execute()
        .unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.total_missing(), 1);

        let hi = summary.coverage.iter().find(|c| c.lang == Language::Hindi).unwrap();
        assert_eq!(hi.total, 2);
        assert_eq!(hi.missing, 1);
        let en = summary.coverage.iter().find(|c| c.lang == Language::English).unwrap();
        assert_eq!(en.missing, 0);
    }

    #[test]
    fn test_audit_requires_vocabulary_files() {
        let dir = tempfile::tempdir().unwrap();
        let records_path = dir.path().join("records.json");
        std::fs::write(
            &records_path,
            r#"[{"Source_text": "x", "Source_ID": "EN", "Target_ID": "HI", "Target_keyword": "केला"}]"#,
        )
        .unwrap();

        let audit = AuditUseCase::new(AuditConfig {
            records_path: records_path.to_string_lossy().into_owned(),
            index_dir:    dir.path().to_string_lossy().into_owned(),
        });
        assert!(audit.execute().is_err());
    }
}
