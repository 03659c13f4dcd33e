// ============================================================
// Layer 5 — Target Coverage Report
// ============================================================
// Records the per-record outcome of target keyword resolution
// to a CSV file, one row per record:
//
//   record_index,target_lang,target_keyword,status
//   0,HI,केला,resolved
//   1,EN,zyzzyva,missing
//   ...
//
// Output file: <report_dir>/coverage.csv
//
// The CSV is the audit trail for corpus quality: every keyword
// the vocabulary could not resolve is listed individually, so
// a data problem is traceable to the exact source record.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::domain::language::Language;

/// Per-language resolution totals for one dataset build.
#[derive(Debug, Clone)]
pub struct LanguageCoverage {
    pub lang:    Language,
    pub total:   usize,
    pub missing: usize,
}

impl LanguageCoverage {
    pub fn resolved(&self) -> usize {
        self.total - self.missing
    }
}

/// Writes target-resolution outcomes to a CSV file.
pub struct CoverageReport {
    csv_path: PathBuf,
}

impl CoverageReport {
    /// Create the report file. Writes the CSV header only when
    /// the file is new, so repeated runs append.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("coverage.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "record_index,target_lang,target_keyword,status")?;
            tracing::debug!("Created coverage CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one record's resolution outcome.
    pub fn log_record(
        &self,
        record_index: usize,
        lang:         Language,
        keyword:      &str,
        resolved:     bool,
    ) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{},{}",
            record_index,
            lang,
            keyword,
            if resolved { "resolved" } else { "missing" },
        )?;
        Ok(())
    }

    /// Trace the per-language totals after a dataset build.
    pub fn log_summary(&self, coverage: &[LanguageCoverage]) {
        for c in coverage {
            tracing::info!(
                "{}: {}/{} targets resolved ({} missing)",
                c.lang,
                c.resolved(),
                c.total,
                c.missing,
            );
        }
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once_and_rows_append() {
        let dir = tempfile::tempdir().unwrap();

        let report = CoverageReport::new(dir.path()).unwrap();
        report.log_record(0, Language::Hindi, "केला", true).unwrap();

        // Re-opening must not duplicate the header
        let report = CoverageReport::new(dir.path()).unwrap();
        report.log_record(1, Language::English, "zyzzyva", false).unwrap();

        let body = std::fs::read_to_string(report.csv_path()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "record_index,target_lang,target_keyword,status");
        assert_eq!(lines[1], "0,HI,केला,resolved");
        assert_eq!(lines[2], "1,EN,zyzzyva,missing");
    }

    #[test]
    fn test_coverage_resolved_count() {
        let c = LanguageCoverage { lang: Language::Odia, total: 10, missing: 3 };
        assert_eq!(c.resolved(), 7);
    }
}
