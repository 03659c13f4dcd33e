// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One raw phrase-pair record from the dataset file:
// a descriptive phrase in the source language and the keyword
// (in the target language) that the phrase describes.
//
// The serde renames preserve the field names of the published
// corpus files, so existing data loads unchanged. Records are
// immutable once loaded; a record's identity is its index in
// the dataset file.

use serde::{Deserialize, Serialize};

use crate::domain::language::Language;

/// A single (phrase, keyword) pair across two languages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The descriptive phrase, e.g. "a place where books are kept"
    #[serde(rename = "Source_text")]
    pub source_text: String,

    /// Language the phrase is written in
    #[serde(rename = "Source_ID")]
    pub source_lang: Language,

    /// Language of the keyword being described
    #[serde(rename = "Target_ID")]
    pub target_lang: Language,

    /// The word the phrase describes, looked up in the target
    /// language's vocabulary at training time
    #[serde(rename = "Target_keyword")]
    pub target_keyword: String,
}

impl Record {
    pub fn new(
        source_text:    impl Into<String>,
        source_lang:    Language,
        target_lang:    Language,
        target_keyword: impl Into<String>,
    ) -> Self {
        Self {
            source_text:    source_text.into(),
            source_lang,
            target_lang,
            target_keyword: target_keyword.into(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_corpus_field_names() {
        let json = r#"{
            "Source_text": "a sweet yellow fruit",
            "Source_ID": "EN",
            "Target_ID": "HI",
            "Target_keyword": "केला"
        }"#;

        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(rec.source_text, "a sweet yellow fruit");
        assert_eq!(rec.source_lang, Language::English);
        assert_eq!(rec.target_lang, Language::Hindi);
        assert_eq!(rec.target_keyword, "केला");
    }

    #[test]
    fn test_unsupported_language_tag_fails() {
        let json = r#"{
            "Source_text": "x",
            "Source_ID": "EN",
            "Target_ID": "ZZ",
            "Target_keyword": "y"
        }"#;

        let rec: Result<Record, _> = serde_json::from_str(json);
        assert!(rec.is_err());
    }
}
