// ============================================================
// Layer 3 — Language Domain Type
// ============================================================
// The closed set of languages the pipeline supports.
//
// Each language carries three 1:1 representations:
//   - tag:  the short code used in the record file ("HI", "BE", ...)
//   - code: the lowercase code used for vocabulary/index file
//           lookup ("hi.vocab", "hi.npy", ...)
//   - id:   a dense integer used as a numeric feature (0..=6)
//
// A record whose tag is outside this set is a hard data error:
// serde deserialization rejects it, so an unsupported language
// is unrepresentable past the loading boundary.

use serde::{Deserialize, Serialize};

/// One of the seven supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "HI")]
    Hindi,
    #[serde(rename = "BE")]
    Bengali,
    #[serde(rename = "GU")]
    Gujarati,
    #[serde(rename = "OD")]
    Odia,
    #[serde(rename = "PU")]
    Punjabi,
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "MA")]
    Marathi,
}

impl Language {
    /// Every supported language, in dense-id order.
    pub const ALL: [Language; 7] = [
        Language::Hindi,
        Language::Bengali,
        Language::Gujarati,
        Language::Odia,
        Language::Punjabi,
        Language::English,
        Language::Marathi,
    ];

    /// The record-file tag ("HI", "BE", ...).
    pub fn tag(self) -> &'static str {
        match self {
            Language::Hindi    => "HI",
            Language::Bengali  => "BE",
            Language::Gujarati => "GU",
            Language::Odia     => "OD",
            Language::Punjabi  => "PU",
            Language::English  => "EN",
            Language::Marathi  => "MA",
        }
    }

    /// The lowercase code used to name vocabulary and index files
    /// ("hi" → "hi.vocab" / "hi.npy").
    pub fn code(self) -> &'static str {
        match self {
            Language::Hindi    => "hi",
            Language::Bengali  => "bn",
            Language::Gujarati => "gu",
            Language::Odia     => "or",
            Language::Punjabi  => "pa",
            Language::English  => "en",
            Language::Marathi  => "mr",
        }
    }

    /// Dense integer id used as a numeric feature (0..=6).
    pub fn id(self) -> u32 {
        match self {
            Language::Hindi    => 0,
            Language::Bengali  => 1,
            Language::Gujarati => 2,
            Language::Odia     => 3,
            Language::Punjabi  => 4,
            Language::English  => 5,
            Language::Marathi  => 6,
        }
    }

    /// Parse a record-file tag. Returns None for anything outside
    /// the supported set.
    pub fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL.iter().copied().find(|l| l.tag() == tag)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_ordered() {
        for (i, lang) in Language::ALL.iter().enumerate() {
            assert_eq!(lang.id() as usize, i);
        }
    }

    #[test]
    fn test_tag_roundtrip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_tag(lang.tag()), Some(lang));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert_eq!(Language::from_tag("FR"), None);
        assert_eq!(Language::from_tag("hi"), None); // tags are uppercase
    }

    #[test]
    fn test_serde_uses_tags() {
        let json: String = serde_json::to_string(&Language::Bengali).unwrap();
        assert_eq!(json, "\"BE\"");

        let lang: Language = serde_json::from_str("\"MA\"").unwrap();
        assert_eq!(lang, Language::Marathi);

        // An unsupported tag must fail deserialization, not default
        let bad: Result<Language, _> = serde_json::from_str("\"XX\"");
        assert!(bad.is_err());
    }
}
