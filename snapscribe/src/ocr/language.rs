use std::fmt;

use crate::error::{Result, ScribeError};

/// OCR language codes understood by the service, paired with the name of the
/// matching Tesseract traineddata file.
const LANGUAGES: &[(&str, &str)] = &[
    ("ara", "ara"),
    ("bul", "bul"),
    ("chs", "chi_sim"),
    ("cht", "chi_tra"),
    ("hrv", "hrv"),
    ("cze", "ces"),
    ("dan", "dan"),
    ("dut", "nld"),
    ("eng", "eng"),
    ("fin", "fin"),
    ("fre", "fra"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("hun", "hun"),
    ("kor", "kor"),
    ("ita", "ita"),
    ("jpn", "jpn"),
    ("pol", "pol"),
    ("por", "por"),
    ("rus", "rus"),
    ("slv", "slv"),
    ("spa", "spa"),
    ("swe", "swe"),
    ("tha", "tha"),
    ("tur", "tur"),
    ("ukr", "ukr"),
    ("vnm", "vie"),
];

/// A validated OCR language hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
    tesseract: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language {
        code: "eng",
        tesseract: "eng",
    };

    /// Parse a user-supplied code. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        LANGUAGES
            .iter()
            .find(|(code, _)| *code == normalized)
            .map(|&(code, tesseract)| Language { code, tesseract })
            .ok_or_else(|| {
                ScribeError::Validation(format!("Unsupported language code: '{}'", raw.trim()))
            })
    }

    /// Parse an optional form value, falling back to `default` when it is
    /// absent or blank.
    pub fn parse_or(raw: Option<&str>, default: Language) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) => Self::parse(value),
        }
    }

    /// Code sent to the hosted OCR API.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Traineddata name used by the local Tesseract engine.
    pub fn tesseract_code(&self) -> &'static str {
        self.tesseract
    }

    pub fn supported_codes() -> impl Iterator<Item = &'static str> {
        LANGUAGES.iter().map(|(code, _)| *code)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
