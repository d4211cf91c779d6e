use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[A-Za-z]+\b").expect("word pattern is valid"))
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d+\b").expect("integer pattern is valid"))
}

fn digit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d$").expect("digit pattern is valid"))
}

/// Text recovered from one image, plus the tokens derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResult {
    pub extracted_content: String,
    pub words: Vec<String>,
    pub integers: Vec<i64>,
}

impl OcrResult {
    pub fn from_text(text: impl Into<String>) -> Self {
        let extracted_content = text.into();
        let words = extract_words(&extracted_content);
        let integers = extract_integers(&extracted_content);
        Self {
            extracted_content,
            words,
            integers,
        }
    }
}

/// Every standalone run of ASCII letters, in order, duplicates kept.
pub fn extract_words(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Every standalone run of decimal digits that fits in an `i64`, in order.
///
/// Any Unicode decimal digit counts, so Arabic-Indic `٤٢` and fullwidth `４２`
/// both yield `42`.
pub fn extract_integers(text: &str) -> Vec<i64> {
    integer_pattern()
        .find_iter(text)
        .filter_map(|m| {
            let value = parse_digits(m.as_str());
            if value.is_none() {
                tracing::debug!(token = m.as_str(), "Skipping out-of-range integer");
            }
            value
        })
        .collect()
}

fn parse_digits(token: &str) -> Option<i64> {
    token.chars().try_fold(0_i64, |acc, c| {
        let digit = decimal_value(c)?;
        acc.checked_mul(10)?.checked_add(i64::from(digit))
    })
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0_u8; 4];
    digit_pattern().is_match(c.encode_utf8(&mut buf))
}

/// Numeric value of a decimal digit in any script.
///
/// Decimal digits are encoded in contiguous runs starting at zero, so the value
/// is the offset from the start of the run, modulo ten.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = u32::from(c);
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((u32::from(c) - start) % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_words_and_integers_in_order() {
        let result = OcrResult::from_text("Invoice 42 due on March 7, total 1999 USD");
        assert_eq!(
            result.words,
            vec!["Invoice", "due", "on", "March", "total", "USD"]
        );
        assert_eq!(result.integers, vec![42, 7, 1999]);
        assert_eq!(
            result.extracted_content,
            "Invoice 42 due on March 7, total 1999 USD"
        );
    }

    #[test]
    fn test_mixed_alnum_tokens_are_ignored() {
        assert!(extract_words("abc123 x9y").is_empty());
        assert!(extract_integers("abc123 9y").is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(extract_words("to be or not to be"), vec!["to", "be", "or", "not", "to", "be"]);
        assert_eq!(extract_integers("1 1 2"), vec![1, 1, 2]);
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        assert_eq!(extract_words("well-known e.g."), vec!["well", "known", "e", "g"]);
        assert_eq!(extract_integers("3.14 and 2024-01-05"), vec![3, 14, 2024, 1, 5]);
    }

    #[test]
    fn test_leading_zeros_parse() {
        assert_eq!(extract_integers("007"), vec![7]);
    }

    #[test]
    fn test_oversized_integer_is_skipped() {
        assert_eq!(
            extract_integers("12 99999999999999999999999 34"),
            vec![12, 34]
        );
    }

    #[test]
    fn test_non_ascii_digits_are_integers() {
        assert_eq!(
            extract_integers("Total ٤٢ and ４２ and 42"),
            vec![42, 42, 42]
        );
        assert_eq!(extract_integers("पृष्ठ ७ of ۱۰"), vec![7, 10]);
    }

    #[test]
    fn test_decimal_value_across_scripts() {
        assert_eq!(decimal_value('9'), Some(9));
        assert_eq!(decimal_value('٠'), Some(0));
        assert_eq!(decimal_value('９'), Some(9));
        // Mathematical digits are five consecutive sets of ten.
        assert_eq!(decimal_value('\u{1D7D7}'), Some(9));
        assert_eq!(decimal_value('\u{1D7D8}'), Some(0));
        assert_eq!(decimal_value('x'), None);
    }

    #[test]
    fn test_non_ascii_letters_are_not_words() {
        assert_eq!(extract_words("café naïve plain"), vec!["plain"]);
    }

    #[test]
    fn test_empty_text() {
        let result = OcrResult::from_text("");
        assert!(result.words.is_empty());
        assert!(result.integers.is_empty());
    }
}
