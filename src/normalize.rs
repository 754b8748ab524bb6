//! Field normalization shared by the static and dynamic extractors.
//!
//! Every function here is total over its input: missing or garbled text
//! maps to the field's empty default rather than an error.

use std::sync::LazyLock;

use regex::Regex;

use tracing::warn;

/// Sentinel used for string fields whose sub-node was missing.
pub const PLACEHOLDER: &str = "N/A";

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("decimal pattern is valid"));

static NUMBER_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("number group pattern is valid"));

/// How a review/rating count is read out of free text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountFormat {
    /// Strip every non-digit character and parse what remains.
    #[default]
    AllDigits,
    /// Take the first number (digits with optional thousands separators).
    ///
    /// Suits labels such as "1,024 Ratings & 56 Reviews" where stripping
    /// all non-digits would glue two numbers together.
    FirstNumber,
}

/// Trims text, falling back to [`PLACEHOLDER`] when absent or blank.
pub fn text_or_placeholder(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Parses a price by keeping only digits and dots.
///
/// Returns `0.0` for anything that is not a finite positive number.
pub fn price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Extracts the first `\d+\.\d+` match as a rating.
///
/// Values outside `0.0..=5.0` are not ratings and yield `0.0`.
pub fn rating(raw: &str) -> f64 {
    DECIMAL
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| (0.0..=5.0).contains(value))
        .unwrap_or(0.0)
}

/// Parses a review count according to `format`; absence yields `0`.
///
/// Counts too large for `u64` saturate to `u64::MAX`.
pub fn count(raw: &str, format: CountFormat) -> u64 {
    let digits: String = match format {
        CountFormat::AllDigits => raw.chars().filter(char::is_ascii_digit).collect(),
        CountFormat::FirstNumber => NUMBER_GROUP
            .find(raw)
            .map(|m| m.as_str().replace(',', ""))
            .unwrap_or_default(),
    };

    if digits.is_empty() {
        return 0;
    }

    digits.parse::<u64>().unwrap_or_else(|e| {
        warn!("Review count '{}' saturated: {}", digits, e);
        u64::MAX
    })
}
