use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw value collected from a form field. Numeric inputs often arrive as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
    /// Unanswered field sent as JSON `null`.
    Empty,
}

impl FieldValue {
    fn as_text(&self) -> String {
        match self {
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(flag) => flag.to_string(),
            FieldValue::Empty => String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Empty => true,
            FieldValue::Number(_) | FieldValue::Flag(_) => false,
        }
    }
}

/// Flat name → value mapping exactly as submitted by the intake form.
///
/// Readers never fail: unparseable input degrades to the documented default so a
/// partially filled form still produces a diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert for string values.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, FieldValue::Text(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the field is present with a non-blank value.
    pub fn is_present(&self, key: &str) -> bool {
        self.0.get(key).map(|value| !value.is_blank()).unwrap_or(false)
    }

    /// Trimmed text of a field, `None` when missing or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(FieldValue::as_text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Numeric value of a field, 0 when missing or unparseable.
    pub fn number(&self, key: &str) -> f64 {
        self.optional_number(key).unwrap_or(0.0)
    }

    /// Numeric value of a field, distinguishing absent input from zero.
    pub fn optional_number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            FieldValue::Number(value) if value.is_finite() => Some(*value),
            FieldValue::Number(_) | FieldValue::Flag(_) | FieldValue::Empty => None,
            FieldValue::Text(text) => parse_leading_number(text),
        }
    }

    /// Yes/no radio answers are true only for an explicit `oui`.
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(FieldValue::Flag(flag)) => *flag,
            Some(FieldValue::Text(text)) => text.trim().eq_ignore_ascii_case("oui"),
            _ => false,
        }
    }

    /// Checkbox state: browsers submit `on`, JSON clients may send a boolean.
    pub fn checked(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(FieldValue::Flag(flag)) => *flag,
            Some(FieldValue::Number(value)) => *value != 0.0,
            Some(FieldValue::Text(text)) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "on" | "oui" | "true" | "1"
            ),
            Some(FieldValue::Empty) | None => false,
        }
    }

    /// Calendar date in `YYYY-MM-DD`, `None` when missing or malformed.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        let raw = self.text(key)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()
    }
}

impl FromIterator<(String, FieldValue)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse the longest numeric prefix of `raw`, ignoring surrounding whitespace.
///
/// `"12.5 kg"` yields 12.5 and `"abc"` yields `None`. Infinite or NaN results are rejected.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+') | Some(b'-')) {
            exponent_end += 1;
        }
        let digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > digits_start {
            end = exponent_end;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
