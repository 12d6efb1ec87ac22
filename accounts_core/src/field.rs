use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// The kinds of input a form field can hold. The kind decides which
/// keystrokes are allowed through to the form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum FieldType {
    /// Letters only (names).
    Text,

    /// Anything, but stored as a float.
    Number,

    /// Free-form; the server validates it.
    Email,

    /// Free-form, rendered masked.
    Password,
}

impl FieldType {
    /// Filter a raw edit. Returns the value to store if the edit is allowed,
    /// or `None` if the keystroke should be dropped and the field left as it
    /// was.
    ///
    /// Numbers are never rejected: anything that does not start with a number
    /// becomes `NaN` and is passed along as such.
    pub fn accept(self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Number => Some(FieldValue::Number(parse_float(raw))),
            Self::Text => {
                if raw.is_empty() || raw.chars().all(|c| c.is_ascii_alphabetic()) {
                    Some(FieldValue::Text(raw.to_owned()))
                } else {
                    None
                }
            }
            Self::Email | Self::Password => Some(FieldValue::Text(raw.to_owned())),
        }
    }

    /// Should the value be hidden when rendered?
    pub fn is_masked(self) -> bool {
        matches!(self, Self::Password)
    }

    /// Check a stored value before the form is sent. Every field is
    /// required; numbers and emails also have to look like one.
    ///
    /// ## Errors
    ///
    /// Returns the first thing wrong with the value.
    pub fn check(self, value: Option<&FieldValue>) -> Result<(), Problem> {
        match value {
            None => Err(Problem::Missing),
            Some(FieldValue::Number(number)) if number.is_nan() => Err(Problem::NotANumber),
            Some(FieldValue::Number(_)) => Ok(()),
            Some(FieldValue::Text(text)) if text.is_empty() => Err(Problem::Missing),
            Some(FieldValue::Text(text)) => match self {
                Self::Number if parse_float(text).is_nan() => Err(Problem::NotANumber),
                Self::Email if !looks_like_email(text) => Err(Problem::NotAnEmail),
                _ => Ok(()),
            },
        }
    }
}

/// Why a field can't be sent yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("Please fill out this field.")]
    Missing,

    #[error("Please enter a number.")]
    NotANumber,

    #[error("Please enter an email address.")]
    NotAnEmail,
}

/// Something before and after a single `@`, and no whitespace.
fn looks_like_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !text.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// A single value in the form: either what the user typed, or a parsed number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A string value.
    Text(String),

    /// A parsed numeric value. May be `NaN`, which serializes as `null`.
    Number(f64),
}

impl FieldValue {
    /// An empty text value, the default for every field in a fresh form.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Read a value out of a JSON response body. Only strings and numbers
    /// make sense in a form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            serde_json::Value::Number(number) => number.as_f64().map(Self::Number),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) if number.is_nan() => Ok(()),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Parse a float the way a browser's `parseFloat` does: skip leading
/// whitespace, then read the longest prefix that is a number. Returns `NaN`
/// if there is no such prefix.
pub fn parse_float(raw: &str) -> f64 {
    let trimmed = raw.trim_start();

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if unsigned.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let prefix_len = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .last()
        .map_or(0, |(idx, c)| idx + c.len_utf8());

    // everything in the prefix is ASCII, so any byte index is a char boundary
    let candidate = &trimmed[..prefix_len];

    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
