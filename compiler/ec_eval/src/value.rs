//! Runtime values.
//!
//! A slot holds exactly one [`Value`]; the type tag is the variant itself, so
//! reassignment swaps tag and payload together.

use std::fmt;

use crate::format::format_number;

/// Handle into the array table. Arrays outlive the variable that created them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayId(pub(crate) usize);

impl ArrayId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle into the class registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub(crate) usize);

impl ClassId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Declared without a value.
    #[default]
    Null,
    Number(f64),
    Str(String),
    Array(ArrayId),
    Object(ClassId),
}

/// The runtime type tag of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Number,
    String,
    Array,
    Object,
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Number(_) => ValueType::Number,
            Value::Str(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Numeric view used by arithmetic.
    ///
    /// Strings convert by their longest numeric prefix; everything else that
    /// is not a number reads as zero.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Str(s) => numeric_prefix(s),
            Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
        }
    }

    /// Wrap captured text: a whole-string number becomes a Number.
    pub fn from_captured(text: String) -> Value {
        match parse_number(&text) {
            Some(n) => Value::Number(n),
            None => Value::Str(text),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Null => "null",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&format_number(other.to_number())),
        }
    }
}

/// Parse text that is a number in its entirety (leading whitespace allowed).
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

/// The value of the longest numeric prefix of `text`, or 0.
///
/// Accepts optional leading whitespace, a sign, digits with at most one
/// decimal point, and an exponent only when it has digits.
pub fn numeric_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(0.0)
}
