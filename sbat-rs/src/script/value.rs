//! Runtime value type for Simple Batch scripts.
//!
//! SB is dynamically typed with exactly three value kinds.  A `Text` never
//! silently turns into a number: every operator decides for itself which tag
//! combinations it accepts (see [`super::ops`]).

use std::fmt;

/// A Simple Batch runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Text(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => {
                if x.is_infinite() {
                    f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
                } else {
                    // Shortest round-trip form: 1.0 renders as "1", 0.1 as "0.1".
                    write!(f, "{x}")
                }
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Value {
    /// Truthiness used by IF, ECHO and the boolean operators.
    ///
    /// A negative Float is false while a negative Integer is true.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x > 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Render as text (clones for Text, formats for numeric variants).
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Name of the tag, as shown in diagnostics and memory dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Widen a numeric value to `f32`.  `None` for Text.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Int(n) => Some(*n as f32),
            Value::Float(x) => Some(*x),
            Value::Text(_) => None,
        }
    }

    /// Convert a raw argument token into a value.
    ///
    /// With `force_text` the token is only unquoted.  Otherwise an empty token
    /// is Integer 0, then Integer, Float and case-insensitive Boolean parses are
    /// tried in that order before falling back to unquoted Text.
    pub fn from_token(token: &str, force_text: bool) -> Value {
        if force_text {
            return Value::Text(unquote(token).to_owned());
        }
        if token.is_empty() {
            return Value::Int(0);
        }
        if let Some(n) = parse_int(token) {
            return Value::Int(n);
        }
        if let Some(x) = parse_float(token) {
            return Value::Float(x);
        }
        if token.eq_ignore_ascii_case("true") {
            return Value::Int(1);
        }
        if token.eq_ignore_ascii_case("false") {
            return Value::Int(0);
        }
        Value::Text(unquote(token).to_owned())
    }
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Parse a 32-bit signed integer, tolerating surrounding whitespace.
pub fn parse_int(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

/// Parse a 32-bit float written in plain decimal or exponent notation.
///
/// Rust's float parser also accepts `inf`/`nan` spellings; those are left
/// as Text so that a token like `nan` stays a word.
pub fn parse_float(s: &str) -> Option<f32> {
    let s = s.trim();
    let numeric = s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !numeric {
        return None;
    }
    s.parse().ok()
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Int(if b { 1 } else { 0 })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
