//! Operator families.
//!
//! Each function receives already-resolved operands and returns
//! `Result<Value, ErrorKind>`.  The executor decides where operands come from
//! and where the result goes; nothing here touches memory.
//!
//! Numeric operators share one widening rule: Integer with Integer stays
//! Integer (32-bit, wrapping), anything involving a Float is computed in
//! Float, and Text is rejected unless the operator gives it a meaning.

use super::rng::Rng;
use super::value::{parse_float, parse_int, Value};
use crate::error::ErrorKind;

pub type OpResult = Result<Value, ErrorKind>;

/// Largest Text, in bytes, that `MUL` may build by repetition.
pub const MAX_TEXT_LEN: usize = 16 * 1024 * 1024;

fn type_error(op: &str, a: &Value, b: &Value) -> ErrorKind {
    ErrorKind::types(op, &[a.type_name(), b.type_name()])
}

fn unary_type_error(op: &str, a: &Value) -> ErrorKind {
    ErrorKind::types(op, &[a.type_name()])
}

/// Shared Integer/Float dispatch for the numeric binary operators.
fn numeric(
    op: &str,
    a: &Value,
    b: &Value,
    int_op: impl FnOnce(i32, i32) -> Result<i32, ErrorKind>,
    float_op: impl FnOnce(f32, f32) -> f32,
) -> OpResult {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int_op(*x, *y).map(Value::Int),
        _ => match (a.as_f32(), b.as_f32()) {
            (Some(x), Some(y)) => Ok(Value::Float(float_op(x, y))),
            _ => Err(type_error(op, a, b)),
        },
    }
}

fn integers(op: &str, a: &Value, b: &Value, f: impl FnOnce(i32, i32) -> i32) -> OpResult {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(f(*x, *y))),
        _ => Err(type_error(op, a, b)),
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

/// Concatenates when either side is Text.
pub fn add(a: &Value, b: &Value) -> OpResult {
    if a.is_text() || b.is_text() {
        return Ok(Value::Text(format!("{a}{b}")));
    }
    numeric("ADD", a, b, |x, y| Ok(x.wrapping_add(y)), |x, y| x + y)
}

pub fn sub(a: &Value, b: &Value) -> OpResult {
    numeric("SUB", a, b, |x, y| Ok(x.wrapping_sub(y)), |x, y| x - y)
}

/// Text times a positive Integer repeats the text.
pub fn mul(a: &Value, b: &Value) -> OpResult {
    if let (Value::Text(s), Value::Int(n)) = (a, b) {
        if *n < 1 {
            return Err(ErrorKind::range("cannot multiply a string by zero or a negative number"));
        }
        let count = *n as usize;
        if s.len().checked_mul(count).map_or(true, |len| len > MAX_TEXT_LEN) {
            return Err(ErrorKind::range(format!(
                "repeating a string of {} bytes {count} times exceeds the {MAX_TEXT_LEN} byte limit",
                s.len()
            )));
        }
        return Ok(Value::Text(s.repeat(count)));
    }
    numeric("MUL", a, b, |x, y| Ok(x.wrapping_mul(y)), |x, y| x * y)
}

/// Integer division truncates toward zero.
pub fn div(a: &Value, b: &Value) -> OpResult {
    numeric(
        "DIV",
        a,
        b,
        |x, y| {
            if y == 0 {
                Err(ErrorKind::DivisionByZero)
            } else {
                Ok(x.wrapping_div(y))
            }
        },
        |x, y| x / y,
    )
}

/// Integer remainder takes the sign of the dividend; Float modulo is
/// `a - floor(a / b) * b`, which never goes negative for a positive `b`.
pub fn modulo(a: &Value, b: &Value) -> OpResult {
    numeric(
        "MOD",
        a,
        b,
        |x, y| {
            if y == 0 {
                Err(ErrorKind::DivisionByZero)
            } else {
                Ok(x.wrapping_rem(y))
            }
        },
        float_mod,
    )
}

fn float_mod(a: f32, b: f32) -> f32 {
    let (x, y) = (f64::from(a), f64::from(b));
    let mut r = x - (x / y).floor() * y;
    if y > 0.0 {
        if r < 0.0 {
            r += y;
        }
        let r = r as f32;
        // Rounding to f32 can land exactly on b, which is congruent to 0.
        if r >= b {
            0.0
        } else {
            r
        }
    } else if y < 0.0 {
        if r > 0.0 {
            r += y;
        }
        let r = r as f32;
        if r <= b {
            0.0
        } else {
            r
        }
    } else {
        r as f32
    }
}

/// `RANDOM lo, hi`: Float in the range if either bound is Float, otherwise an
/// Integer in `[lo, hi)`.
pub fn random_range(a: &Value, b: &Value, rng: &mut Rng) -> OpResult {
    match (a, b) {
        (Value::Int(lo), Value::Int(hi)) => Ok(Value::Int(rng.range_i32(*lo, *hi))),
        _ => match (a.as_f32(), b.as_f32()) {
            (Some(lo), Some(hi)) => Ok(Value::Float(rng.range_f32(lo, hi))),
            _ => Err(type_error("RANDOM", a, b)),
        },
    }
}

// ── Bitwise ───────────────────────────────────────────────────────────────────

/// The shift count is taken modulo 32.
pub fn shl(a: &Value, b: &Value) -> OpResult {
    integers("SHL", a, b, |x, y| x.wrapping_shl(y as u32))
}

/// Arithmetic (sign-extending) shift.
pub fn shr(a: &Value, b: &Value) -> OpResult {
    integers("SHR", a, b, |x, y| x.wrapping_shr(y as u32))
}

pub fn inot(a: &Value) -> OpResult {
    match a {
        Value::Int(x) => Ok(Value::Int(!x)),
        _ => Err(unary_type_error("INOT", a)),
    }
}

pub fn iand(a: &Value, b: &Value) -> OpResult {
    integers("IAND", a, b, |x, y| x & y)
}

pub fn ior(a: &Value, b: &Value) -> OpResult {
    integers("IOR", a, b, |x, y| x | y)
}

pub fn ixor(a: &Value, b: &Value) -> OpResult {
    integers("IXOR", a, b, |x, y| x ^ y)
}

// ── Boolean ───────────────────────────────────────────────────────────────────

pub fn is_true(a: &Value) -> Value {
    Value::from(a.is_true())
}

pub fn is_false(a: &Value) -> Value {
    Value::from(!a.is_true())
}

pub fn and(a: &Value, b: &Value) -> Value {
    Value::from(a.is_true() && b.is_true())
}

pub fn or(a: &Value, b: &Value) -> Value {
    Value::from(a.is_true() || b.is_true())
}

pub fn xor(a: &Value, b: &Value) -> Value {
    Value::from(a.is_true() ^ b.is_true())
}

// ── Relational and type tests ─────────────────────────────────────────────────

/// Text comparison if either side is Text, numeric comparison otherwise.
pub fn is_eq(a: &Value, b: &Value) -> Value {
    let equal = match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        _ if a.is_text() || b.is_text() => a.render() == b.render(),
        _ => a.as_f32() == b.as_f32(),
    };
    Value::from(equal)
}

fn ordered(op: &str, a: &Value, b: &Value, want: std::cmp::Ordering) -> OpResult {
    let ord = match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        _ => match (a.as_f32(), b.as_f32()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => return Err(type_error(op, a, b)),
        },
    };
    Ok(Value::from(ord == Some(want)))
}

pub fn is_lt(a: &Value, b: &Value) -> OpResult {
    ordered("ISLT", a, b, std::cmp::Ordering::Less)
}

pub fn is_gt(a: &Value, b: &Value) -> OpResult {
    ordered("ISGT", a, b, std::cmp::Ordering::Greater)
}

pub fn typ_int(a: &Value) -> Value {
    Value::from(matches!(a, Value::Int(_)))
}

pub fn typ_flt(a: &Value) -> Value {
    Value::from(a.is_float())
}

pub fn typ_str(a: &Value) -> Value {
    Value::from(a.is_text())
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Ordinal of the character at a zero-based index.
pub fn str_get(text: &Value, index: &Value) -> OpResult {
    let Value::Int(i) = index else {
        return Err(type_error("STRGET", text, index));
    };
    let s = text.render();
    usize::try_from(*i)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .map(|c| Value::Int(c as i32))
        .ok_or_else(|| ErrorKind::range(format!("index {i} is outside a string of length {}", s.chars().count())))
}

pub fn str_len(text: &Value) -> Value {
    Value::Int(text.render().chars().count() as i32)
}

/// `length` characters starting at `start`; both must lie inside the text.
pub fn sub_str(text: &Value, start: &Value, length: &Value) -> OpResult {
    let (Value::Int(start), Value::Int(length)) = (start, length) else {
        return Err(type_error("SUBSTR", start, length));
    };
    let chars: Vec<char> = text.render().chars().collect();
    let bounds = usize::try_from(*start).ok().zip(usize::try_from(*length).ok());
    match bounds {
        Some((s, n)) if s.checked_add(n).is_some_and(|end| end <= chars.len()) => {
            Ok(Value::Text(chars[s..s + n].iter().collect()))
        }
        _ => Err(ErrorKind::range(format!(
            "substring at {start} of length {length} is outside a string of length {}",
            chars.len()
        ))),
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

fn to_integer(op: &str, a: &Value, f: impl FnOnce(f32) -> f32) -> OpResult {
    match a {
        Value::Int(n) => Ok(Value::Int(*n)),
        // `as` saturates out-of-range floats and maps NaN to 0.
        Value::Float(x) => Ok(Value::Int(f(*x) as i32)),
        Value::Text(_) => Err(unary_type_error(op, a)),
    }
}

pub fn floor(a: &Value) -> OpResult {
    to_integer("TOINT", a, f32::floor)
}

/// Halves round to the even neighbour.
pub fn round(a: &Value) -> OpResult {
    to_integer("RND", a, f32::round_ties_even)
}

pub fn ceil(a: &Value) -> OpResult {
    to_integer("CEIL", a, f32::ceil)
}

pub fn char_of(a: &Value) -> OpResult {
    let Value::Int(n) = a else {
        return Err(unary_type_error("CHAR", a));
    };
    u32::try_from(*n)
        .ok()
        .and_then(char::from_u32)
        .map(|c| Value::Text(c.to_string()))
        .ok_or_else(|| ErrorKind::range(format!("{n} is not a valid character code")))
}

/// Integer if the text parses as one, else Float.
pub fn parse_number(a: &Value) -> OpResult {
    let s = a.render();
    if let Some(n) = parse_int(&s) {
        return Ok(Value::Int(n));
    }
    parse_float(&s)
        .map(Value::Float)
        .ok_or(ErrorKind::InvalidNumber(s))
}

pub fn to_text(a: &Value) -> Value {
    Value::Text(a.render())
}

/// Uppercase base-16, negative values in two's complement.
pub fn hex(a: &Value) -> OpResult {
    match a {
        Value::Int(n) => Ok(Value::Text(format!("{n:X}"))),
        _ => Err(unary_type_error("HEX", a)),
    }
}

pub fn bin(a: &Value) -> OpResult {
    match a {
        Value::Int(n) => Ok(Value::Text(format!("{n:b}"))),
        _ => Err(unary_type_error("BIN", a)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
