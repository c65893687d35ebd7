//! `%` reference substitution.
//!
//! Text arguments may refer to memory with the following sequences:
//!
//! | Sequence    | Meaning                                                 |
//! |-------------|---------------------------------------------------------|
//! | `%%`        | a literal `%`                                           |
//! | `%D`        | invocation argument D (a single digit 0-9)              |
//! | `%NAME%`    | the value of a reserved name or declared variable       |
//! | `%&NAME%`   | the slot index of `NAME`, as an Integer                 |
//!
//! A `%` at the very end of the text is dropped, as is an unterminated
//! `%NAME` together with the rest of the text.

use crate::error::ErrorKind;
use crate::memory::Memory;
use crate::script::value::Value;

/// How references are combined with the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subst {
    /// A text that is exactly one reference yields the referenced value with
    /// its own type; anything else is interpolated.
    Native,
    /// Always interpolate and return Text.
    Composite,
}

/// Resolve the references in `value`.  Non-text values pass through.
pub fn substitute(value: &Value, mode: Subst, memory: &Memory) -> Result<Value, ErrorKind> {
    let Value::Text(src) = value else {
        return Ok(value.clone());
    };
    if !src.contains('%') {
        return Ok(value.clone());
    }

    let mut out = String::with_capacity(src.len());
    let mut single: Option<Value> = None;
    let mut refs = 0usize;
    let mut literal = false;
    let mut chars = src.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            literal = true;
            continue;
        }
        let Some(next) = chars.next() else { break };
        let resolved = if next == '%' {
            out.push('%');
            literal = true;
            continue;
        } else if let Some(digit) = next.to_digit(10) {
            memory.get(digit as usize).cloned().unwrap_or_default()
        } else {
            let mut name = String::from(next);
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '%' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            if !closed {
                break;
            }
            resolve_name(&name, memory)?
        };
        refs += 1;
        out.push_str(&resolved.render());
        single = Some(resolved);
    }

    match (mode, refs, literal, single) {
        (Subst::Native, 1, false, Some(v)) => Ok(v),
        _ => Ok(Value::Text(out)),
    }
}

/// Resolve one `%NAME%` body.  A leading `&` asks for the slot index.
pub fn resolve_name(name: &str, memory: &Memory) -> Result<Value, ErrorKind> {
    let (bare, address) = match name.strip_prefix('&') {
        Some(rest) => (rest, true),
        None => (name, false),
    };
    let index = memory
        .lookup(bare)
        .ok_or_else(|| ErrorKind::UndeclaredVariable(bare.to_owned()))?;
    if address {
        // Slot indices are below 107.
        Ok(Value::Int(index as i32))
    } else {
        Ok(memory.get(index).cloned().unwrap_or_default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
