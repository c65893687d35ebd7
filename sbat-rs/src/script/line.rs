//! Line tokenizer.
//!
//! An escaped SB line is a command keyword (a run of ASCII letters, after
//! optional leading whitespace) followed by comma-separated argument tokens:
//!
//! ```text
//! ADD 5, 3, %&total%
//! LOG "Hello, %NAME%!"
//! ```
//!
//! A token is either a double-quoted run or a run of characters that are
//! neither whitespace nor commas.  A quoted run closes at the first `"` that is
//! followed by optional whitespace and then a comma or the end of the line, so
//! quotes elsewhere inside it are content.  Tokens keep their quotes; the value
//! resolver strips them.
//!
//! Tokenizing never backtracks: each character is inspected a bounded number
//! of times.

/// Maximum number of argument tokens read from one line.
pub const MAX_ARGS: usize = 9;

/// A tokenized line: the command keyword as written and its raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub command: String,
    pub args: Vec<String>,
}

/// Split an already-escaped line into command and argument tokens.
///
/// Returns `None` for blank lines and lines that do not start with a keyword.
/// The first token that breaks the grammar ends the argument list; tokens read
/// before it are kept.
pub fn tokenize(line: &str) -> Option<Line> {
    let chars: Vec<char> = line.chars().collect();
    let start = skip_ws(&chars, 0);
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_alphabetic() {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some(Line {
        command: chars[start..end].iter().collect(),
        args: read_args(&chars, end, MAX_ARGS),
    })
}

/// Split a bare argument list (no command keyword) into at most `limit` tokens.
pub fn split_args(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    read_args(&chars, 0, limit)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_args(chars: &[char], mut pos: usize, limit: usize) -> Vec<String> {
    let mut args = Vec::new();
    while args.len() < limit {
        let Some((token, next)) = read_arg(chars, pos) else {
            break;
        };
        args.push(token);
        pos = next;
    }
    args
}

/// Read one `token [ws] (',' | end)` item starting at `pos`.
///
/// Returns the token and the position just past its separator.
fn read_arg(chars: &[char], pos: usize) -> Option<(String, usize)> {
    let start = skip_ws(chars, pos);
    match chars.get(start)? {
        '"' => {
            let mut k = start + 1;
            while k < chars.len() {
                if chars[k] == '"' {
                    if let Some(next) = separator(chars, k + 1) {
                        return Some((chars[start..=k].iter().collect(), next));
                    }
                }
                k += 1;
            }
            None
        }
        _ => {
            let mut end = start;
            while end < chars.len() && !chars[end].is_whitespace() && chars[end] != ',' {
                end += 1;
            }
            if end == start {
                return None;
            }
            let next = separator(chars, end)?;
            Some((chars[start..end].iter().collect(), next))
        }
    }
}

/// Accept optional whitespace then a comma or the end of the line.
fn separator(chars: &[char], pos: usize) -> Option<usize> {
    let after = skip_ws(chars, pos);
    match chars.get(after) {
        None => Some(after),
        Some(',') => Some(after + 1),
        Some(_) => None,
    }
}

fn skip_ws(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

// ── Tests ─────────────────────────────────────────────────────────────────────
