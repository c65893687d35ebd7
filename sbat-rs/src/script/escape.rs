//! Backslash and hash escape processing.
//!
//! Every script line and every invocation string passes through [`process`]
//! before it is tokenized.  The pass is a single left-to-right walk with at
//! most eight characters of lookahead, so it is linear in the input length.
//!
//! | Sequence        | Result                                            |
//! |-----------------|---------------------------------------------------|
//! | `\\ \" \'`      | the character itself                              |
//! | `\0 \a \b \f \n \r \t \v` | the matching control character          |
//! | `\uHHHH`        | code point from exactly 4 hex digits              |
//! | `\UHHHHHHHH`    | code point from exactly 8 hex digits              |
//! | `\xH`..`\xHHHH` | code point from the longest valid run of 1-4 hex digits |
//! | `\<other>`      | `<other>` (backslash dropped)                     |
//! | trailing `\`    | kept literally                                    |
//! | `##`            | `#` (invocation mode only)                        |
//! | `#`, `\#`       | `"` (invocation mode only)                        |

/// Which escape set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// A line of a script file.
    Script,
    /// A host command line that starts a script.  Adds the `#` forms so a
    /// console can supply quoted strings without typing quote characters.
    Invocation,
}

/// Apply escape sequences to `text`.
pub fn process(text: &str, mode: EscapeMode) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\\' => {
                let Some(&next) = chars.get(i + 1) else {
                    out.push('\\');
                    break;
                };
                i += 2;
                match next {
                    '\\' | '"' | '\'' => out.push(next),
                    '0' => out.push('\0'),
                    'a' => out.push('\x07'),
                    'b' => out.push('\x08'),
                    'f' => out.push('\x0c'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\x0b'),
                    'u' | 'U' => {
                        let width = if next == 'u' { 4 } else { 8 };
                        if hex_run(&chars[i..], width) == width {
                            out.push(code_point(&chars[i..i + width]));
                            i += width;
                        } else {
                            out.push(next);
                        }
                    }
                    'x' => {
                        // Back off to a shorter run when the longer one is a surrogate.
                        let run = hex_run(&chars[i..], 4);
                        let decoded = (1..=run)
                            .rev()
                            .find_map(|n| scalar(&chars[i..i + n]).map(|c| (n, c)));
                        if let Some((n, c)) = decoded {
                            out.push(c);
                            i += n;
                        }
                    }
                    '#' if mode == EscapeMode::Invocation => out.push('"'),
                    other => out.push(other),
                }
            }
            '#' if mode == EscapeMode::Invocation => {
                if chars.get(i + 1) == Some(&'#') {
                    out.push('#');
                    i += 2;
                } else {
                    out.push('"');
                    i += 1;
                }
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }
    out
}

/// Length of the leading run of hex digits in `chars`, capped at `max`.
fn hex_run(chars: &[char], max: usize) -> usize {
    chars
        .iter()
        .take(max)
        .take_while(|c| c.is_ascii_hexdigit())
        .count()
}

/// Decode a run of hex digits; non-scalar values become U+FFFD.
fn code_point(digits: &[char]) -> char {
    scalar(digits).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn scalar(digits: &[char]) -> Option<char> {
    let s: String = digits.iter().collect();
    u32::from_str_radix(&s, 16).ok().and_then(char::from_u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
