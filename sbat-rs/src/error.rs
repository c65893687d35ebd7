//! Error types.
//!
//! Only fatal conditions are represented here: a fatal error aborts the whole
//! run.  Unparsable lines and unknown commands are not errors; the executor
//! skips or reports them and carries on.

use thiserror::Error;

/// Result type alias for whole-script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// What went wrong while executing a single command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("cannot be called with {given} arguments")]
    ArgumentCount { given: usize },

    #[error("{0}")]
    Type(String),

    #[error("{0}")]
    Range(String),

    #[error("the variable \"{0}\" is not declared in the Simple Batch program")]
    UndeclaredVariable(String),

    #[error("cannot declare new variable: memory array full")]
    MemoryExhausted,

    #[error("cannot declare variable \"{0}\": names cannot be empty or start with a percent sign or digit")]
    InvalidName(String),

    #[error("failed to parse the string as a number: {0}")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("slot {0} is read-only")]
    ReadOnlySlot(usize),
}

impl ErrorKind {
    /// Build a type error naming the operator and its operand tags.
    pub fn types(op: &str, tags: &[&str]) -> Self {
        ErrorKind::Type(format!("{op} cannot be applied to operands of type {}", tags.join(" and ")))
    }

    pub fn range(message: impl Into<String>) -> Self {
        ErrorKind::Range(message.into())
    }
}

/// A fatal error, with the source line and command that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {command}: {kind}")]
pub struct ScriptError {
    /// 1-based line number, or 0 for errors raised before the first line.
    pub line: usize,
    pub command: String,
    pub kind: ErrorKind,
}

impl ScriptError {
    pub fn new(line: usize, command: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            line,
            command: command.into(),
            kind,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
