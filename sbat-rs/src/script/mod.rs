//! Simple Batch scripting language.
//!
//! A line-oriented interpreter for SB programs, covering:
//!
//! - Escape processing and the comma-separated line grammar
//! - `%` references to invocation arguments, variables and reserved names
//! - Arithmetic, bitwise, boolean, relational and text commands
//! - Control flow: `IF` … `ENDIF`, `GOTO` / `POS`, `QUIT`
//! - Host effects (`LOG`, `EXE`, `CLS`, command echo) through [`Host`]
//!
//! # Quick start
//!
//! ```rust
//! use sbat::script::{BufferHost, Interpreter, Invocation, LogLevel, Program};
//!
//! let mut host = BufferHost::new();
//! let program = Program::new("ECHO 0\nMUL 6, 7\nLOG \"%REGISTER%\"");
//! Interpreter::new(&mut host)
//!     .run(&program, &Invocation::parse("ANSWER"))
//!     .unwrap();
//! assert_eq!(host.lines(LogLevel::Info), vec!["42"]);
//! ```

pub mod command;
pub mod escape;
pub mod expand;
pub mod host;
pub mod interp;
pub mod line;
pub mod ops;
pub mod rng;
pub mod value;

// Re-exports for convenience.
pub use command::Command;
pub use host::{BufferHost, Host, LogLevel};
pub use interp::{Interpreter, Invocation, Program, RunReport};
pub use value::Value;
