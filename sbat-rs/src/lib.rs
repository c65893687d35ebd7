//! Simple Batch (SB) interpreter.
//!
//! The library holds the whole language: [`script`] tokenizes and runs
//! programs, [`memory`] models the 107-slot store and variable table, and
//! [`error`] defines the fatal errors a run can end with.  [`config`] and
//! [`cli`] support the `sbat` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod memory;
pub mod script;

pub use error::{ErrorKind, Result, ScriptError};
