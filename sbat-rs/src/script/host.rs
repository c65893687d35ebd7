//! Host services a script can reach.
//!
//! The interpreter never prints or spawns anything itself.  `LOG`/`LOGW`/
//! `LOGE`, `EXE`, `CLS`, command echo and unknown-command diagnostics all go
//! through the [`Host`] the interpreter was built with.

/// Severity of a line sent to the host log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Effects owned by the embedding application.
pub trait Host {
    /// Append a line to the host log.
    fn log(&mut self, level: LogLevel, message: &str);

    /// Run an opaque host command (`EXE`).
    fn execute(&mut self, command: &str);

    /// Clear the host log (`CLS`).
    fn clear_log(&mut self);

    /// Show an executed command line while echo is on.
    fn echo(&mut self, line: &str) {
        self.log(LogLevel::Info, line);
    }
}

/// A host that records every effect in memory.
#[derive(Debug, Default, Clone)]
pub struct BufferHost {
    /// Log lines, in order.
    pub log: Vec<(LogLevel, String)>,
    /// Echoed command lines, kept apart from the log.
    pub echoed: Vec<String>,
    /// Commands passed to `EXE`.
    pub executed: Vec<String>,
    /// Number of `CLS` requests.
    pub clears: usize,
}

impl BufferHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log lines at one level.
    pub fn lines(&self, level: LogLevel) -> Vec<&str> {
        self.log
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Host for BufferHost {
    fn log(&mut self, level: LogLevel, message: &str) {
        self.log.push((level, message.to_owned()));
    }

    fn execute(&mut self, command: &str) {
        self.executed.push(command.to_owned());
    }

    fn clear_log(&mut self) {
        self.clears += 1;
    }

    fn echo(&mut self, line: &str) {
        self.echoed.push(line.to_owned());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
