//! Command-line argument parsing.
//!
//! Usage:
//!   sbat [--dir <dir>] [--dump-memory] [--seed <n>] [env options] <NAME> [, arg]...
//!
//! The invocation words are joined with single spaces and parsed like a host
//! console line, so `sbat HELLO, #Ada Lovelace#` passes `Ada Lovelace` as `%1`.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::memory::Environment;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "sbat", version)]
#[command(about = "Run a Simple Batch program")]
pub struct CliArgs {
    /// Program name followed by its comma-separated arguments
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
    pub invocation: Vec<String>,

    /// Script directory (overrides SBAT_DIR)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print the memory dump after a successful run
    #[arg(long)]
    pub dump_memory: bool,

    /// Seed for RANDOM, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report IN_DESIGNER as true
    #[arg(long)]
    pub in_designer: bool,

    /// Report IN_LEVEL as true
    #[arg(long)]
    pub in_level: bool,

    /// Value of LEVEL_NAME
    #[arg(long, default_value = "")]
    pub level_name: String,

    /// Value of MAP_NAME
    #[arg(long, default_value = "")]
    pub map_name: String,
}

impl CliArgs {
    /// The invocation as one console line.
    pub fn invocation_text(&self) -> String {
        self.invocation.join(" ")
    }

    /// Environment snapshot for a run started at `now`.
    pub fn environment(&self, now: NaiveDateTime) -> Environment {
        Environment {
            date: now.format("%A, %B %-d, %Y").to_string(),
            time: now.format("%-I:%M:%S %p").to_string(),
            in_designer: self.in_designer,
            in_level: self.in_level,
            level_name: self.level_name.clone(),
            map_name: self.map_name.clone(),
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Install the diagnostics subscriber.  `RUST_LOG` overrides the default
/// `warn` filter; output goes to stderr so it never mixes with script output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("sbat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn invocation_words_are_joined() {
        let a = parse(&["HELLO,", "#Ada", "Lovelace#,", "3"]);
        assert_eq!(a.invocation_text(), "HELLO, #Ada Lovelace#, 3");
        assert!(!a.dump_memory);
        assert_eq!(a.dir, None);
    }

    #[test]
    fn invocation_is_required() {
        assert!(CliArgs::try_parse_from(["sbat"]).is_err());
    }

    #[test]
    fn negative_numbers_are_arguments() {
        let a = parse(&["CALC,", "-5"]);
        assert_eq!(a.invocation_text(), "CALC, -5");
    }

    #[test]
    fn options() {
        let a = parse(&["--dir", "/tmp/sb", "--dump-memory", "--seed", "7", "--in-level", "--level-name", "Canyon", "X"]);
        assert_eq!(a.dir, Some(PathBuf::from("/tmp/sb")));
        assert!(a.dump_memory);
        assert_eq!(a.seed, Some(7));
        assert!(a.in_level);
        assert!(!a.in_designer);
        assert_eq!(a.level_name, "Canyon");
        assert_eq!(a.invocation, vec!["X"]);
    }

    #[test]
    fn environment_snapshot() {
        let a = parse(&["--in-designer", "--map-name", "Dunes", "X"]);
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .and_then(|d| d.and_hms_opt(15, 4, 5))
            .unwrap();
        let env = a.environment(now);
        assert_eq!(env.date, "Monday, October 19, 2026");
        assert_eq!(env.time, "3:04:05 PM");
        assert!(env.in_designer);
        assert!(!env.in_level);
        assert_eq!(env.map_name, "Dunes");
        assert_eq!(env.level_name, "");
    }
}
