//! Script directory configuration.
//!
//! Simple Batch programs live in one directory as `<NAME>.SB` files.  The
//! directory is chosen in this order:
//!
//! | Source | Example |
//! |--------|---------|
//! | `--dir <path>` on the command line | `sbat --dir ./scripts HELLO` |
//! | `SBAT_DIR` environment variable | `SBAT_DIR=/srv/sb sbat HELLO` |
//! | the per-user data directory | `~/.local/share/sbat/SBAT` |
//!
//! A directory that does not exist yet is created and seeded with `HELLO.SB`.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::info;

use crate::memory::Environment;

/// File extension of Simple Batch programs.
pub const EXTENSION: &str = "SB";

/// Environment variable naming the script directory.
pub const DIR_ENV: &str = "SBAT_DIR";

/// Sample program written into a freshly created script directory.
pub const HELLO_SCRIPT: &str = "ECHO 0
REM \"This is a test Simple Batch Program\"

LOG \"Hello, World!\"

VAR %1,\"MyName\"
TYPSTR %MyName%
IF
LOG \"Hello, %MyName%!\"
ENDIF
";

// ── Config ────────────────────────────────────────────────────────────────────

/// Where scripts are found and what environment they see.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub script_dir: PathBuf,
    pub extension: String,
    pub environment: Environment,
}

impl Config {
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
            extension: EXTENSION.to_owned(),
            environment: Environment::default(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Path of the program called `name`.
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.script_dir.join(format!("{name}.{}", self.extension))
    }

    /// Create the script directory if needed, seeding `HELLO.SB` into a new
    /// one.  Returns `true` when the directory was created.
    pub fn ensure_script_dir(&self) -> io::Result<bool> {
        if self.script_dir.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(&self.script_dir)?;
        let hello = self.script_path("HELLO");
        std::fs::write(&hello, HELLO_SCRIPT)?;
        info!(dir = %self.script_dir.display(), "created script directory");
        Ok(true)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Determine the script directory.
///
/// Priority: `--dir` CLI flag → `SBAT_DIR` env var → per-user data directory
/// → `./SBAT`.
pub fn resolve_script_dir(cli_override: Option<&Path>) -> PathBuf {
    resolve_from(cli_override, std::env::var_os(DIR_ENV))
}

fn resolve_from(cli_override: Option<&Path>, env: Option<OsString>) -> PathBuf {
    if let Some(d) = cli_override {
        return d.to_path_buf();
    }
    if let Some(d) = env.filter(|d| !d.is_empty()) {
        return PathBuf::from(d);
    }
    ProjectDirs::from("", "", "sbat")
        .map(|dirs| dirs.data_dir().join("SBAT"))
        .unwrap_or_else(|| PathBuf::from("SBAT"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
