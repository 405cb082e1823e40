//! Construction of a single teos invocation.
//!
//! The calling convention is fixed:
//!
//! ```text
//! <exe> <verb> <subverb> --jarg <json-text> --both [-V]
//! ```
//!
//! and the working directory is the executable's own directory, because the
//! tool resolves relative paths against itself.

use crate::jarg::ArgumentMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Flag introducing the JSON argument.
pub const JARG_FLAG: &str = "--jarg";
/// Flag asking for both human-readable and JSON output.
pub const BOTH_FLAG: &str = "--both";
/// Flag asking the tool for a verbose report.
pub const VERBOSE_FLAG: &str = "-V";

/// Two-token command selector, e.g. `get account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerbPair {
    /// First token.
    pub verb: &'static str,
    /// Second token.
    pub subverb: &'static str,
}

impl VerbPair {
    /// Create a verb pair.
    #[must_use]
    pub const fn new(verb: &'static str, subverb: &'static str) -> Self {
        Self { verb, subverb }
    }
}

impl fmt::Display for VerbPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.subverb)
    }
}

/// A fully built invocation: program, argument vector and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments, excluding the program itself.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub current_dir: PathBuf,
}

impl ToolInvocation {
    /// The JSON text passed after `--jarg`, if present.
    #[must_use]
    pub fn jarg(&self) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == JARG_FLAG)
            .and_then(|index| self.args.get(index + 1))
            .map(String::as_str)
    }

    /// The argument map parsed back from `--jarg`.
    #[must_use]
    pub fn jarg_value(&self) -> Option<serde_json::Value> {
        self.jarg().and_then(|text| serde_json::from_str(text).ok())
    }

    /// Returns `true` if the verbose flag was passed.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.args.iter().any(|arg| arg == VERBOSE_FLAG)
    }

    /// The verb pair as passed on the command line.
    #[must_use]
    pub fn verb_pair(&self) -> Option<(&str, &str)> {
        match (self.args.first(), self.args.get(1)) {
            (Some(verb), Some(subverb)) => Some((verb, subverb)),
            _ => None,
        }
    }

    /// Command description for logging.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} {}", self.program.display(), self.args.join(" "))
    }
}

/// Builder for [`ToolInvocation`].
#[derive(Debug)]
pub struct ToolCommand {
    program: PathBuf,
    verb: VerbPair,
    jarg: String,
    verbose: bool,
}

impl ToolCommand {
    /// Start building an invocation of `program` for `verb`.
    #[must_use]
    pub fn new(program: impl AsRef<Path>, verb: VerbPair) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            verb,
            jarg: "{}".to_string(),
            verbose: false,
        }
    }

    /// Set the argument map.
    #[must_use]
    pub fn jarg(mut self, arguments: &ArgumentMap) -> Self {
        self.jarg = arguments.to_json_text();
        self
    }

    /// Request the verbose report.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Finish the invocation.
    #[must_use]
    pub fn build(self) -> ToolInvocation {
        let mut args = vec![
            self.verb.verb.to_string(),
            self.verb.subverb.to_string(),
            JARG_FLAG.to_string(),
            self.jarg,
            BOTH_FLAG.to_string(),
        ];
        if self.verbose {
            args.push(VERBOSE_FLAG.to_string());
        }

        let current_dir = self
            .program
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        ToolInvocation {
            program: self.program,
            args,
            current_dir,
        }
    }
}

/// Raw output of one process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Standard output (human-readable channel).
    pub stdout: Vec<u8>,
    /// Standard error (diagnostic channel).
    pub stderr: Vec<u8>,
    /// Exit status code, `-1` when terminated by a signal.
    pub exit_code: i32,
}

impl RawOutput {
    /// Output built from text, mostly useful for scripted runners.
    #[must_use]
    pub fn from_text(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into().into_bytes(),
            stderr: stderr.into().into_bytes(),
            exit_code: 0,
        }
    }

    /// Get stdout as a UTF-8 string, replacing invalid characters.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a UTF-8 string, replacing invalid characters.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}
