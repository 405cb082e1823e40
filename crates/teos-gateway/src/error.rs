//! Error types for teos invocations.
//!
//! Every failure the gateway or the command catalog can report is a
//! [`GatewayError`]. Variants are grouped into an [`ErrorKind`] so callers can
//! tell a missing executable apart from a business error the tool printed.

use crate::reply::Reply;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The executable could not be found, spawned or awaited.
    Invocation,
    /// The tool ran and printed an `ERROR` report.
    ToolReported,
    /// The reply did not carry what a typed projection needed.
    ReplyDecoding,
    /// A local refusal before the tool was invoked.
    Precondition,
    /// Configuration could not be loaded or resolved.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invocation => "invocation",
            Self::ToolReported => "tool-reported",
            Self::ReplyDecoding => "reply-decoding",
            Self::Precondition => "precondition",
            Self::Configuration => "configuration",
        };
        f.write_str(s)
    }
}

/// Errors that can occur while driving the teos executable.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The executable could not be spawned or its output collected.
    #[error("failed to invoke {program}: {message}")]
    Invocation {
        /// Path of the executable.
        program: PathBuf,
        /// Description of the OS-level failure.
        message: String,
    },

    /// The tool reported an error on its human-readable channel.
    #[error("teos {command} reported an error: {summary}")]
    ToolReported {
        /// Verb pair that failed, e.g. `get account`.
        command: String,
        /// First line of the human-readable output.
        summary: String,
        /// Full human-readable output.
        output: String,
        /// Whatever arrived on the diagnostic channel.
        reply: Reply,
    },

    /// A typed reply could not be built from the tool's answer.
    #[error("unexpected reply to teos {command}: {detail}")]
    UnexpectedReply {
        /// Verb pair whose reply was inspected.
        command: String,
        /// What was missing or malformed.
        detail: String,
    },

    /// A contract definition already exists where a new one was requested.
    #[error("{name} is an existing contract definition")]
    ContractExists {
        /// Contract name as given by the caller.
        name: String,
    },

    /// A contract directory exists in neither workspace.
    #[error("{dir} is not an existing contract definition")]
    ContractNotFound {
        /// Contract directory as given by the caller.
        dir: String,
    },

    /// A write was attempted on a contract from the system workspace.
    #[error("cannot modify system contracts: {name}")]
    ReadOnlyContract {
        /// Contract name.
        name: String,
    },

    /// Configuration is missing or invalid.
    #[error("configuration error in {path}: {message}")]
    Config {
        /// Configuration file involved.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// The node could not be launched in its own terminal.
    #[error("failed to launch node: {message}")]
    Launch {
        /// Description of the failure.
        message: String,
    },

    /// IO error (workspace directories, config file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Creates an `Invocation` error.
    #[must_use]
    pub fn invocation(program: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invocation {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Creates a `ToolReported` error from the captured channels.
    #[must_use]
    pub fn tool_reported(command: impl Into<String>, output: impl Into<String>, reply: Reply) -> Self {
        let output = output.into();
        let summary = output.lines().next().unwrap_or_default().trim().to_string();
        Self::ToolReported {
            command: command.into(),
            summary,
            output,
            reply,
        }
    }

    /// Creates an `UnexpectedReply` error.
    #[must_use]
    pub fn unexpected_reply(command: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnexpectedReply {
            command: command.into(),
            detail: detail.into(),
        }
    }

    /// Creates a `ContractExists` error.
    #[must_use]
    pub fn contract_exists(name: impl Into<String>) -> Self {
        Self::ContractExists { name: name.into() }
    }

    /// Creates a `ContractNotFound` error.
    #[must_use]
    pub fn contract_not_found(dir: impl Into<String>) -> Self {
        Self::ContractNotFound { dir: dir.into() }
    }

    /// Creates a `ReadOnlyContract` error.
    #[must_use]
    pub fn read_only_contract(name: impl Into<String>) -> Self {
        Self::ReadOnlyContract { name: name.into() }
    }

    /// Creates a `Config` error.
    #[must_use]
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a `Launch` error.
    #[must_use]
    pub fn launch(message: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
        }
    }

    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invocation { .. } | Self::Launch { .. } => ErrorKind::Invocation,
            Self::ToolReported { .. } => ErrorKind::ToolReported,
            Self::UnexpectedReply { .. } => ErrorKind::ReplyDecoding,
            Self::ContractExists { .. }
            | Self::ContractNotFound { .. }
            | Self::ReadOnlyContract { .. } => ErrorKind::Precondition,
            Self::Config { .. } => ErrorKind::Configuration,
            Self::Io(_) => ErrorKind::Invocation,
        }
    }

    /// Returns `true` if the tool itself reported the failure.
    #[must_use]
    pub fn is_tool_reported(&self) -> bool {
        self.kind() == ErrorKind::ToolReported
    }

    /// Returns `true` if the failure is a local refusal.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }

    /// Human-readable output of a tool-reported error, if any.
    #[must_use]
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::ToolReported { output, .. } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_error_display() {
        let err = GatewayError::invocation("/opt/teos/teos", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "failed to invoke /opt/teos/teos: No such file or directory"
        );
        assert_eq!(err.kind(), ErrorKind::Invocation);
    }

    #[test]
    fn test_tool_reported_summary_is_first_line() {
        let err = GatewayError::tool_reported(
            "get account",
            "ERROR!\nunknown key: account_name\n",
            Reply::Raw(String::new()),
        );
        assert_eq!(err.to_string(), "teos get account reported an error: ERROR!");
        assert_eq!(err.tool_output(), Some("ERROR!\nunknown key: account_name\n"));
        assert!(err.is_tool_reported());
    }

    #[test]
    fn test_tool_reported_empty_output() {
        let err = GatewayError::tool_reported("get info", "", Reply::Raw(String::new()));
        assert!(matches!(err, GatewayError::ToolReported { ref summary, .. } if summary.is_empty()));
    }

    #[test]
    fn test_precondition_errors() {
        let exists = GatewayError::contract_exists("hello");
        assert_eq!(exists.to_string(), "hello is an existing contract definition");
        assert!(exists.is_precondition());

        let missing = GatewayError::contract_not_found("nowhere");
        assert_eq!(missing.to_string(), "nowhere is not an existing contract definition");
        assert!(missing.is_precondition());

        let ro = GatewayError::read_only_contract("eosio.token");
        assert_eq!(ro.to_string(), "cannot modify system contracts: eosio.token");
        assert!(ro.is_precondition());
        assert!(!ro.is_tool_reported());
    }

    #[test]
    fn test_unexpected_reply_kind() {
        let err = GatewayError::unexpected_reply("get info", "missing field head_block_num");
        assert_eq!(err.kind(), ErrorKind::ReplyDecoding);
        assert_eq!(
            err.to_string(),
            "unexpected reply to teos get info: missing field head_block_num"
        );
    }

    #[test]
    fn test_config_error_kind() {
        let err = GatewayError::config("/etc/teos/config.json", "missing key version");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GatewayError = io_err.into();
        assert!(matches!(err, GatewayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::ToolReported.to_string(), "tool-reported");
        assert_eq!(ErrorKind::Precondition.to_string(), "precondition");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayError>();
    }
}
