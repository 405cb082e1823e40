//! CLI error types.

use std::fmt;
use teos_gateway::{ErrorKind, GatewayError};

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    Config(String),
    /// A gateway call failed.
    Gateway(GatewayError),
    /// Invalid argument.
    InvalidArgument(String),
    /// Command ran but did not achieve its goal.
    Command(String),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Gateway(e) => write!(f, "{} error: {e}", e.kind()),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Command(msg) => write!(f, "command error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gateway(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GatewayError> for CliError {
    fn from(err: GatewayError) -> Self {
        if err.kind() == ErrorKind::Configuration {
            Self::Config(err.to_string())
        } else {
            Self::Gateway(err)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(format!("JSON serialization failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teos_gateway::Reply;

    #[test]
    fn test_config_errors_are_config() {
        let err: CliError = GatewayError::config("/etc/teos/config.json", "cannot read").into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn test_gateway_error_names_kind() {
        let err: CliError =
            GatewayError::tool_reported("get info", "ERROR! node down", Reply::default()).into();
        assert_eq!(
            err.to_string(),
            "tool-reported error: teos get info reported an error: ERROR! node down"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::InvalidArgument("data is not JSON".into());
        assert_eq!(err.to_string(), "invalid argument: data is not JSON");
    }
}
