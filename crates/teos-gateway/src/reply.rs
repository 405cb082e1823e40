//! The diagnostic-channel reply.
//!
//! Under `--both` the tool writes a JSON document to stderr. When that text is
//! not valid JSON it is kept verbatim so it can still be inspected.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Reply read from the tool's diagnostic channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// The channel carried a JSON document.
    Structured(Value),
    /// The channel carried something else; the text is preserved unchanged.
    Raw(String),
}

impl Reply {
    /// Parse diagnostic-channel text, falling back to [`Reply::Raw`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::Raw(text.to_string()),
        }
    }

    /// The JSON document, if the reply was structured.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Top-level field of a structured object reply.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.json().and_then(|value| value.get(key))
    }

    /// Value at a JSON pointer, e.g. `/processed/action_traces/0/console`.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.json().and_then(|value| value.pointer(pointer))
    }

    /// Returns `true` if the reply carries the given top-level field.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the reply fell back to raw text.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(value) => match serde_json::to_string_pretty(value) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{value}"),
            },
            Self::Raw(text) => f.write_str(text),
        }
    }
}
