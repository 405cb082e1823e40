//! The command gateway.
//!
//! [`Gateway::invoke`] runs one verb pair and classifies what came back;
//! [`Gateway::execute`] does the same for a typed [`ToolRequest`] and hands
//! the successful response to the request's projection.

use crate::command::{ToolCommand, VerbPair};
use crate::config::GatewayConfig;
use crate::console::Console;
use crate::error::{GatewayError, Result};
use crate::jarg::ArgumentMap;
use crate::reply::Reply;
use crate::runner::{ProcessRunner, ToolRunner};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Marker the tool puts at the start of its human-readable output on failure.
pub const ERROR_MARKER: &str = "ERROR";

/// Returns `true` if the human-readable output reports an error.
#[must_use]
pub fn is_error_output(output: &str) -> bool {
    output.starts_with(ERROR_MARKER)
}

/// Unsigned integer held by a reply field.
///
/// The tool writes every leaf of its reply as text, so `"17"` and `17` both
/// decode to 17.
#[must_use]
pub fn reply_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Per-call flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Echo the report (and pass `-V`) if the gateway is verbose too.
    pub verbose: bool,
    /// Do not print the report of a tool-reported error.
    pub suppress_error_msg: bool,
}

impl CallOptions {
    /// Verbose call that prints error reports.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verbose: true,
            suppress_error_msg: false,
        }
    }

    /// Non-verbose call.
    #[must_use]
    pub const fn quiet() -> Self {
        Self {
            verbose: false,
            suppress_error_msg: false,
        }
    }

    /// Set the verbose flag.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Suppress printing of error reports.
    #[must_use]
    pub const fn suppress_errors(mut self) -> Self {
        self.suppress_error_msg = true;
        self
    }
}

impl Default for CallOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one invocation of the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    /// Verb pair that produced this response.
    pub verb: VerbPair,
    /// Human-readable output.
    pub output: String,
    /// Diagnostic-channel reply.
    pub reply: Reply,
    /// Set iff `output` starts with [`ERROR_MARKER`].
    pub error: bool,
    /// Process exit code.
    pub exit_code: i32,
}

impl ToolResponse {
    /// Build a response from captured channel text.
    #[must_use]
    pub fn from_channels(verb: VerbPair, output: String, diagnostic: &str, exit_code: i32) -> Self {
        let error = is_error_output(&output);
        Self {
            verb,
            output,
            reply: Reply::parse(diagnostic),
            error,
            exit_code,
        }
    }

    /// Returns `true` if the tool reported an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Turn the error flag into a `ToolReported` error.
    pub fn into_result(self) -> Result<Self> {
        if self.error {
            Err(GatewayError::tool_reported(
                self.verb.to_string(),
                self.output,
                self.reply,
            ))
        } else {
            Ok(self)
        }
    }

    /// The JSON document, if any.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        self.reply.json()
    }

    /// A top-level reply field that a projection cannot do without.
    pub fn require(&self, key: &str) -> Result<&Value> {
        if self.reply.is_raw() {
            return Err(GatewayError::unexpected_reply(
                self.verb.to_string(),
                format!("reply is not JSON, wanted field {key}"),
            ));
        }
        self.reply.get(key).ok_or_else(|| {
            GatewayError::unexpected_reply(self.verb.to_string(), format!("missing field {key}"))
        })
    }

    /// A required string field.
    pub fn require_str(&self, key: &str) -> Result<String> {
        match self.require(key)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.wrong_type(key, "string", other)),
        }
    }

    /// A required unsigned integer field, as a number or decimal text.
    pub fn require_u64(&self, key: &str) -> Result<u64> {
        let value = self.require(key)?;
        reply_u64(value).ok_or_else(|| self.wrong_type(key, "unsigned integer", value))
    }

    fn wrong_type(&self, key: &str, expected: &str, found: &Value) -> GatewayError {
        GatewayError::unexpected_reply(
            self.verb.to_string(),
            format!("field {key} should be a {expected}, found {found}"),
        )
    }
}

impl fmt::Display for ToolResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}

/// A typed command: verb pair, argument map and reply projection.
pub trait ToolRequest {
    /// Typed reply produced on success.
    type Reply;

    /// The verb pair to invoke.
    fn verb(&self) -> VerbPair;

    /// The full argument map the tool expects for this verb pair.
    fn arguments(&self) -> ArgumentMap;

    /// Build the typed reply from a successful response.
    fn project(&self, response: ToolResponse) -> Result<Self::Reply>;
}

/// Gateway to the teos executable.
#[derive(Debug)]
pub struct Gateway<R = ProcessRunner> {
    config: GatewayConfig,
    runner: R,
    console: Console,
}

impl Gateway<ProcessRunner> {
    /// Gateway spawning real processes and echoing to stdout.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_runner(config, ProcessRunner::new())
    }
}

impl<R: ToolRunner> Gateway<R> {
    /// Gateway using a custom runner.
    #[must_use]
    pub fn with_runner(config: GatewayConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            console: Console::stdout(),
        }
    }

    /// Replace the console.
    #[must_use]
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The console.
    #[must_use]
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// The runner.
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Gateway-wide verbosity.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.config.verbose
    }

    /// Set gateway-wide verbosity. When off, only error reports are printed.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Print `ERROR!` and the refusal message, then hand the error back.
    #[must_use]
    pub fn refuse(&self, error: GatewayError) -> GatewayError {
        self.console.print_refusal(&error.to_string());
        error
    }

    /// Run one verb pair.
    ///
    /// A tool-reported error is not an `Err` here: it is flagged on the
    /// returned response. Only failing to run the executable is.
    pub async fn invoke(
        &self,
        verb: VerbPair,
        arguments: &ArgumentMap,
        call: CallOptions,
    ) -> Result<ToolResponse> {
        let echo = self.config.verbose && call.verbose;
        let invocation = ToolCommand::new(&self.config.teos_exe, verb)
            .jarg(arguments)
            .verbose(echo)
            .build();
        debug!(command = %verb, jarg = ?invocation.jarg(), "invoking teos");

        let raw = self.runner.run(&invocation).await?;
        let response = ToolResponse::from_channels(
            verb,
            raw.stdout_lossy(),
            &raw.stderr_lossy(),
            raw.exit_code,
        );

        if echo {
            self.console.print(&response.output);
        }

        if response.error {
            warn!(command = %verb, "teos reported an error");
            if !call.suppress_error_msg {
                self.console.print_error_report(&response.output);
            }
        }

        if response.reply.is_raw() {
            debug!(command = %verb, "diagnostic channel is not JSON, keeping raw text");
        }

        Ok(response)
    }

    /// Run a typed request and project its reply.
    pub async fn execute<Q: ToolRequest>(&self, request: &Q, call: CallOptions) -> Result<Q::Reply> {
        let response = self
            .invoke(request.verb(), &request.arguments(), call)
            .await?
            .into_result()?;
        request.project(response)
    }
}
