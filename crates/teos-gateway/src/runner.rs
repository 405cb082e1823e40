//! Process execution behind the gateway.
//!
//! [`ProcessRunner`] spawns the real executable. [`FakeToolRunner`] replays
//! scripted outputs and records every invocation it receives.

use crate::command::{RawOutput, ToolInvocation};
use crate::error::{GatewayError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Trait for running a built invocation to completion.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Run the invocation and collect both output channels in full.
    async fn run(&self, invocation: &ToolInvocation) -> Result<RawOutput>;
}

/// Runs invocations as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<RawOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        if !invocation.current_dir.as_os_str().is_empty() {
            cmd.current_dir(&invocation.current_dir);
        }

        // `output()` drains stdout and stderr concurrently.
        let output = cmd
            .output()
            .await
            .map_err(|e| GatewayError::invocation(&invocation.program, e.to_string()))?;

        let exit_code = output.status.code().unwrap_or(-1);
        debug!(exit_code, command = %invocation.description(), "teos exited");

        Ok(RawOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code,
        })
    }
}

/// One scripted response of a [`FakeToolRunner`].
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// The process ran and produced this output.
    Output(RawOutput),
    /// The process could not be spawned.
    SpawnFailure(String),
}

/// In-memory runner for tests: replays scripted replies in order.
///
/// When the script runs out, further calls fail as if the executable were
/// missing.
#[derive(Debug, Default)]
pub struct FakeToolRunner {
    script: Mutex<VecDeque<ScriptedReply>>,
    invocations: Mutex<Vec<ToolInvocation>>,
}

impl FakeToolRunner {
    /// Create a runner with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with the given human-readable and JSON channels.
    #[must_use]
    pub fn with_reply(self, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.push_reply(stdout, stderr);
        self
    }

    /// Queue a JSON reply with a generic human-readable report.
    #[must_use]
    pub fn with_json(self, json: &serde_json::Value) -> Self {
        self.push_reply("#  ok", json.to_string());
        self
    }

    /// Queue a tool-reported error.
    #[must_use]
    pub fn with_error(self, report: impl Into<String>) -> Self {
        self.push_reply(report, "");
        self
    }

    /// Queue a reply.
    pub fn push_reply(&self, stdout: impl Into<String>, stderr: impl Into<String>) {
        self.script
            .lock()
            .push_back(ScriptedReply::Output(RawOutput::from_text(stdout, stderr)));
    }

    /// Queue a spawn failure.
    pub fn push_spawn_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .push_back(ScriptedReply::SpawnFailure(message.into()));
    }

    /// Every invocation received so far, oldest first.
    #[must_use]
    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.lock().clone()
    }

    /// The most recent invocation.
    #[must_use]
    pub fn last_invocation(&self) -> Option<ToolInvocation> {
        self.invocations.lock().last().cloned()
    }

    /// Number of scripted replies not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl ToolRunner for FakeToolRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<RawOutput> {
        self.invocations.lock().push(invocation.clone());
        match self.script.lock().pop_front() {
            Some(ScriptedReply::Output(output)) => Ok(output),
            Some(ScriptedReply::SpawnFailure(message)) => {
                Err(GatewayError::invocation(&invocation.program, message))
            }
            None => Err(GatewayError::invocation(
                &invocation.program,
                "no scripted reply left",
            )),
        }
    }
}

impl<T: ToolRunner> ToolRunner for &T {
    async fn run(&self, invocation: &ToolInvocation) -> Result<RawOutput> {
        (**self).run(invocation).await
    }
}

impl<T: ToolRunner> ToolRunner for std::sync::Arc<T> {
    async fn run(&self, invocation: &ToolInvocation) -> Result<RawOutput> {
        (**self).run(invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ToolCommand, VerbPair};

    fn invocation() -> ToolInvocation {
        ToolCommand::new("/opt/teos/build/teos", VerbPair::new("get", "info")).build()
    }

    #[tokio::test]
    async fn test_fake_runner_replays_in_order() {
        let runner = FakeToolRunner::new()
            .with_reply("first", "{}")
            .with_reply("second", "[]");

        let one = runner.run(&invocation()).await.expect("first reply");
        let two = runner.run(&invocation()).await.expect("second reply");
        assert_eq!(one.stdout_lossy(), "first");
        assert_eq!(two.stdout_lossy(), "second");
        assert_eq!(runner.invocations().len(), 2);
        assert_eq!(runner.remaining(), 0);
    }

    #[tokio::test]
    async fn test_fake_runner_exhausted_is_invocation_error() {
        let runner = FakeToolRunner::new();
        let err = runner.run(&invocation()).await.expect_err("no script");
        assert!(matches!(err, GatewayError::Invocation { .. }));
    }

    #[tokio::test]
    async fn test_fake_runner_spawn_failure() {
        let runner = FakeToolRunner::new();
        runner.push_spawn_failure("permission denied");
        let err = runner.run(&invocation()).await.expect_err("spawn failure");
        assert!(err.to_string().contains("permission denied"));
    }

    #[tokio::test]
    async fn test_process_runner_missing_executable() {
        let missing = ToolCommand::new(
            "/nonexistent/teos-build/teos",
            VerbPair::new("get", "info"),
        )
        .build();
        let err = ProcessRunner::new()
            .run(&missing)
            .await
            .expect_err("missing executable");
        assert!(matches!(err, GatewayError::Invocation { .. }));
    }
}
