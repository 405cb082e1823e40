//! Local node lifecycle: start, readiness probe, stop.
//!
//! The tool never launches the node itself. `daemon start` is always called
//! with `DO_NOT_LAUNCH` and answers with a prepared command line, which is
//! then started detached in its own terminal by a [`Launcher`].

use crate::get::GetInfo;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::process::Stdio;
use teos_gateway::{
    ArgumentMap, CallOptions, Gateway, GatewayError, ProbeSettings, Result, ToolRequest,
    ToolResponse, ToolRunner, VerbPair, reply_u64,
};
use tracing::{debug, info, warn};

/// `daemon start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaemonStart {
    clear: bool,
}

impl DaemonStart {
    /// Prepare a node launch, wiping the chain data if `clear` is set.
    #[must_use]
    pub fn new(clear: bool) -> Self {
        Self { clear }
    }
}

/// How a prepared node command is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LaunchPlan {
    /// Linux subsystem on Windows: minimized `bash.exe` window.
    WindowsSubsystem {
        /// Command line run by bash.
        command_line: String,
    },
    /// macOS: `open -a` with the node executable.
    MacOs {
        /// Node executable.
        exe: String,
        /// Node arguments.
        args: String,
    },
    /// Other desktops: a `gnome-terminal` window.
    Terminal {
        /// Command line run in the terminal.
        command_line: String,
    },
}

impl LaunchPlan {
    /// Read the plan from a `daemon start` reply.
    pub fn from_response(response: &ToolResponse) -> Result<Self> {
        let command_line = response.require_str("command_line")?;
        if flag_is_set(response.reply.get("is_windows_ubuntu")) {
            return Ok(Self::WindowsSubsystem { command_line });
        }
        let uname = response.reply.get("uname").and_then(Value::as_str);
        if uname == Some("Darwin") {
            return Ok(Self::MacOs {
                exe: response.require_str("exe")?,
                args: response.require_str("args")?,
            });
        }
        Ok(Self::Terminal { command_line })
    }

    /// Program to spawn.
    #[must_use]
    pub fn program(&self) -> &'static str {
        match self {
            Self::WindowsSubsystem { .. } => "cmd.exe",
            Self::MacOs { .. } | Self::Terminal { .. } => "sh",
        }
    }

    /// Arguments of [`Self::program`].
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::WindowsSubsystem { command_line } => ["/c", "start", "/MIN", "bash.exe", "-c"]
                .into_iter()
                .map(str::to_string)
                .chain(std::iter::once(command_line.clone()))
                .collect(),
            Self::MacOs { exe, args } => {
                vec!["-c".to_string(), format!("open -a {exe} --args {args}")]
            }
            Self::Terminal { command_line } => {
                vec!["-c".to_string(), format!("gnome-terminal -- {command_line}")]
            }
        }
    }
}

fn flag_is_set(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(text)) => text == "true",
        Some(Value::Bool(flag)) => *flag,
        _ => false,
    }
}

/// What `daemon start` reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeLaunch {
    /// A node is already running; nothing was launched.
    Running {
        /// Head block reported by the running node.
        head_block: Option<u64>,
    },
    /// A node command was prepared.
    Prepared(LaunchPlan),
}

impl NodeLaunch {
    /// The prepared plan, if a launch was needed.
    #[must_use]
    pub fn plan(&self) -> Option<&LaunchPlan> {
        match self {
            Self::Prepared(plan) => Some(plan),
            Self::Running { .. } => None,
        }
    }
}

impl ToolRequest for DaemonStart {
    type Reply = NodeLaunch;

    fn verb(&self) -> VerbPair {
        VerbPair::new("daemon", "start")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("resync-blockchain", u8::from(self.clear))
            .with("DO_NOT_LAUNCH", 1)
    }

    fn project(&self, response: ToolResponse) -> Result<NodeLaunch> {
        if let Some(head) = response.reply.get("head_block_num") {
            return Ok(NodeLaunch::Running {
                head_block: reply_u64(head),
            });
        }
        LaunchPlan::from_response(&response).map(NodeLaunch::Prepared)
    }
}

/// `daemon stop`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaemonStop;

impl ToolRequest for DaemonStop {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("daemon", "stop")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// Starts a prepared node command without waiting for it.
pub trait Launcher {
    /// Spawn the plan detached.
    fn launch(&self, plan: &LaunchPlan) -> Result<()>;
}

impl<T: Launcher + ?Sized> Launcher for &T {
    fn launch(&self, plan: &LaunchPlan) -> Result<()> {
        (**self).launch(plan)
    }
}

/// Launcher spawning a real terminal process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalLauncher;

impl Launcher for TerminalLauncher {
    fn launch(&self, plan: &LaunchPlan) -> Result<()> {
        let program = plan.program();
        let child = tokio::process::Command::new(program)
            .args(plan.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GatewayError::launch(format!("cannot start {program}: {e}")))?;
        info!(program, pid = ?child.id(), "node launched");
        Ok(())
    }
}

/// Launcher that only records plans. Used in tests.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<LaunchPlan>>,
}

impl RecordingLauncher {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans received so far.
    #[must_use]
    pub fn launched(&self) -> Vec<LaunchPlan> {
        self.launched.lock().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, plan: &LaunchPlan) -> Result<()> {
        self.launched.lock().push(plan.clone());
        Ok(())
    }
}

/// Start a local node unless one is already running.
pub async fn node_start<R: ToolRunner>(
    gateway: &Gateway<R>,
    launcher: &impl Launcher,
    clear: bool,
) -> Result<NodeLaunch> {
    let launch = gateway
        .execute(&DaemonStart::new(clear), CallOptions::quiet())
        .await?;
    match &launch {
        NodeLaunch::Prepared(plan) => launcher.launch(plan)?,
        NodeLaunch::Running { head_block } => info!(?head_block, "node already running"),
    }
    Ok(launch)
}

/// Stop the local node.
pub async fn node_stop<R: ToolRunner>(gateway: &Gateway<R>) -> Result<ToolResponse> {
    gateway.execute(&DaemonStop, CallOptions::new()).await
}

/// How a readiness probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    /// The target block was reached.
    pub reached: bool,
    /// `get info` calls made.
    pub attempts_used: u32,
    /// Last head block seen, if any.
    pub head_block: Option<u64>,
}

/// Poll `get info` until the head block reaches the target.
///
/// Each attempt sleeps one interval first. A failed or unreadable `get info`
/// counts as no head block. Gives up when the attempt budget is spent; at
/// least one attempt is always made.
pub async fn probe_node<R: ToolRunner>(
    gateway: &Gateway<R>,
    settings: ProbeSettings,
) -> Result<ProbeOutcome> {
    let mut remaining = settings.attempts;
    let mut attempts_used = 0;
    let mut last_head = None;

    loop {
        tokio::time::sleep(settings.interval).await;
        let response = gateway
            .invoke(GetInfo.verb(), &GetInfo.arguments(), CallOptions::quiet())
            .await?;
        attempts_used += 1;
        remaining = remaining.saturating_sub(1);

        let head = if response.error {
            None
        } else {
            response.reply.get("head_block_num").and_then(reply_u64)
        };
        debug!(attempt = attempts_used, ?head, "probed node");
        if head.is_some() {
            last_head = head;
        }

        if head.is_some_and(|block| block >= settings.target_block) {
            info!(head_block = ?head, attempts_used, "node is ready");
            return Ok(ProbeOutcome {
                reached: true,
                attempts_used,
                head_block: last_head,
            });
        }

        if remaining == 0 {
            warn!(target_block = settings.target_block, attempts_used, "node not ready");
            return Ok(ProbeOutcome {
                reached: false,
                attempts_used,
                head_block: last_head,
            });
        }
    }
}
