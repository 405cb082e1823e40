//! Local node command implementation.

use std::io::Write;

use teos_catalog::{Launcher, node_start, node_stop, probe_node};
use teos_gateway::{Gateway, ToolRunner};

use crate::cli::NodeCommands;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Node command executor.
pub struct NodeCommand<'a, R, L> {
    gateway: &'a Gateway<R>,
    launcher: L,
}

impl<'a, R: ToolRunner, L: Launcher> NodeCommand<'a, R, L> {
    /// Create a new node command.
    #[must_use]
    pub fn new(gateway: &'a Gateway<R>, launcher: L) -> Self {
        Self { gateway, launcher }
    }

    /// Execute a node subcommand.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &NodeCommands,
    ) -> Result<(), CliError> {
        match command {
            NodeCommands::Start { clear } => {
                let launch = node_start(self.gateway, &self.launcher, *clear).await?;
                format.write(writer, &launch)?;
            }
            NodeCommands::Stop => {
                let response = node_stop(self.gateway).await?;
                format.write_response(writer, &response)?;
            }
            NodeCommands::Probe { attempts, target } => {
                let mut settings = self.gateway.config().probe;
                if let Some(attempts) = attempts {
                    settings.attempts = *attempts;
                }
                if let Some(target) = target {
                    settings.target_block = *target;
                }
                let outcome = probe_node(self.gateway, settings).await?;
                format.write(writer, &outcome)?;
                if !outcome.reached {
                    return Err(CliError::Command(format!(
                        "node did not reach block {} in {} attempts",
                        settings.target_block, outcome.attempts_used
                    )));
                }
            }
        }
        Ok(())
    }
}
