//! Output formatting for CLI commands.
//!
//! Text output is a short summary of the typed reply; the tool's own report
//! is echoed by the gateway. JSON output is the typed reply itself.

use std::io::Write;

use serde::Serialize;
use teos_catalog::{
    AccountInfo, ActionReceipt, Block, ChainInfo, Code, ContractTemplate, ImportedKey, KeyPair,
    NodeLaunch, ProbeOutcome, ToolConfig, Wallet,
};
use teos_gateway::ToolResponse;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter for text and JSON.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a typed reply.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TextDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)?;
                writeln!(writer)?;
            }
            Format::Text => value.write_text(writer)?,
        }
        Ok(())
    }

    /// Write a pass-through response: its reply in JSON mode, nothing in
    /// text mode.
    pub fn write_response<W: Write>(
        &self,
        writer: &mut W,
        response: &ToolResponse,
    ) -> Result<(), CliError> {
        if self.is_json() {
            serde_json::to_writer_pretty(&mut *writer, &response.reply)?;
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write a value to a string.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TextDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

/// Versions reported by `teosctl version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// Version of this binary.
    pub teosctl: String,
    /// Front-end version from the configuration file.
    pub front_end: String,
}

/// Text rendering of a typed reply.
pub trait TextDisplay {
    /// Write the summary lines.
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl TextDisplay for ToolConfig {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "contract workspace: {}", self.contract_workspace.display())?;
        match &self.workspace_eosio {
            Some(path) => writeln!(writer, "system workspace:   {}", path.display()),
            None => writeln!(writer, "system workspace:   (none)"),
        }
    }
}

impl TextDisplay for ChainInfo {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "head block:        {}", self.head_block)?;
        writeln!(writer, "head block time:   {}", self.head_block_time)?;
        writeln!(writer, "irreversible:      {}", self.last_irreversible_block_num)
    }
}

impl TextDisplay for Block {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "block:             {}", self.block_num)?;
        writeln!(writer, "ref block prefix:  {}", self.ref_block_prefix)?;
        writeln!(writer, "timestamp:         {}", self.timestamp)
    }
}

impl TextDisplay for AccountInfo {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "account: {}", self.name)
    }
}

impl TextDisplay for Code {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "code hash: {}", self.code_hash)
    }
}

impl TextDisplay for KeyPair {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "key:     {}", self.name)?;
        writeln!(writer, "private: {}", self.private_key)?;
        writeln!(writer, "public:  {}", self.public_key)
    }
}

impl TextDisplay for Wallet {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "wallet:   {}", self.name)?;
        writeln!(writer, "password: {}", self.password)
    }
}

impl TextDisplay for VersionInfo {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "teosctl:   {}", self.teosctl)?;
        writeln!(writer, "front end: {}", self.front_end)
    }
}

impl TextDisplay for ImportedKey {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "imported: {}", self.key_private)
    }
}

impl TextDisplay for ActionReceipt {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match &self.console {
            Some(console) => writeln!(writer, "{console}"),
            None => Ok(()),
        }
    }
}

impl TextDisplay for ContractTemplate {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "contract dir: {}", self.contract_dir)?;
        writeln!(writer, "source dir:   {}", self.source_dir)?;
        writeln!(writer, "binary dir:   {}", self.binary_dir)
    }
}

impl TextDisplay for NodeLaunch {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Self::Running { head_block: Some(head) } => {
                writeln!(writer, "node already running, head block {head}")
            }
            Self::Running { head_block: None } => writeln!(writer, "node already running"),
            Self::Prepared(plan) => {
                writeln!(writer, "node launched: {} {}", plan.program(), plan.args().join(" "))
            }
        }
    }
}

impl TextDisplay for ProbeOutcome {
    fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let head = self
            .head_block
            .map_or_else(|| "none".to_string(), |head| head.to_string());
        if self.reached {
            writeln!(writer, "node ready after {} attempts, head block {head}", self.attempts_used)
        } else {
            writeln!(
                writer,
                "node not ready after {} attempts, head block {head}",
                self.attempts_used
            )
        }
    }
}
