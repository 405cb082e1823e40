//! # teos-cli
//!
//! `teosctl`, a command-line driver for the teos gateway.
//!
//! Provides commands for:
//! - Chain queries (info, blocks, accounts, code, tables)
//! - Key and wallet management
//! - Local node start, stop and readiness probing
//! - Action push and contract template bootstrap
//!
//! # Architecture
//!
//! Every command is one typed request from `teos-catalog`, run through a
//! [`teos_gateway::Gateway`] that launches the teos executable named in the
//! configuration file.
//!
//! ```text
//! ┌─────────┐  typed request  ┌──────────────┐  argv + jarg  ┌──────┐
//! │ teosctl │────────────────►│ teos-gateway │──────────────►│ teos │
//! └─────────┘                 └──────────────┘  stdout/err   └──────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, KeyCommands, NodeCommands, PushArgs, WalletCommands};
pub use commands::dispatch;
pub use error::CliError;
pub use output::{OutputFormat, TextDisplay, VersionInfo};
