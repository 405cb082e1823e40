//! Subprocess gateway for the `teos` executable.
//!
//! Every call builds a JSON argument map, runs the pre-built executable with a
//! fixed calling convention and reads its two output channels: the
//! human-readable report on stdout and, because `--both` is always passed, a
//! JSON reply on stderr.
//!
//! ```text
//! <exe> <verb> <subverb> --jarg <json-text> --both [-V]
//! ```
//!
//! A report starting with `ERROR` marks a tool-reported failure. Everything
//! else the gateway can run into is classified by [`GatewayError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use teos_gateway::{ArgumentMap, CallOptions, Gateway, GatewayConfig, VerbPair};
//!
//! # async fn example() -> teos_gateway::Result<()> {
//! let gateway = Gateway::new(GatewayConfig::load("config.json")?);
//! let jarg = ArgumentMap::new().with("account_name", "eosio");
//! let response = gateway
//!     .invoke(VerbPair::new("get", "account"), &jarg, CallOptions::new())
//!     .await?
//!     .into_result()?;
//! println!("{}", response.reply);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod gateway;
pub mod jarg;
pub mod reply;
pub mod runner;

pub use command::{RawOutput, ToolCommand, ToolInvocation, VerbPair};
pub use config::{ConfigFile, GatewayConfig, ProbeSettings};
pub use console::Console;
pub use error::{ErrorKind, GatewayError, Result};
pub use gateway::{CallOptions, Gateway, ToolRequest, ToolResponse, is_error_output, reply_u64};
pub use jarg::ArgumentMap;
pub use reply::Reply;
pub use runner::{FakeToolRunner, ProcessRunner, ToolRunner};
