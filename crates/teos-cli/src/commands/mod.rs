//! CLI command implementations.
//!
//! Each submodule implements a command group:
//! - [`chain`] - Chain queries and key creation
//! - [`wallet`] - Wallet management
//! - [`node`] - Local node lifecycle
//! - [`contract`] - Action push and template bootstrap

pub mod chain;
pub mod contract;
pub mod node;
pub mod wallet;

use std::io::Write;

pub use chain::ChainCommand;
pub use contract::ContractCommand;
pub use node::NodeCommand;
pub use wallet::WalletCommand;

use teos_catalog::Launcher;
use teos_gateway::{Gateway, ToolRunner};

use crate::cli::{Commands, KeyCommands};
use crate::error::CliError;
use crate::output::{OutputFormat, VersionInfo};

/// Run one parsed command against the gateway.
///
/// # Errors
///
/// Returns the first gateway, argument or output error.
pub async fn dispatch<R, L, W>(
    gateway: &Gateway<R>,
    launcher: L,
    writer: &mut W,
    format: &OutputFormat,
    command: &Commands,
) -> Result<(), CliError>
where
    R: ToolRunner,
    L: Launcher,
    W: Write,
{
    let chain = ChainCommand::new(gateway);
    match command {
        Commands::Version => {
            let version = VersionInfo {
                teosctl: env!("CARGO_PKG_VERSION").to_string(),
                front_end: gateway.config().version.clone(),
            };
            format.write(writer, &version)
        }
        Commands::Config => chain.config(writer, format).await,
        Commands::Info => chain.info(writer, format).await,
        Commands::Block { number, id } => chain.block(writer, format, *number, id).await,
        Commands::Account { name } => chain.account(writer, format, name).await,
        Commands::Accounts { public_key } => chain.accounts(writer, format, public_key).await,
        Commands::Code { account, wast, abi } => {
            chain.code(writer, format, account, wast, abi).await
        }
        Commands::Table {
            contract,
            table,
            scope,
            limit,
        } => {
            chain
                .table(writer, format, contract, table, scope.as_deref(), *limit)
                .await
        }
        Commands::Key {
            command: KeyCommands::Create { name },
        } => chain.create_key(writer, format, name).await,
        Commands::Wallet { command } => {
            WalletCommand::new(gateway)
                .execute(writer, format, command)
                .await
        }
        Commands::Node { command } => {
            NodeCommand::new(gateway, launcher)
                .execute(writer, format, command)
                .await
        }
        Commands::Push(args) => ContractCommand::new(gateway).push(writer, format, args).await,
        Commands::Bootstrap {
            name,
            remove_existing,
        } => {
            ContractCommand::new(gateway)
                .bootstrap(writer, format, name, *remove_existing)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Format};
    use clap::Parser;
    use serde_json::json;
    use std::time::Duration;
    use teos_catalog::{LaunchPlan, RecordingLauncher};
    use teos_gateway::{Console, FakeToolRunner, GatewayConfig, ProbeSettings};

    fn gateway(runner: FakeToolRunner) -> Gateway<FakeToolRunner> {
        let config = GatewayConfig::new("/opt/teos/teos")
            .with_verbose(false)
            .with_probe(ProbeSettings {
                attempts: 2,
                target_block: 3,
                interval: Duration::ZERO,
            });
        Gateway::with_runner(config, runner).with_console(Console::buffer())
    }

    async fn run(
        gateway: &Gateway<FakeToolRunner>,
        format: Format,
        args: &[&str],
    ) -> (Result<(), CliError>, String) {
        let mut argv = vec!["teosctl"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("parse");
        let mut out = Vec::new();
        let result = dispatch(
            gateway,
            RecordingLauncher::new(),
            &mut out,
            &OutputFormat::new(format),
            &cli.command,
        )
        .await;
        (result, String::from_utf8(out).expect("utf-8"))
    }

    fn jarg(gateway: &Gateway<FakeToolRunner>) -> serde_json::Value {
        gateway
            .runner()
            .last_invocation()
            .expect("invoked")
            .jarg_value()
            .expect("jarg")
    }

    #[tokio::test]
    async fn test_version_uses_config() {
        let gw = gateway(FakeToolRunner::new());
        let (result, out) = run(&gw, Format::Json, &["version"]).await;
        result.expect("version");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["teosctl"], json!(env!("CARGO_PKG_VERSION")));
        assert!(gw.runner().invocations().is_empty());
    }

    #[tokio::test]
    async fn test_info_json() {
        let gw = gateway(FakeToolRunner::new().with_json(&json!({
            "head_block_num": 17,
            "head_block_time": "2018-06-01T12:00:00",
            "last_irreversible_block_num": 15
        })));
        let (result, out) = run(&gw, Format::Json, &["info"]).await;
        result.expect("info");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["head_block"], json!(17));
    }

    #[tokio::test]
    async fn test_table_scope_defaults_to_contract() {
        let gw = gateway(FakeToolRunner::new().with_json(&json!({"rows": [], "more": false})));
        let (result, _) = run(&gw, Format::Text, &["table", "tokenacct", "accounts"]).await;
        result.expect("table");
        let args = jarg(&gw);
        assert_eq!(args["code"], json!("tokenacct"));
        assert_eq!(args["scope"], json!("tokenacct"));
        assert_eq!(args["limit"], json!(10));
    }

    #[tokio::test]
    async fn test_push_rejects_non_json_data() {
        let gw = gateway(FakeToolRunner::new());
        let (result, _) = run(&gw, Format::Text, &["push", "hello", "hi", "user=carol"]).await;
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
        assert!(gw.runner().invocations().is_empty());
    }

    #[tokio::test]
    async fn test_push_defaults_permission_to_contract() {
        let gw = gateway(FakeToolRunner::new().with_json(&json!({
            "processed": {"action_traces": [{"console": "Hello, carol"}]}
        })));
        let (result, out) = run(
            &gw,
            Format::Text,
            &["push", "hello", "hi", r#"{"user":"carol"}"#, "--dont-broadcast"],
        )
        .await;
        result.expect("push");
        assert_eq!(out, "Hello, carol\n");
        let args = jarg(&gw);
        assert_eq!(args["permission"], json!("hello"));
        assert_eq!(args["data"], json!(r#"{"user":"carol"}"#));
        assert_eq!(args["dont-broadcast"], json!(1));
    }

    #[tokio::test]
    async fn test_tool_error_surfaces() {
        let gw = gateway(FakeToolRunner::new().with_error("ERROR! unknown key"));
        let (result, out) = run(&gw, Format::Json, &["account", "nobody"]).await;
        let err = result.expect_err("tool error");
        assert!(err.to_string().starts_with("tool-reported error"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_probe_failure_is_command_error() {
        let gw = gateway(
            FakeToolRunner::new()
                .with_json(&json!({"head_block_num": 1}))
                .with_json(&json!({"head_block_num": 2})),
        );
        let (result, out) = run(&gw, Format::Text, &["node", "probe"]).await;
        assert!(matches!(result, Err(CliError::Command(_))));
        assert_eq!(out, "node not ready after 2 attempts, head block 2\n");
    }

    #[tokio::test]
    async fn test_probe_overrides_target() {
        let gw = gateway(FakeToolRunner::new().with_json(&json!({"head_block_num": 1})));
        let (result, _) = run(&gw, Format::Text, &["node", "probe", "--target", "1"]).await;
        result.expect("probe");
        assert_eq!(gw.runner().remaining(), 0);
    }

    #[tokio::test]
    async fn test_node_start_launches_plan() {
        let gw = gateway(FakeToolRunner::new().with_json(&json!({
            "is_windows_ubuntu": "false",
            "uname": "Linux",
            "command_line": "/opt/eos/nodeos --genesis-json genesis.json"
        })));
        let launcher = RecordingLauncher::new();
        let cli = Cli::try_parse_from(["teosctl", "node", "start", "--clear"]).expect("parse");
        let mut out = Vec::new();
        dispatch(&gw, &launcher, &mut out, &OutputFormat::default(), &cli.command)
            .await
            .expect("start");
        let launched = launcher.launched();
        assert_eq!(launched.len(), 1);
        assert!(matches!(launched[0], LaunchPlan::Terminal { .. }));
        assert_eq!(jarg(&gw)["resync-blockchain"], json!(1));
    }
}
