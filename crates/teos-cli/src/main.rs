//! teosctl binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use teos_catalog::TerminalLauncher;
use teos_cli::{Cli, CliError, OutputFormat, dispatch};
use teos_gateway::{Gateway, GatewayConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let mut gateway = Gateway::new(GatewayConfig::load(&cli.config)?);
    // The tool's report would interleave with the JSON document.
    if cli.quiet || format.is_json() {
        gateway.set_verbose(false);
    }
    debug!(
        teos_exe = %gateway.config().teos_exe.display(),
        verbose = gateway.is_verbose(),
        "gateway ready"
    );

    let mut stdout = io::stdout();
    dispatch(&gateway, TerminalLauncher, &mut stdout, &format, &cli.command).await
}
