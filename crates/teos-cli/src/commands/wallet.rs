//! Wallet command implementation.

use std::io::Write;

use teos_catalog::{
    Wallet, WalletImport, WalletKeys, WalletList, WalletLock, WalletOpen, WalletUnlock,
};
use teos_gateway::{CallOptions, Gateway, ToolRunner};

use crate::cli::WalletCommands;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Wallet command executor.
pub struct WalletCommand<'a, R> {
    gateway: &'a Gateway<R>,
}

impl<'a, R: ToolRunner> WalletCommand<'a, R> {
    /// Create a new wallet command.
    #[must_use]
    pub fn new(gateway: &'a Gateway<R>) -> Self {
        Self { gateway }
    }

    /// Execute a wallet subcommand.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &WalletCommands,
    ) -> Result<(), CliError> {
        let call = CallOptions::new();
        match command {
            WalletCommands::Create { name } => {
                let wallet = Wallet::create(self.gateway, name).await?;
                format.write(writer, &wallet)?;
            }
            WalletCommands::List => {
                let response = self.gateway.execute(&WalletList, call).await?;
                format.write_response(writer, &response)?;
            }
            WalletCommands::Keys => {
                let response = self.gateway.execute(&WalletKeys, call).await?;
                format.write_response(writer, &response)?;
            }
            WalletCommands::Import { key, wallet } => {
                let imported = self
                    .gateway
                    .execute(&WalletImport::new(key, wallet), call)
                    .await?;
                format.write(writer, &imported)?;
            }
            WalletCommands::Open { name } => {
                let response = self.gateway.execute(&WalletOpen::new(name), call).await?;
                format.write_response(writer, &response)?;
            }
            WalletCommands::Lock { name } => {
                let response = self.gateway.execute(&WalletLock::new(name), call).await?;
                format.write_response(writer, &response)?;
            }
            WalletCommands::Unlock { name, password } => {
                let request = WalletUnlock::new(name, password.as_str());
                let response = self.gateway.execute(&request, call).await?;
                format.write_response(writer, &response)?;
            }
        }
        Ok(())
    }
}
