//! Read-only chain queries and key creation.

use std::io::Write;

use teos_catalog::{
    CreateKey, GetAccount, GetAccounts, GetBlock, GetCode, GetConfig, GetInfo, GetTable,
};
use teos_gateway::{CallOptions, Gateway, ToolRunner};

use crate::error::CliError;
use crate::output::OutputFormat;

/// Chain query executor.
pub struct ChainCommand<'a, R> {
    gateway: &'a Gateway<R>,
}

impl<'a, R: ToolRunner> ChainCommand<'a, R> {
    /// Create a new chain command.
    #[must_use]
    pub fn new(gateway: &'a Gateway<R>) -> Self {
        Self { gateway }
    }

    /// `get config`.
    pub async fn config<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        let config = self.gateway.execute(&GetConfig, CallOptions::new()).await?;
        format.write(writer, &config)
    }

    /// `get info`.
    pub async fn info<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        let info = self.gateway.execute(&GetInfo, CallOptions::new()).await?;
        format.write(writer, &info)
    }

    /// `get block`.
    pub async fn block<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        number: u64,
        id: &str,
    ) -> Result<(), CliError> {
        let block = self
            .gateway
            .execute(&GetBlock::new(number, id), CallOptions::new())
            .await?;
        format.write(writer, &block)
    }

    /// `get account`.
    pub async fn account<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        name: &str,
    ) -> Result<(), CliError> {
        let account = self
            .gateway
            .execute(&GetAccount::new(name), CallOptions::new())
            .await?;
        format.write(writer, &account)
    }

    /// `get accounts`.
    pub async fn accounts<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        public_key: &str,
    ) -> Result<(), CliError> {
        let response = self
            .gateway
            .execute(&GetAccounts::new(public_key), CallOptions::new())
            .await?;
        format.write_response(writer, &response)
    }

    /// `get code`.
    pub async fn code<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        account: &str,
        wast: &str,
        abi: &str,
    ) -> Result<(), CliError> {
        let request = GetCode::new(account).wast_file(wast).abi_file(abi);
        let code = self.gateway.execute(&request, CallOptions::new()).await?;
        format.write(writer, &code)
    }

    /// `get table`; the scope defaults to the contract account.
    pub async fn table<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        contract: &str,
        table: &str,
        scope: Option<&str>,
        limit: u32,
    ) -> Result<(), CliError> {
        let scope = scope.unwrap_or(contract);
        let request = GetTable::new(contract, table, scope).limit(limit);
        let response = self.gateway.execute(&request, CallOptions::new()).await?;
        format.write_response(writer, &response)
    }

    /// `create key`.
    pub async fn create_key<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        name: &str,
    ) -> Result<(), CliError> {
        let pair = self
            .gateway
            .execute(&CreateKey::new(name), CallOptions::new())
            .await?;
        format.write(writer, &pair)
    }
}
