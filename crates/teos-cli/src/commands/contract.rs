//! Contract command implementation: push action and template bootstrap.

use std::io::Write;

use teos_catalog::{PushAction, TxOptions, bootstrap_contract};
use teos_gateway::{CallOptions, Gateway, ToolRunner};

use crate::cli::PushArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Contract command executor.
pub struct ContractCommand<'a, R> {
    gateway: &'a Gateway<R>,
}

impl<'a, R: ToolRunner> ContractCommand<'a, R> {
    /// Create a new contract command.
    #[must_use]
    pub fn new(gateway: &'a Gateway<R>) -> Self {
        Self { gateway }
    }

    /// Push an action. Without a permission the contract account authorizes.
    pub async fn push<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &PushArgs,
    ) -> Result<(), CliError> {
        serde_json::from_str::<serde_json::Value>(&args.data)
            .map_err(|e| CliError::InvalidArgument(format!("action data is not JSON: {e}")))?;

        let mut tx = TxOptions::default().expiration_sec(args.expiration);
        if args.dont_broadcast {
            tx = tx.dont_broadcast();
        }
        let permission = args.permission.as_deref().unwrap_or(&args.contract);
        let request = PushAction::new(&args.contract, &args.action, &args.data)
            .permission(permission)
            .tx(tx);

        let receipt = self.gateway.execute(&request, CallOptions::new()).await?;
        format.write(writer, &receipt)
    }

    /// Bootstrap a contract definition.
    pub async fn bootstrap<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        name: &str,
        remove_existing: bool,
    ) -> Result<(), CliError> {
        let template =
            bootstrap_contract(self.gateway, name, remove_existing, CallOptions::new()).await?;
        format.write(writer, &template)
    }
}
