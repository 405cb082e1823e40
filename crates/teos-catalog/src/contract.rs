//! Contract commands, template bootstrap and the [`Contract`] object.
//!
//! A contract definition is a directory. Relative directories live in one of
//! two workspaces reported by `get config`: the user's contract workspace,
//! which may be modified, and the system workspace, which may not.

use crate::get::{Code, GetCode, GetConfig, GetTable, ToolConfig};
use crate::reference::{ContractSource, Named};
use crate::tx::TxOptions;
use serde::Serialize;
use std::path::{Path, PathBuf};
use teos_gateway::{
    ArgumentMap, CallOptions, Gateway, GatewayError, Reply, Result, ToolRequest, ToolResponse,
    ToolRunner, VerbPair,
};
use tracing::{debug, info, warn};

/// Where a push-action reply keeps the contract's console output.
pub const CONSOLE_POINTER: &str = "/processed/action_traces/0/console";

/// `set contract`: deploy a contract definition on an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetContract {
    account: String,
    contract_dir: String,
    wast_file: String,
    abi_file: String,
    permission: String,
    tx: TxOptions,
}

impl SetContract {
    /// Deploy `contract_dir` on `account`.
    #[must_use]
    pub fn new(
        account: &(impl Named + ?Sized),
        contract_dir: &(impl ContractSource + ?Sized),
    ) -> Self {
        Self {
            account: account.name().to_string(),
            contract_dir: contract_dir.contract_dir().to_string(),
            wast_file: String::new(),
            abi_file: String::new(),
            permission: String::new(),
            tx: TxOptions::default(),
        }
    }

    /// WAST file, relative to the contract directory.
    #[must_use]
    pub fn wast_file(mut self, path: impl Into<String>) -> Self {
        self.wast_file = path.into();
        self
    }

    /// ABI file, relative to the contract directory.
    #[must_use]
    pub fn abi_file(mut self, path: impl Into<String>) -> Self {
        self.abi_file = path.into();
        self
    }

    /// Account authorizing the deployment.
    #[must_use]
    pub fn permission(mut self, permission: &(impl Named + ?Sized)) -> Self {
        self.permission = permission.name().to_string();
        self
    }

    /// Transaction options.
    #[must_use]
    pub fn tx(mut self, tx: TxOptions) -> Self {
        self.tx = tx;
        self
    }

    /// The contract directory as it will be sent.
    #[must_use]
    pub fn contract_dir(&self) -> &str {
        &self.contract_dir
    }

    /// Returns `true` if the contract directory still needs a workspace.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        Path::new(&self.contract_dir).is_relative()
    }

    /// Anchor a relative contract directory in the contract workspace.
    #[must_use]
    pub fn resolved(mut self, config: &ToolConfig) -> Self {
        if self.is_relative() {
            self.contract_dir = config
                .contract_workspace
                .join(&self.contract_dir)
                .to_string_lossy()
                .into_owned();
        }
        self
    }
}

impl ToolRequest for SetContract {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("set", "contract")
    }

    fn arguments(&self) -> ArgumentMap {
        let mut arguments = ArgumentMap::new()
            .with("account", self.account.as_str())
            .with("contract-dir", self.contract_dir.as_str())
            .with("wast-file", self.wast_file.as_str())
            .with("abi-file", self.abi_file.as_str())
            .with("permission", self.permission.as_str());
        self.tx.apply(&mut arguments);
        arguments
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// Run `set contract`, resolving a relative directory first.
pub async fn set_contract<R: ToolRunner>(
    gateway: &Gateway<R>,
    request: SetContract,
    call: CallOptions,
) -> Result<ToolResponse> {
    let request = if request.is_relative() {
        let config = gateway.execute(&GetConfig, CallOptions::quiet()).await?;
        request.resolved(&config)
    } else {
        request
    };
    debug!(account = %request.account, dir = %request.contract_dir, "deploying contract");
    gateway.execute(&request, call).await
}

/// `push action`: run a contract action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushAction {
    contract: String,
    action: String,
    data: String,
    permission: String,
    tx: TxOptions,
}

impl PushAction {
    /// Push `action` with JSON `data` to the contract on account `contract`.
    ///
    /// The data text is sent as is; quoting is handled by the argument map.
    #[must_use]
    pub fn new(
        contract: &(impl Named + ?Sized),
        action: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            contract: contract.name().to_string(),
            action: action.into(),
            data: data.into(),
            permission: String::new(),
            tx: TxOptions::default(),
        }
    }

    /// Account authorizing the action.
    #[must_use]
    pub fn permission(mut self, permission: &(impl Named + ?Sized)) -> Self {
        self.permission = permission.name().to_string();
        self
    }

    /// Transaction options.
    #[must_use]
    pub fn tx(mut self, tx: TxOptions) -> Self {
        self.tx = tx;
        self
    }
}

/// Result of a pushed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionReceipt {
    /// Contract account the action ran on.
    pub contract: String,
    /// Console output of the action, when the reply carries one.
    pub console: Option<String>,
    /// The full transaction reply.
    pub reply: Reply,
}

impl ToolRequest for PushAction {
    type Reply = ActionReceipt;

    fn verb(&self) -> VerbPair {
        VerbPair::new("push", "action")
    }

    fn arguments(&self) -> ArgumentMap {
        let mut arguments = ArgumentMap::new()
            .with("contract", self.contract.as_str())
            .with("action", self.action.as_str())
            .with("data", self.data.as_str())
            .with("permission", self.permission.as_str());
        self.tx.apply(&mut arguments);
        arguments
    }

    fn project(&self, response: ToolResponse) -> Result<ActionReceipt> {
        let console = response
            .reply
            .pointer(CONSOLE_POINTER)
            .and_then(|value| value.as_str())
            .map(str::to_string);
        Ok(ActionReceipt {
            contract: self.contract.clone(),
            console,
            reply: response.reply,
        })
    }
}

/// `bootstrap contract`: create a contract definition from the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapContract {
    name: String,
}

impl BootstrapContract {
    /// Bootstrap a definition called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Layout of a bootstrapped contract definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractTemplate {
    /// Contract directory.
    pub contract_dir: String,
    /// Source directory.
    pub source_dir: String,
    /// Build output directory.
    pub binary_dir: String,
    /// Template source file.
    pub template_cpp: String,
    /// Template header file.
    pub template_hpp: String,
}

impl ToolRequest for BootstrapContract {
    type Reply = ContractTemplate;

    fn verb(&self) -> VerbPair {
        VerbPair::new("bootstrap", "contract")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new().with("name", self.name.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<ContractTemplate> {
        Ok(ContractTemplate {
            contract_dir: response.require_str("contract_dir")?,
            source_dir: response.require_str("source_dir")?,
            binary_dir: response.require_str("binary_dir")?,
            template_cpp: response.require_str("template_cpp")?,
            template_hpp: response.require_str("template_hpp")?,
        })
    }
}

/// Bootstrap a contract definition.
///
/// A relative `name` lands in the contract workspace. An existing definition
/// is refused unless `remove_existing` is set, in which case it is deleted
/// before the tool recreates it. The two steps are not atomic.
pub async fn bootstrap_contract<R: ToolRunner>(
    gateway: &Gateway<R>,
    name: &str,
    remove_existing: bool,
    call: CallOptions,
) -> Result<ContractTemplate> {
    let mut target = PathBuf::from(name);
    if target.is_relative() {
        let config = gateway.execute(&GetConfig, CallOptions::quiet()).await?;
        target = config.contract_workspace.join(name);
    }

    if tokio::fs::try_exists(&target).await? {
        if !remove_existing {
            return Err(gateway.refuse(GatewayError::contract_exists(name)));
        }
        warn!(path = %target.display(), "removing existing contract definition");
        tokio::fs::remove_dir_all(&target).await?;
    }

    gateway.execute(&BootstrapContract::new(name), call).await
}

/// `generate abi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateAbi {
    types_hpp: String,
    abi_file: String,
    include_dir: String,
}

impl GenerateAbi {
    /// Generate the ABI of a contract source.
    #[must_use]
    pub fn new(source: &(impl ContractSource + ?Sized)) -> Self {
        Self {
            types_hpp: source.contract_dir().to_string(),
            abi_file: String::new(),
            include_dir: String::new(),
        }
    }

    /// Output file.
    #[must_use]
    pub fn abi_file(mut self, path: impl Into<String>) -> Self {
        self.abi_file = path.into();
        self
    }

    /// Extra include directory.
    #[must_use]
    pub fn include_dir(mut self, path: impl Into<String>) -> Self {
        self.include_dir = path.into();
        self
    }
}

impl ToolRequest for GenerateAbi {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("generate", "abi")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("types_hpp", self.types_hpp.as_str())
            .with("abi_file", self.abi_file.as_str())
            .with("include_dir", self.include_dir.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// `build contract`: compile a contract source to WAST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContract {
    src: String,
    wast_file: String,
    include_dir: String,
}

impl BuildContract {
    /// Build a contract source.
    #[must_use]
    pub fn new(source: &(impl ContractSource + ?Sized)) -> Self {
        Self {
            src: source.contract_dir().to_string(),
            wast_file: String::new(),
            include_dir: String::new(),
        }
    }

    /// Output file.
    #[must_use]
    pub fn wast_file(mut self, path: impl Into<String>) -> Self {
        self.wast_file = path.into();
        self
    }

    /// Extra include directory.
    #[must_use]
    pub fn include_dir(mut self, path: impl Into<String>) -> Self {
        self.include_dir = path.into();
        self
    }
}

impl ToolRequest for BuildContract {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("build", "contract")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("src", self.src.as_str())
            .with("wast_file", self.wast_file.as_str())
            .with("include_dir", self.include_dir.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// A contract definition bound to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    name: String,
    account: String,
    contract_dir: String,
    path: PathBuf,
    mutable: bool,
    wast_file: String,
    abi_file: String,
    permission: String,
    tx: TxOptions,
    console: String,
}

impl Contract {
    /// Locate the definition `contract_dir` for `account`.
    ///
    /// A relative directory is looked up in the contract workspace, then in
    /// the system workspace; a definition found in the latter is read-only.
    pub async fn open<R: ToolRunner>(
        gateway: &Gateway<R>,
        account: &(impl Named + ?Sized),
        contract_dir: &str,
    ) -> Result<Self> {
        let given = Path::new(contract_dir);
        let (path, mutable) = if given.is_absolute() {
            (given.to_path_buf(), true)
        } else {
            let config = gateway.execute(&GetConfig, CallOptions::quiet()).await?;
            locate(&config, contract_dir).await?
        };

        if !tokio::fs::try_exists(&path).await? {
            return Err(gateway.refuse(GatewayError::contract_not_found(contract_dir)));
        }
        debug!(path = %path.display(), mutable, "located contract definition");

        let name = given
            .file_name()
            .map_or_else(|| contract_dir.to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            name,
            account: account.name().to_string(),
            contract_dir: contract_dir.to_string(),
            path,
            mutable,
            wast_file: String::new(),
            abi_file: String::new(),
            permission: String::new(),
            tx: TxOptions::default(),
            console: String::new(),
        })
    }

    /// WAST file used on deploy, relative to the contract directory.
    #[must_use]
    pub fn with_wast_file(mut self, path: impl Into<String>) -> Self {
        self.wast_file = path.into();
        self
    }

    /// ABI file used on deploy, relative to the contract directory.
    #[must_use]
    pub fn with_abi_file(mut self, path: impl Into<String>) -> Self {
        self.abi_file = path.into();
        self
    }

    /// Account authorizing the deployment.
    #[must_use]
    pub fn with_permission(mut self, permission: &(impl Named + ?Sized)) -> Self {
        self.permission = permission.name().to_string();
        self
    }

    /// Transaction options used on deploy.
    #[must_use]
    pub fn with_tx(mut self, tx: TxOptions) -> Self {
        self.tx = tx;
        self
    }

    /// Last component of the contract directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Account the contract is bound to.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Resolved definition directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `false` for definitions in the system workspace.
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Console output of the last pushed action.
    #[must_use]
    pub fn console(&self) -> &str {
        &self.console
    }

    /// Deploy the contract on its account.
    pub async fn deploy<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        let mut request = SetContract::new(self.account.as_str(), self.contract_dir.as_str())
            .wast_file(self.wast_file.as_str())
            .abi_file(self.abi_file.as_str())
            .tx(self.tx);
        if !self.permission.is_empty() {
            request = request.permission(self.permission.as_str());
        }
        set_contract(gateway, request, CallOptions::new()).await
    }

    /// Compile the contract to WAST.
    pub async fn wast<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        self.ensure_mutable(gateway)?;
        let source = self.path.to_string_lossy();
        gateway
            .execute(&BuildContract::new(&*source), CallOptions::new())
            .await
    }

    /// Generate the contract ABI.
    pub async fn abi<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        self.ensure_mutable(gateway)?;
        let source = self.path.to_string_lossy();
        gateway
            .execute(&GenerateAbi::new(&*source), CallOptions::new())
            .await
    }

    /// Generate the ABI, then compile.
    pub async fn build<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<()> {
        self.abi(gateway).await?;
        self.wast(gateway).await?;
        info!(contract = %self.name, "contract built");
        Ok(())
    }

    /// Push an action to the contract.
    ///
    /// Without a permission the contract's own account authorizes it. The
    /// console output, when the reply has one, is kept and printed. The full
    /// reply is printed on a verbose call and on a transaction that is not
    /// broadcast.
    #[allow(clippy::too_many_arguments)]
    pub async fn push_action<R: ToolRunner>(
        &mut self,
        gateway: &Gateway<R>,
        action: &str,
        data: &str,
        permission: Option<&str>,
        tx: TxOptions,
        call: CallOptions,
    ) -> Result<ActionReceipt> {
        let permission = permission.unwrap_or(&self.account);
        let request = PushAction::new(self.account.as_str(), action, data)
            .permission(permission)
            .tx(tx);
        let receipt = gateway.execute(&request, call).await?;

        if let Some(console) = &receipt.console {
            self.console.clone_from(console);
            gateway.console().print(console);
        }
        if tx.dont_broadcast || (call.verbose && gateway.is_verbose()) {
            gateway.console().print(&receipt.reply.to_string());
        }
        Ok(receipt)
    }

    /// Push an action without broadcasting it.
    pub async fn show_action<R: ToolRunner>(
        &mut self,
        gateway: &Gateway<R>,
        action: &str,
        data: &str,
        permission: Option<&str>,
    ) -> Result<ActionReceipt> {
        self.push_action(
            gateway,
            action,
            data,
            permission,
            TxOptions::default().dont_broadcast(),
            CallOptions::new(),
        )
        .await
    }

    /// Rows of a contract table; the scope defaults to the contract account.
    pub async fn get_table<R: ToolRunner>(
        &self,
        gateway: &Gateway<R>,
        table: &str,
        scope: Option<&str>,
    ) -> Result<ToolResponse> {
        let scope = scope.unwrap_or(&self.account);
        let request = GetTable::new(self.account.as_str(), table, scope);
        gateway.execute(&request, CallOptions::new()).await
    }

    /// Code deployed on the contract account.
    pub async fn get_code<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<Code> {
        gateway
            .execute(&GetCode::new(self.account.as_str()), CallOptions::new())
            .await
    }

    fn ensure_mutable<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(gateway.refuse(GatewayError::read_only_contract(&self.name)))
        }
    }
}

impl ContractSource for Contract {
    fn contract_dir(&self) -> &str {
        &self.contract_dir
    }
}

/// Resolve a relative definition: contract workspace first, then system.
async fn locate(config: &ToolConfig, contract_dir: &str) -> Result<(PathBuf, bool)> {
    let user = config.contract_workspace.join(contract_dir);
    if tokio::fs::try_exists(&user).await? {
        return Ok((user, true));
    }
    Ok(match &config.workspace_eosio {
        Some(system) => (system.join(contract_dir), false),
        None => (user, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_push_action_data_sent_verbatim() {
        let data = r#"{"from":"alice","memo":"say \"hi\""}"#;
        let request = PushAction::new("hello", "hi", data).permission("alice");
        let args = request.arguments();
        assert_eq!(args.get("data"), Some(&json!(data)));

        let decoded: serde_json::Value =
            serde_json::from_str(&args.to_json_text()).expect("valid json");
        assert_eq!(decoded["data"].as_str(), Some(data));
    }

    #[test]
    fn test_push_action_console_extracted() {
        let request = PushAction::new("hello", "hi", "{}");
        let reply = json!({"processed": {"action_traces": [{"console": "Hello, alice"}]}});
        let response =
            ToolResponse::from_channels(request.verb(), String::new(), &reply.to_string(), 0);
        let receipt = request.project(response).expect("project");
        assert_eq!(receipt.console.as_deref(), Some("Hello, alice"));
    }

    #[test_case(r#"{"processed": {}}"# ; "no traces")]
    #[test_case(r#"{"processed": {"action_traces": []}}"# ; "empty traces")]
    #[test_case(r#"{"processed": {"action_traces": [{"console": 7}]}}"# ; "console not text")]
    #[test_case("transaction pushed" ; "raw reply")]
    fn test_push_action_console_missing_is_ignored(reply: &str) {
        let request = PushAction::new("hello", "hi", "{}");
        let response = ToolResponse::from_channels(request.verb(), String::new(), reply, 0);
        let receipt = request.project(response).expect("missing console is fine");
        assert_eq!(receipt.console, None);
    }

    #[test]
    fn test_set_contract_resolution() {
        let config = ToolConfig {
            contract_workspace: PathBuf::from("/work/contracts"),
            workspace_eosio: None,
        };
        let relative = SetContract::new("alice", "hello").resolved(&config);
        assert_eq!(relative.contract_dir(), "/work/contracts/hello");

        let absolute = SetContract::new("alice", "/src/hello").resolved(&config);
        assert_eq!(absolute.contract_dir(), "/src/hello");
    }

    #[tokio::test]
    async fn test_locate_prefers_user_workspace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let user = dir.path().join("user");
        let system = dir.path().join("system");
        std::fs::create_dir_all(user.join("hello")).expect("user contract");
        std::fs::create_dir_all(system.join("hello")).expect("system contract");
        std::fs::create_dir_all(system.join("eosio.token")).expect("system contract");
        let config = ToolConfig {
            contract_workspace: user.clone(),
            workspace_eosio: Some(system.clone()),
        };

        assert_eq!(
            locate(&config, "hello").await.expect("locate"),
            (user.join("hello"), true)
        );
        assert_eq!(
            locate(&config, "eosio.token").await.expect("locate"),
            (system.join("eosio.token"), false)
        );
    }

    #[tokio::test]
    async fn test_locate_without_system_workspace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ToolConfig {
            contract_workspace: dir.path().to_path_buf(),
            workspace_eosio: None,
        };
        assert_eq!(
            locate(&config, "missing").await.expect("locate"),
            (dir.path().join("missing"), true)
        );
    }
}
