//! Read-only queries: `get config`, `get info`, `get block`, `get account`,
//! `get accounts`, `get code` and `get table`.

use crate::reference::{Named, PublicKeyed};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use teos_gateway::{ArgumentMap, Result, ToolRequest, ToolResponse, VerbPair};

/// Rows returned by `get table` unless overridden.
pub const DEFAULT_TABLE_LIMIT: u32 = 10;

/// Text of a reply field that may hold a string or any other JSON value.
pub(crate) fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `get config`: the tool's own workspace setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetConfig;

/// Workspaces reported by `get config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolConfig {
    /// Root of user contract definitions.
    pub contract_workspace: PathBuf,
    /// Root of system contract definitions, read-only.
    pub workspace_eosio: Option<PathBuf>,
}

impl ToolRequest for GetConfig {
    type Reply = ToolConfig;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "config")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
    }

    fn project(&self, response: ToolResponse) -> Result<ToolConfig> {
        Ok(ToolConfig {
            contract_workspace: PathBuf::from(response.require_str("contractWorkspace")?),
            workspace_eosio: response
                .reply
                .get("workspaceEosio")
                .and_then(Value::as_str)
                .map(PathBuf::from),
        })
    }
}

/// `get info`: chain head summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetInfo;

/// Chain head summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainInfo {
    /// Head block number.
    pub head_block: u64,
    /// Head block timestamp, as reported.
    pub head_block_time: String,
    /// Last irreversible block number.
    pub last_irreversible_block_num: u64,
}

impl ToolRequest for GetInfo {
    type Reply = ChainInfo;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "info")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
    }

    fn project(&self, response: ToolResponse) -> Result<ChainInfo> {
        Ok(ChainInfo {
            head_block: response.require_u64("head_block_num")?,
            head_block_time: response.require_str("head_block_time")?,
            last_irreversible_block_num: response.require_u64("last_irreversible_block_num")?,
        })
    }
}

/// Block selector for `get block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    /// Block number.
    Number(u64),
    /// Block id.
    Id(String),
}

/// `get block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBlock {
    block: BlockRef,
}

impl GetBlock {
    /// Select by number unless a non-empty id is given.
    #[must_use]
    pub fn new(number: u64, id: &str) -> Self {
        if id.is_empty() {
            Self::number(number)
        } else {
            Self::id(id)
        }
    }

    /// Select by number.
    #[must_use]
    pub fn number(number: u64) -> Self {
        Self {
            block: BlockRef::Number(number),
        }
    }

    /// Select by id.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            block: BlockRef::Id(id.into()),
        }
    }
}

/// Block header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Block number.
    pub block_num: u64,
    /// Reference block prefix used by transactions.
    pub ref_block_prefix: u64,
    /// Block timestamp, as reported.
    pub timestamp: String,
}

impl ToolRequest for GetBlock {
    type Reply = Block;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "block")
    }

    fn arguments(&self) -> ArgumentMap {
        let selector = match &self.block {
            BlockRef::Number(number) => Value::from(*number),
            BlockRef::Id(id) => Value::from(id.as_str()),
        };
        ArgumentMap::new().with("block_num_or_id", selector)
    }

    fn project(&self, response: ToolResponse) -> Result<Block> {
        Ok(Block {
            block_num: response.require_u64("block_num")?,
            ref_block_prefix: response.require_u64("ref_block_prefix")?,
            timestamp: response.require_str("timestamp")?,
        })
    }
}

/// `get account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccount {
    account_name: String,
}

impl GetAccount {
    /// Query an account by name or object.
    #[must_use]
    pub fn new(account: &(impl Named + ?Sized)) -> Self {
        Self {
            account_name: account.name().to_string(),
        }
    }
}

/// Account as reported by `get account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    /// Account name.
    pub name: String,
    /// Human-readable report of the account.
    pub report: String,
}

impl fmt::Display for AccountInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report)
    }
}

impl ToolRequest for GetAccount {
    type Reply = AccountInfo;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "account")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new().with("account_name", self.account_name.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<AccountInfo> {
        Ok(AccountInfo {
            name: response.require_str("account_name")?,
            report: response.output,
        })
    }
}

/// `get accounts`: accounts controlled by a public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccounts {
    public_key: String,
}

impl GetAccounts {
    /// Query by key object or public key text.
    #[must_use]
    pub fn new(key: &(impl PublicKeyed + ?Sized)) -> Self {
        Self {
            public_key: key.public_key().to_string(),
        }
    }
}

impl ToolRequest for GetAccounts {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "accounts")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new().with("public_key", self.public_key.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// `get code`: code hash, and optionally save WAST and ABI to files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCode {
    account_name: String,
    wast_file: String,
    abi_file: String,
}

impl GetCode {
    /// Query the code of an account.
    #[must_use]
    pub fn new(account: &(impl Named + ?Sized)) -> Self {
        Self {
            account_name: account.name().to_string(),
            wast_file: String::new(),
            abi_file: String::new(),
        }
    }

    /// Save the WAST to this file.
    #[must_use]
    pub fn wast_file(mut self, path: impl Into<String>) -> Self {
        self.wast_file = path.into();
        self
    }

    /// Save the ABI to this file.
    #[must_use]
    pub fn abi_file(mut self, path: impl Into<String>) -> Self {
        self.abi_file = path.into();
        self
    }
}

/// Contract code of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    /// Hash of the deployed code.
    pub code_hash: String,
    /// WAST text.
    pub wast: String,
    /// ABI document as reported; an empty string when the account has none.
    pub abi: Value,
}

impl ToolRequest for GetCode {
    type Reply = Code;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "code")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("account_name", self.account_name.as_str())
            .with("wast", self.wast_file.as_str())
            .with("abi", self.abi_file.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<Code> {
        Ok(Code {
            code_hash: response.require_str("code_hash")?,
            wast: field_text(response.require("wast")?),
            abi: response
                .reply
                .get("abi")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
        })
    }
}

/// `get table`: rows of a contract table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTable {
    code: String,
    table: String,
    scope: String,
    limit: u32,
    table_key: String,
    lower_bound: String,
    upper_bound: String,
}

impl GetTable {
    /// Query `table` of contract account `code` in `scope`.
    #[must_use]
    pub fn new(
        code: &(impl Named + ?Sized),
        table: impl Into<String>,
        scope: &(impl Named + ?Sized),
    ) -> Self {
        Self {
            code: code.name().to_string(),
            table: table.into(),
            scope: scope.name().to_string(),
            limit: DEFAULT_TABLE_LIMIT,
            table_key: String::new(),
            lower_bound: String::new(),
            upper_bound: String::new(),
        }
    }

    /// Maximum number of rows.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Key to use with the bounds.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.table_key = key.into();
        self
    }

    /// Lower bound of the key, inclusive.
    #[must_use]
    pub fn lower(mut self, bound: impl Into<String>) -> Self {
        self.lower_bound = bound.into();
        self
    }

    /// Upper bound of the key, exclusive.
    #[must_use]
    pub fn upper(mut self, bound: impl Into<String>) -> Self {
        self.upper_bound = bound.into();
        self
    }
}

impl ToolRequest for GetTable {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("get", "table")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("code", self.code.as_str())
            .with("table", self.table.as_str())
            .with("scope", self.scope.as_str())
            .with("limit", self.limit)
            .with("table_key", self.table_key.as_str())
            .with("lower_bound", self.lower_bound.as_str())
            .with("upper_bound", self.upper_bound.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}
