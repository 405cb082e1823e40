//! Keys and accounts.

use crate::contract::{SetContract, set_contract};
use crate::get::{AccountInfo, Code, GetAccount, GetCode};
use crate::reference::{ContractSource, Named, PrivateKeyed, PublicKeyed};
use crate::tx::TxOptions;
use serde::Serialize;
use teos_gateway::{
    ArgumentMap, CallOptions, Gateway, Result, ToolRequest, ToolResponse, ToolRunner, VerbPair,
};

/// Name of the built-in testing account.
pub const EOSIO_ACCOUNT: &str = "eosio";

/// Private key of the built-in testing account.
pub const EOSIO_PRIVATE_KEY: &str = "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3";

/// Public key of the built-in testing account.
pub const EOSIO_PUBLIC_KEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";

/// `create key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateKey {
    name: String,
}

impl CreateKey {
    /// Create a key pair labelled `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A named key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    /// Label given at creation.
    pub name: String,
    /// Private key, WIF.
    pub private_key: String,
    /// Public key.
    pub public_key: String,
}

impl Named for KeyPair {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PublicKeyed for KeyPair {
    fn public_key(&self) -> &str {
        &self.public_key
    }
}

impl PrivateKeyed for KeyPair {
    fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl ToolRequest for CreateKey {
    type Reply = KeyPair;

    fn verb(&self) -> VerbPair {
        VerbPair::new("create", "key")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new().with("name", self.name.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<KeyPair> {
        Ok(KeyPair {
            name: self.name.clone(),
            private_key: response.require_str("privateKey")?,
            public_key: response.require_str("publicKey")?,
        })
    }
}

/// `create account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccount {
    creator: String,
    name: String,
    owner_key: String,
    active_key: String,
    permission: String,
    tx: TxOptions,
}

impl CreateAccount {
    /// Create account `name`, paid for by `creator`.
    #[must_use]
    pub fn new(
        creator: &(impl Named + ?Sized),
        name: impl Into<String>,
        owner_key: &(impl PublicKeyed + ?Sized),
        active_key: &(impl PublicKeyed + ?Sized),
    ) -> Self {
        Self {
            creator: creator.name().to_string(),
            name: name.into(),
            owner_key: owner_key.public_key().to_string(),
            active_key: active_key.public_key().to_string(),
            permission: String::new(),
            tx: TxOptions::default(),
        }
    }

    /// Account authorizing the creation.
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

impl ToolRequest for CreateAccount {
    type Reply = Account;

    fn verb(&self) -> VerbPair {
        VerbPair::new("create", "account")
    }

    fn arguments(&self) -> ArgumentMap {
        let mut arguments = ArgumentMap::new()
            .with("creator", self.creator.as_str())
            .with("name", self.name.as_str())
            .with("ownerKey", self.owner_key.as_str())
            .with("activeKey", self.active_key.as_str())
            .with("permission", self.permission.as_str());
        self.tx.apply(&mut arguments);
        arguments
    }

    fn project(&self, _response: ToolResponse) -> Result<Account> {
        Ok(Account {
            name: self.name.clone(),
            owner_key: self.owner_key.clone(),
            active_key: self.active_key.clone(),
            private_key: None,
        })
    }
}

/// An account on the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Account name.
    pub name: String,
    /// Owner public key.
    pub owner_key: String,
    /// Active public key.
    pub active_key: String,
    /// Private key, known only for built-in accounts.
    pub private_key: Option<String>,
}

impl Named for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PublicKeyed for Account {
    fn public_key(&self) -> &str {
        &self.active_key
    }
}

impl Account {
    /// The built-in `eosio` testing account. Runs nothing.
    #[must_use]
    pub fn eosio() -> Self {
        Self {
            name: EOSIO_ACCOUNT.to_string(),
            owner_key: EOSIO_PUBLIC_KEY.to_string(),
            active_key: EOSIO_PUBLIC_KEY.to_string(),
            private_key: Some(EOSIO_PRIVATE_KEY.to_string()),
        }
    }

    /// Key pair of the account, when its private key is known.
    #[must_use]
    pub fn key_pair(&self) -> Option<KeyPair> {
        self.private_key.as_ref().map(|private_key| KeyPair {
            name: self.name.clone(),
            private_key: private_key.clone(),
            public_key: self.active_key.clone(),
        })
    }

    /// Code deployed on the account.
    pub async fn code<R: ToolRunner>(
        &self,
        gateway: &Gateway<R>,
        wast_file: &str,
        abi_file: &str,
    ) -> Result<Code> {
        let request = GetCode::new(self).wast_file(wast_file).abi_file(abi_file);
        gateway.execute(&request, CallOptions::quiet()).await
    }

    /// Deploy a contract on the account.
    pub async fn set_contract<R: ToolRunner>(
        &self,
        gateway: &Gateway<R>,
        contract_dir: &(impl ContractSource + ?Sized),
        tx: TxOptions,
    ) -> Result<ToolResponse> {
        let request = SetContract::new(self, contract_dir).tx(tx);
        set_contract(gateway, request, CallOptions::quiet()).await
    }

    /// The account as the chain reports it.
    pub async fn info<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<AccountInfo> {
        gateway
            .execute(&GetAccount::new(self), CallOptions::quiet())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(name: &str, public: &str) -> KeyPair {
        KeyPair {
            name: name.into(),
            private_key: format!("5K{name}"),
            public_key: public.into(),
        }
    }

    #[test]
    fn test_create_account_coerces_references() {
        let owner = key("owner", "EOS6owner");
        let active = key("active", "EOS6active");
        let request = CreateAccount::new(&Account::eosio(), "alice", &owner, &active)
            .permission("eosio");
        let args = request.arguments();
        assert_eq!(args.get("creator"), Some(&json!("eosio")));
        assert_eq!(args.get("ownerKey"), Some(&json!("EOS6owner")));
        assert_eq!(args.get("activeKey"), Some(&json!("EOS6active")));
        assert_eq!(args.get("permission"), Some(&json!("eosio")));
        assert_eq!(args.get("expiration"), Some(&json!(30)));
    }

    #[test]
    fn test_create_account_plain_strings_unchanged() {
        let args = CreateAccount::new("eosio", "bob", "EOS6o", "EOS6a").arguments();
        let keys: Vec<&str> = args.keys().collect();
        assert_eq!(
            keys,
            [
                "creator",
                "name",
                "ownerKey",
                "activeKey",
                "permission",
                "expiration",
                "skip-sign",
                "dont-broadcast",
                "force-unique",
                "max-cpu-usage",
                "max-net-usage",
            ]
        );
        assert_eq!(args.get("ownerKey"), Some(&json!("EOS6o")));
        assert_eq!(args.get("permission"), Some(&json!("")));
    }

    #[test]
    fn test_eosio_account() {
        let eosio = Account::eosio();
        assert_eq!(eosio.name(), EOSIO_ACCOUNT);
        let pair = eosio.key_pair().expect("eosio key is known");
        assert_eq!(pair.private_key(), EOSIO_PRIVATE_KEY);
        assert_eq!(pair.public_key(), EOSIO_PUBLIC_KEY);
    }

    #[test]
    fn test_create_key_projection() {
        let request = CreateKey::new("owner");
        let response = ToolResponse::from_channels(
            request.verb(),
            String::new(),
            r#"{"privateKey": "5Kpriv", "publicKey": "EOS6pub"}"#,
            0,
        );
        let pair = request.project(response).expect("project");
        assert_eq!(pair, KeyPair {
            name: "owner".into(),
            private_key: "5Kpriv".into(),
            public_key: "EOS6pub".into(),
        });
    }
}
