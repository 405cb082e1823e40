//! Wallet commands and the [`Wallet`] object.

use crate::reference::{DEFAULT_WALLET, Named, PrivateKeyed};
use serde::Serialize;
use teos_gateway::{
    ArgumentMap, CallOptions, Gateway, Result, ToolRequest, ToolResponse, ToolRunner, VerbPair,
};
use tracing::debug;

/// `wallet create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletCreate {
    name: String,
}

impl WalletCreate {
    /// Create a wallet with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for WalletCreate {
    fn default() -> Self {
        Self::new(DEFAULT_WALLET)
    }
}

impl ToolRequest for WalletCreate {
    type Reply = Wallet;

    fn verb(&self) -> VerbPair {
        VerbPair::new("wallet", "create")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new().with("name", self.name.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<Wallet> {
        Ok(Wallet {
            name: self.name.clone(),
            password: response.require_str("password")?,
            keys: Vec::new(),
        })
    }
}

/// `wallet list`: wallets, with `*` marking the unlocked ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletList;

impl ToolRequest for WalletList {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("wallet", "list")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// `wallet keys`: private keys of all unlocked wallets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletKeys;

impl ToolRequest for WalletKeys {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("wallet", "keys")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// `wallet import`: add a private key to a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletImport {
    name: String,
    key: String,
}

impl WalletImport {
    /// Import `key` into `wallet`.
    #[must_use]
    pub fn new(key: &(impl PrivateKeyed + ?Sized), wallet: &(impl Named + ?Sized)) -> Self {
        Self {
            name: wallet.name().to_string(),
            key: key.private_key().to_string(),
        }
    }
}

/// Key accepted by `wallet import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedKey {
    /// The imported private key.
    pub key_private: String,
}

impl ToolRequest for WalletImport {
    type Reply = ImportedKey;

    fn verb(&self) -> VerbPair {
        VerbPair::new("wallet", "import")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("name", self.name.as_str())
            .with("key", self.key.as_str())
    }

    fn project(&self, _response: ToolResponse) -> Result<ImportedKey> {
        Ok(ImportedKey {
            key_private: self.key.clone(),
        })
    }
}

macro_rules! wallet_by_name {
    ($(#[$doc:meta])* $request:ident, $subverb:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $request {
            name: String,
        }

        impl $request {
            /// Address a wallet by name or object.
            #[must_use]
            pub fn new(wallet: &(impl Named + ?Sized)) -> Self {
                Self {
                    name: wallet.name().to_string(),
                }
            }
        }

        impl Default for $request {
            fn default() -> Self {
                Self::new(DEFAULT_WALLET)
            }
        }

        impl ToolRequest for $request {
            type Reply = ToolResponse;

            fn verb(&self) -> VerbPair {
                VerbPair::new("wallet", $subverb)
            }

            fn arguments(&self) -> ArgumentMap {
                ArgumentMap::new().with("name", self.name.as_str())
            }

            fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
                Ok(response)
            }
        }
    };
}

wallet_by_name!(
    /// `wallet open`.
    WalletOpen,
    "open"
);

wallet_by_name!(
    /// `wallet lock`.
    WalletLock,
    "lock"
);

/// `wallet unlock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletUnlock {
    name: String,
    password: String,
}

impl WalletUnlock {
    /// Unlock a wallet by name with an explicit password.
    #[must_use]
    pub fn new(name: &(impl Named + ?Sized), password: impl Into<String>) -> Self {
        Self {
            name: name.name().to_string(),
            password: password.into(),
        }
    }

    /// Unlock a wallet with the password it remembers.
    #[must_use]
    pub fn wallet(wallet: &Wallet) -> Self {
        Self::new(wallet, wallet.password.as_str())
    }
}

impl ToolRequest for WalletUnlock {
    type Reply = ToolResponse;

    fn verb(&self) -> VerbPair {
        VerbPair::new("wallet", "unlock")
    }

    fn arguments(&self) -> ArgumentMap {
        ArgumentMap::new()
            .with("name", self.name.as_str())
            .with("password", self.password.as_str())
    }

    fn project(&self, response: ToolResponse) -> Result<ToolResponse> {
        Ok(response)
    }
}

/// A created wallet: its name, password and the keys imported through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallet {
    /// Wallet name.
    pub name: String,
    /// Password returned by `wallet create`.
    pub password: String,
    /// `(key name, private key)` pairs imported through this object.
    pub keys: Vec<(String, String)>,
}

impl Named for Wallet {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Wallet {
    /// Create a wallet.
    pub async fn create<R: ToolRunner>(gateway: &Gateway<R>, name: &str) -> Result<Self> {
        gateway
            .execute(&WalletCreate::new(name), CallOptions::new())
            .await
    }

    /// List wallets.
    pub async fn list<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        gateway.execute(&WalletList, CallOptions::new()).await
    }

    /// Open this wallet.
    pub async fn open<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        gateway.execute(&WalletOpen::new(self), CallOptions::new()).await
    }

    /// Lock this wallet.
    pub async fn lock<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        gateway.execute(&WalletLock::new(self), CallOptions::new()).await
    }

    /// Unlock this wallet with its password.
    pub async fn unlock<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        gateway
            .execute(&WalletUnlock::wallet(self), CallOptions::new())
            .await
    }

    /// Import a key and remember it.
    pub async fn import_key<R, K>(&mut self, gateway: &Gateway<R>, key: &K) -> Result<ImportedKey>
    where
        R: ToolRunner,
        K: Named + PrivateKeyed + ?Sized,
    {
        let imported = gateway
            .execute(&WalletImport::new(key, &*self), CallOptions::quiet())
            .await?;
        debug!(wallet = %self.name, key = %key.name(), "imported key");
        self.keys
            .push((key.name().to_string(), imported.key_private.clone()));
        Ok(imported)
    }

    /// Private keys of all unlocked wallets.
    pub async fn keys<R: ToolRunner>(&self, gateway: &Gateway<R>) -> Result<ToolResponse> {
        gateway.execute(&WalletKeys, CallOptions::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unlock_from_wallet_uses_remembered_password() {
        let wallet = Wallet {
            name: "work".into(),
            password: "PW5secret".into(),
            keys: Vec::new(),
        };
        let args = WalletUnlock::wallet(&wallet).arguments();
        assert_eq!(args.get("name"), Some(&json!("work")));
        assert_eq!(args.get("password"), Some(&json!("PW5secret")));

        let args = WalletUnlock::new("other", "PW5given").arguments();
        assert_eq!(args.get("name"), Some(&json!("other")));
        assert_eq!(args.get("password"), Some(&json!("PW5given")));
    }

    #[test]
    fn test_defaults_address_default_wallet() {
        assert_eq!(
            WalletOpen::default().arguments().get("name"),
            Some(&json!(DEFAULT_WALLET))
        );
        assert_eq!(
            WalletLock::default().arguments().get("name"),
            Some(&json!(DEFAULT_WALLET))
        );
        assert_eq!(
            WalletCreate::default().arguments().get("name"),
            Some(&json!(DEFAULT_WALLET))
        );
    }

    #[test]
    fn test_import_keys() {
        let args = WalletImport::new("5Kkey", "default").arguments();
        let keys: Vec<&str> = args.keys().collect();
        assert_eq!(keys, ["name", "key"]);
        assert_eq!(args.get("key"), Some(&json!("5Kkey")));
    }
}
