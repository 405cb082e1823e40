//! Typed command catalog for the teos gateway.
//!
//! One request type per verb pair. Each builds the full argument map its
//! command expects and projects the successful reply into named fields. On
//! top of the requests sit the [`Wallet`], [`Account`] and [`Contract`]
//! objects, contract template bootstrap and the local node lifecycle.
//!
//! # Example
//!
//! ```rust,no_run
//! use teos_catalog::{Account, CreateKey, GetInfo, Wallet};
//! use teos_gateway::{CallOptions, Gateway, GatewayConfig};
//!
//! # async fn example() -> teos_gateway::Result<()> {
//! let gateway = Gateway::new(GatewayConfig::load("config.json")?);
//! let info = gateway.execute(&GetInfo, CallOptions::new()).await?;
//! println!("head block {}", info.head_block);
//!
//! let mut wallet = Wallet::create(&gateway, "default").await?;
//! let owner = gateway.execute(&CreateKey::new("owner"), CallOptions::new()).await?;
//! wallet.import_key(&gateway, &owner).await?;
//! let eosio = Account::eosio();
//! println!("{}", eosio.info(&gateway).await?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod contract;
pub mod get;
pub mod node;
pub mod reference;
pub mod tx;
pub mod wallet;

pub use account::{Account, CreateAccount, CreateKey, KeyPair};
pub use contract::{
    ActionReceipt, BootstrapContract, BuildContract, Contract, ContractTemplate, GenerateAbi,
    PushAction, SetContract, bootstrap_contract, set_contract,
};
pub use get::{
    AccountInfo, Block, BlockRef, ChainInfo, Code, GetAccount, GetAccounts, GetBlock, GetCode,
    GetConfig, GetInfo, GetTable, ToolConfig,
};
pub use node::{
    DaemonStart, DaemonStop, LaunchPlan, Launcher, NodeLaunch, ProbeOutcome, RecordingLauncher,
    TerminalLauncher, node_start, node_stop, probe_node,
};
pub use reference::{ContractSource, DEFAULT_WALLET, Named, PrivateKeyed, PublicKeyed};
pub use tx::TxOptions;
pub use wallet::{
    ImportedKey, Wallet, WalletCreate, WalletImport, WalletKeys, WalletList, WalletLock,
    WalletOpen, WalletUnlock,
};
