//! Command-line argument parsing with clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// teosctl - drive the teos executable from a shell.
#[derive(Parser, Debug, Clone)]
#[command(name = "teosctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file naming the teos executable.
    #[arg(short, long, env = "TEOS_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Do not echo the tool's own report.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the front-end version from the configuration.
    Version,

    /// Show the tool's workspace setup.
    Config,

    /// Show the chain head.
    Info,

    /// Show a block.
    Block {
        /// Block number.
        number: u64,

        /// Block id; takes precedence over the number.
        #[arg(long, default_value = "")]
        id: String,
    },

    /// Show an account.
    Account {
        /// Account name.
        name: String,
    },

    /// List accounts controlled by a public key.
    Accounts {
        /// Public key.
        public_key: String,
    },

    /// Show the code deployed on an account.
    Code {
        /// Account name.
        account: String,

        /// Save the WAST to this file.
        #[arg(long, default_value = "")]
        wast: String,

        /// Save the ABI to this file.
        #[arg(long, default_value = "")]
        abi: String,
    },

    /// Show rows of a contract table.
    Table {
        /// Contract account.
        contract: String,

        /// Table name.
        table: String,

        /// Scope; defaults to the contract account.
        #[arg(long)]
        scope: Option<String>,

        /// Maximum number of rows.
        #[arg(long, default_value_t = teos_catalog::get::DEFAULT_TABLE_LIMIT)]
        limit: u32,
    },

    /// Key management.
    Key {
        /// Key subcommand to execute.
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Wallet management.
    Wallet {
        /// Wallet subcommand to execute.
        #[command(subcommand)]
        command: WalletCommands,
    },

    /// Local node lifecycle.
    Node {
        /// Node subcommand to execute.
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Push an action to a contract.
    Push(PushArgs),

    /// Create a contract definition from the template.
    Bootstrap {
        /// Contract name or directory.
        name: String,

        /// Delete an existing definition first.
        #[arg(long)]
        remove_existing: bool,
    },
}

/// Key subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum KeyCommands {
    /// Create a key pair.
    Create {
        /// Label of the key pair.
        name: String,
    },
}

/// Wallet subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum WalletCommands {
    /// Create a wallet.
    Create {
        /// Wallet name.
        #[arg(default_value = teos_catalog::DEFAULT_WALLET)]
        name: String,
    },

    /// List wallets.
    List,

    /// List private keys of unlocked wallets.
    Keys,

    /// Import a private key.
    Import {
        /// Private key, WIF.
        key: String,

        /// Wallet name.
        #[arg(long, default_value = teos_catalog::DEFAULT_WALLET)]
        wallet: String,
    },

    /// Open a wallet.
    Open {
        /// Wallet name.
        #[arg(default_value = teos_catalog::DEFAULT_WALLET)]
        name: String,
    },

    /// Lock a wallet.
    Lock {
        /// Wallet name.
        #[arg(default_value = teos_catalog::DEFAULT_WALLET)]
        name: String,
    },

    /// Unlock a wallet.
    Unlock {
        /// Wallet name.
        #[arg(default_value = teos_catalog::DEFAULT_WALLET)]
        name: String,

        /// Password returned by `wallet create`.
        #[arg(long, env = "TEOS_WALLET_PASSWORD")]
        password: String,
    },
}

/// Node subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NodeCommands {
    /// Start a local node in its own terminal.
    Start {
        /// Wipe the chain data first.
        #[arg(long)]
        clear: bool,
    },

    /// Stop the local node.
    Stop,

    /// Wait until the node produces blocks.
    Probe {
        /// Attempt budget; defaults to the configuration.
        #[arg(long)]
        attempts: Option<u32>,

        /// Head block to wait for; defaults to the configuration.
        #[arg(long)]
        target: Option<u64>,
    },
}

/// Arguments for the push command.
#[derive(Parser, Debug, Clone)]
pub struct PushArgs {
    /// Contract account.
    pub contract: String,

    /// Action name.
    pub action: String,

    /// Action data, JSON.
    pub data: String,

    /// Authorizing account; defaults to the contract account.
    #[arg(short, long)]
    pub permission: Option<String>,

    /// Print the transaction instead of broadcasting it.
    #[arg(long)]
    pub dont_broadcast: bool,

    /// Transaction expiration in seconds.
    #[arg(long, default_value_t = teos_catalog::tx::DEFAULT_EXPIRATION_SEC)]
    pub expiration: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["teosctl", "info"]).expect("parse");
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.format, Format::Text);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Commands::Info));
    }

    #[test]
    fn test_parse_wallet_unlock() {
        let cli = Cli::try_parse_from([
            "teosctl", "wallet", "unlock", "work", "--password", "PW5secret",
        ])
        .expect("parse");
        match cli.command {
            Commands::Wallet {
                command: WalletCommands::Unlock { name, password },
            } => {
                assert_eq!(name, "work");
                assert_eq!(password, "PW5secret");
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_push() {
        let cli = Cli::try_parse_from([
            "teosctl",
            "--format",
            "json",
            "push",
            "hello",
            "hi",
            r#"{"user":"carol"}"#,
            "--dont-broadcast",
        ])
        .expect("parse");
        assert_eq!(cli.format, Format::Json);
        let Commands::Push(args) = cli.command else {
            unreachable!("expected push");
        };
        assert_eq!(args.data, r#"{"user":"carol"}"#);
        assert!(args.dont_broadcast);
        assert_eq!(args.permission, None);
        assert_eq!(args.expiration, 30);
    }

    #[test_case(&["teosctl", "wallet", "create"], "default" ; "create")]
    #[test_case(&["teosctl", "wallet", "open"], "default" ; "open")]
    #[test_case(&["teosctl", "wallet", "lock", "work"], "work" ; "lock named")]
    fn test_wallet_name_defaults(args: &[&str], expected: &str) {
        let cli = Cli::try_parse_from(args).expect("parse");
        let Commands::Wallet { command } = cli.command else {
            unreachable!("expected wallet");
        };
        let name = match command {
            WalletCommands::Create { name }
            | WalletCommands::Open { name }
            | WalletCommands::Lock { name } => name,
            other => unreachable!("unexpected wallet command {other:?}"),
        };
        assert_eq!(name, expected);
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["teosctl", "--format", "yaml", "info"]).is_err());
    }
}
