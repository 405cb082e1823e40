//! Transaction options shared by commands that push a transaction.

use teos_gateway::ArgumentMap;

/// Expiration used unless overridden, in seconds.
pub const DEFAULT_EXPIRATION_SEC: u32 = 30;

/// Options written into every transaction-pushing command.
///
/// Flags go to the tool as `0`/`1`; usage limits of `0` mean no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    /// Seconds before the transaction expires.
    pub expiration_sec: u32,
    /// Do not sign with unlocked wallet keys.
    pub skip_signature: bool,
    /// Print the transaction instead of broadcasting it.
    pub dont_broadcast: bool,
    /// Force the transaction to be unique.
    pub force_unique: bool,
    /// CPU budget in instructions retired.
    pub max_cpu_usage: u64,
    /// Net budget in bytes.
    pub max_net_usage: u64,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            expiration_sec: DEFAULT_EXPIRATION_SEC,
            skip_signature: false,
            dont_broadcast: false,
            force_unique: false,
            max_cpu_usage: 0,
            max_net_usage: 0,
        }
    }
}

impl TxOptions {
    /// Set the expiration.
    #[must_use]
    pub const fn expiration_sec(mut self, seconds: u32) -> Self {
        self.expiration_sec = seconds;
        self
    }

    /// Skip signing.
    #[must_use]
    pub const fn skip_signature(mut self) -> Self {
        self.skip_signature = true;
        self
    }

    /// Do not broadcast.
    #[must_use]
    pub const fn dont_broadcast(mut self) -> Self {
        self.dont_broadcast = true;
        self
    }

    /// Force uniqueness.
    #[must_use]
    pub const fn force_unique(mut self) -> Self {
        self.force_unique = true;
        self
    }

    /// Set the CPU budget.
    #[must_use]
    pub const fn max_cpu_usage(mut self, limit: u64) -> Self {
        self.max_cpu_usage = limit;
        self
    }

    /// Set the net budget.
    #[must_use]
    pub const fn max_net_usage(mut self, limit: u64) -> Self {
        self.max_net_usage = limit;
        self
    }

    /// Write the transaction keys into an argument map.
    pub fn apply(&self, arguments: &mut ArgumentMap) {
        arguments.insert("expiration", self.expiration_sec);
        arguments.insert("skip-sign", u8::from(self.skip_signature));
        arguments.insert("dont-broadcast", u8::from(self.dont_broadcast));
        arguments.insert("force-unique", u8::from(self.force_unique));
        arguments.insert("max-cpu-usage", self.max_cpu_usage);
        arguments.insert("max-net-usage", self.max_net_usage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_written() {
        let mut map = ArgumentMap::new();
        TxOptions::default().apply(&mut map);
        assert_eq!(
            map.to_json_text(),
            json!({
                "expiration": 30,
                "skip-sign": 0,
                "dont-broadcast": 0,
                "force-unique": 0,
                "max-cpu-usage": 0,
                "max-net-usage": 0,
            })
            .to_string()
        );
    }

    #[test]
    fn test_builder_overrides() {
        let mut map = ArgumentMap::new();
        TxOptions::default()
            .expiration_sec(120)
            .dont_broadcast()
            .max_net_usage(4096)
            .apply(&mut map);
        assert_eq!(map.get("expiration"), Some(&json!(120)));
        assert_eq!(map.get("dont-broadcast"), Some(&json!(1)));
        assert_eq!(map.get("skip-sign"), Some(&json!(0)));
        assert_eq!(map.get("max-net-usage"), Some(&json!(4096)));
    }
}
