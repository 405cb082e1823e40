//! Argument maps passed to the tool under `--jarg`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered key/value payload serialized to JSON for one invocation.
///
/// Keys keep insertion order. A map is built fresh for each call and never
/// reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArgumentMap {
    entries: Map<String, Value>,
}

impl ArgumentMap {
    /// Create an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`ArgumentMap::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the single-argument JSON text the tool expects.
    #[must_use]
    pub fn to_json_text(&self) -> String {
        // Serializing a map of `Value`s cannot fail.
        Value::Object(self.entries.clone()).to_string()
    }
}

impl From<Map<String, Value>> for ArgumentMap {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ArgumentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_map_serializes_to_braces() {
        assert_eq!(ArgumentMap::new().to_json_text(), "{}");
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let map = ArgumentMap::new()
            .with("creator", "eosio")
            .with("name", "alice")
            .with("expiration", 30);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["creator", "name", "expiration"]);
        assert_eq!(
            map.to_json_text(),
            r#"{"creator":"eosio","name":"alice","expiration":30}"#
        );
    }

    #[test]
    fn test_quotes_are_double_and_escaped() {
        let map = ArgumentMap::new().with("data", r#"{"from":"alice","memo":"it's"}"#);
        let text = map.to_json_text();
        assert!(!text.starts_with("{'"));
        let back: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(back["data"], json!(r#"{"from":"alice","memo":"it's"}"#));
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = ArgumentMap::new();
        map.insert("name", "default");
        map.insert("name", "wallet2");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("name"), Some(&json!("wallet2")));
    }

    #[test]
    fn test_from_iterator() {
        let map: ArgumentMap = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.to_json_text(), r#"{"a":1,"b":2}"#);
    }
}
