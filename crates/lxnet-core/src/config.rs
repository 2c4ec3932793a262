//! Desired config normalization
//!
//! A declaration may give its config either as a map or as an ordered list of
//! `{key, value}` records. Both forms are resolved here, once, into a
//! [`CanonicalConfig`]; nothing downstream looks at [`ConfigInput`] again.

use crate::error::{NetworkError, Result};
use crate::outcome::{CREATED_SLOT, DESCRIPTION_SLOT, REMOVED_SLOT};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Config keys mapped to string values, in declaration order
pub type CanonicalConfig = IndexMap<String, String>;

/// Config as written in a declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigInput {
    /// `{ "ipv4.address": "10.0.3.1/24", ... }`
    Map(IndexMap<String, Value>),

    /// `[{ "key": "ipv4.address", "value": "10.0.3.1/24" }, ...]`
    List(Vec<Value>),
}

impl ConfigInput {
    /// Build a map-form config from string pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }
}

/// Resolve a declared config into its canonical mapping
///
/// Map values and list entries must be scalars (string, number or boolean).
/// In the list form a repeated key overwrites the earlier value but keeps the
/// position of its first occurrence. Keys naming a fixed change-set slot
/// (`description`, `created`, `removed`) are rejected.
pub fn normalize(config: Option<&ConfigInput>) -> Result<CanonicalConfig> {
    let mut canonical = CanonicalConfig::new();

    match config {
        None => {}
        Some(ConfigInput::Map(map)) => {
            for (key, value) in map {
                let value =
                    scalar_to_string(value).ok_or_else(|| NetworkError::InvalidConfigValue {
                        key: key.clone(),
                        value: value.to_string(),
                    })?;
                canonical.insert(reserve_check(key)?.to_string(), value);
            }
        }
        Some(ConfigInput::List(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let (key, value) =
                    list_entry(entry).ok_or_else(|| NetworkError::InvalidConfigEntry {
                        index,
                        entry: entry.to_string(),
                    })?;
                reserve_check(&key)?;
                canonical.insert(key, value);
            }
        }
    }

    Ok(canonical)
}

fn reserve_check(key: &str) -> Result<&str> {
    if [DESCRIPTION_SLOT, CREATED_SLOT, REMOVED_SLOT].contains(&key) {
        return Err(NetworkError::ReservedConfigKey(key.to_string()));
    }
    Ok(key)
}

fn list_entry(entry: &Value) -> Option<(String, String)> {
    let record = entry.as_object()?;
    let key = scalar_to_string(record.get("key")?)?;
    let value = scalar_to_string(record.get("value")?)?;
    Some((key, value))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: Value) -> ConfigInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_none_is_empty() {
        assert!(normalize(None).unwrap().is_empty());
    }

    #[test]
    fn test_map_values_are_coerced() {
        let input = ConfigInput::Map(IndexMap::from([
            ("ipv4.address".to_string(), json!("10.0.3.1/24")),
            ("bridge.mtu".to_string(), json!(1500)),
            ("ipv6.nat".to_string(), json!(true)),
        ]));

        let config = normalize(Some(&input)).unwrap();
        assert_eq!(config["ipv4.address"], "10.0.3.1/24");
        assert_eq!(config["bridge.mtu"], "1500");
        assert_eq!(config["ipv6.nat"], "true");
        assert_eq!(
            config.keys().collect::<Vec<_>>(),
            vec!["ipv4.address", "bridge.mtu", "ipv6.nat"]
        );
    }

    #[test]
    fn test_list_is_ordered() {
        let input = list(json!([
            {"key": "boot.autostart", "value": 1},
            {"key": "security.privileged", "value": "1"}
        ]));
        assert!(matches!(input, ConfigInput::List(_)));

        let config = normalize(Some(&input)).unwrap();
        assert_eq!(
            config.into_iter().collect::<Vec<_>>(),
            vec![
                ("boot.autostart".to_string(), "1".to_string()),
                ("security.privileged".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_duplicate_keeps_first_position() {
        let input = list(json!([
            {"key": "a", "value": "1"},
            {"key": "b", "value": "2"},
            {"key": "a", "value": "3"}
        ]));

        let config = normalize(Some(&input)).unwrap();
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(config["a"], "3");
    }

    #[test]
    fn test_list_entry_without_value() {
        let input = list(json!([
            {"key": "a", "value": "1"},
            {"key": "b"}
        ]));

        let err = normalize(Some(&input)).unwrap_err();
        match err {
            NetworkError::InvalidConfigEntry { index, entry } => {
                assert_eq!(index, 1);
                assert!(entry.contains("\"b\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_list_entry_without_key() {
        let input = list(json!([{"value": "1"}]));
        assert!(matches!(
            normalize(Some(&input)),
            Err(NetworkError::InvalidConfigEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_list_entry_not_a_record() {
        let input = list(json!(["ipv4.address=auto"]));
        assert!(matches!(
            normalize(Some(&input)),
            Err(NetworkError::InvalidConfigEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_map_rejects_nested_value() {
        let input: ConfigInput =
            serde_json::from_value(json!({"ipv4.routes": ["10.0.0.0/8"]})).unwrap();
        assert!(matches!(
            normalize(Some(&input)),
            Err(NetworkError::InvalidConfigValue { key, .. }) if key == "ipv4.routes"
        ));
    }

    #[test]
    fn test_slot_names_are_reserved() {
        let map = ConfigInput::from_pairs([("ipv4.nat", "true"), ("description", "x")]);
        assert_eq!(
            normalize(Some(&map)),
            Err(NetworkError::ReservedConfigKey("description".into()))
        );

        let list = list(json!([{"key": "removed", "value": "1"}]));
        assert_eq!(
            normalize(Some(&list)),
            Err(NetworkError::ReservedConfigKey("removed".into()))
        );
    }

    #[test]
    fn test_map_and_list_are_equivalent() {
        let map = ConfigInput::from_pairs([("x", "1")]);
        let list = list(json!([{"key": "x", "value": "1"}]));
        assert_eq!(normalize(Some(&map)).unwrap(), normalize(Some(&list)).unwrap());
    }
}
