//! LXD network representation

use lxnet_core::{CanonicalConfig, NetworkHandle};
use serde::{Deserialize, Serialize};

/// A network as returned by `GET /1.0/networks/<name>`
///
/// Only `description` and `config` are writable; the other fields are kept
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LxdNetwork {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub config: CanonicalConfig,

    /// bridge, macvlan, sriov, ovn, physical
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub managed: bool,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub used_by: Vec<String>,
}

impl LxdNetwork {
    /// Body for `PUT /1.0/networks/<name>`
    pub(crate) fn to_put(&self) -> NetworkPut<'_> {
        NetworkPut {
            description: &self.description,
            config: &self.config,
        }
    }
}

impl NetworkHandle for LxdNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    fn set_config(&mut self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

// ============ API Types ============

/// Standard LXD response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    #[serde(rename = "type")]
    pub kind: String,
    pub metadata: Option<T>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_code: u16,
}

#[derive(Debug, Serialize)]
pub(crate) struct NetworksPost<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub config: &'a CanonicalConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct NetworkPut<'a> {
    pub description: &'a str,
    pub config: &'a CanonicalConfig,
}
