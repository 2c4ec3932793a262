//! Network declaration files
//!
//! ```yaml
//! networks:
//!   - name: lxdbr0
//!     description: default bridge
//!     config:
//!       ipv4.address: 10.0.3.1/24
//!       ipv4.nat: true
//!     remote_addr: https://lxd.lan:8443
//!     cert: ~/.config/lxc/client.crt
//!     key: ~/.config/lxc/client.key
//!     verify_cert: false
//!   - name: legacy0
//!     ensure: absent
//! ```

use crate::error::{ConfigError, Result};
use crate::expand_home;
use lxnet_core::{ConfigInput, ConnectionParams, DesiredSpec};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Contents of a declaration file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declarations {
    #[serde(default)]
    pub networks: Vec<NetworkDeclaration>,
}

/// Whether the network should exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

/// One declared network together with how to reach its daemon
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDeclaration {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Map or list of `{key, value}`
    #[serde(default)]
    pub config: Option<ConfigInput>,

    #[serde(default)]
    pub ensure: Ensure,

    #[serde(default)]
    pub remote_addr: Option<String>,

    #[serde(default)]
    pub cert: Option<PathBuf>,

    #[serde(default)]
    pub key: Option<PathBuf>,

    #[serde(default = "default_verify_cert")]
    pub verify_cert: bool,
}

fn default_verify_cert() -> bool {
    true
}

impl NetworkDeclaration {
    pub fn spec(&self) -> DesiredSpec {
        DesiredSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            config: self.config.clone(),
        }
    }

    /// Connection parameters with `~` expanded in the identity paths
    pub fn connection(&self) -> ConnectionParams {
        ConnectionParams {
            remote_addr: self.remote_addr.clone(),
            cert: self.cert.as_deref().map(expand_home),
            key: self.key.as_deref().map(expand_home),
            verify_cert: self.verify_cert,
        }
    }
}

impl Declarations {
    /// Parse a declaration document; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let declarations: Declarations =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        declarations.validate(path)?;
        Ok(declarations)
    }

    /// Read and parse a declaration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: String| ConfigError::InvalidDeclaration {
            path: path.to_path_buf(),
            message,
        };

        let mut seen = HashSet::new();
        for (index, network) in self.networks.iter().enumerate() {
            if network.name.trim().is_empty() {
                return Err(invalid(format!("network #{index} has an empty name")));
            }
            if !seen.insert(network.name.as_str()) {
                return Err(invalid(format!(
                    "network \"{}\" is declared more than once",
                    network.name
                )));
            }
        }
        Ok(())
    }
}
