//! Declaration and connection types

use crate::config::ConfigInput;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Desired state of a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredSpec {
    /// Network name, the identity of the remote resource
    pub name: String,

    /// Description; `None` means empty
    #[serde(default)]
    pub description: Option<String>,

    /// Config entries to merge into the remote config
    #[serde(default)]
    pub config: Option<ConfigInput>,
}

impl DesiredSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_config(mut self, config: ConfigInput) -> Self {
        self.config = Some(config);
        self
    }
}

/// How to reach the LXD daemon
///
/// Handed to the client unchanged on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// `https://host:8443`, a unix socket path, or `None` for the local daemon
    #[serde(default)]
    pub remote_addr: Option<String>,

    /// PEM client certificate
    #[serde(default)]
    pub cert: Option<PathBuf>,

    /// PEM client key
    #[serde(default)]
    pub key: Option<PathBuf>,

    /// Verify the server certificate
    #[serde(default = "default_verify_cert")]
    pub verify_cert: bool,
}

fn default_verify_cert() -> bool {
    true
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            remote_addr: None,
            cert: None,
            key: None,
            verify_cert: true,
        }
    }
}

impl ConnectionParams {
    pub fn remote(addr: impl Into<String>) -> Self {
        Self {
            remote_addr: Some(addr.into()),
            ..Self::default()
        }
    }

    pub fn with_identity(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.cert = Some(cert.into());
        self.key = Some(key.into());
        self
    }

    pub fn with_verify_cert(mut self, verify_cert: bool) -> Self {
        self.verify_cert = verify_cert;
        self
    }
}
