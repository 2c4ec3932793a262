//! Remote network client trait definition

use crate::config::CanonicalConfig;
use crate::error::ClientError;
use crate::model::ConnectionParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Access to the networks of an LXD control plane
///
/// The reconciler only ever calls these four operations. Implementations own
/// the transport, authentication and wire encoding.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Working copy of a fetched network
    type Handle: NetworkHandle + Send + Sync;

    /// Returns the client name for logs (e.g. "lxd")
    fn name(&self) -> &str;

    /// Fetch a network, `Ok(None)` if it does not exist
    async fn fetch(
        &self,
        name: &str,
        conn: &ConnectionParams,
    ) -> Result<Option<Self::Handle>, ClientError>;

    /// Create a network
    async fn create(
        &self,
        name: &str,
        config: &CanonicalConfig,
        description: &str,
        conn: &ConnectionParams,
    ) -> Result<(), ClientError>;

    /// Write the description and config of a modified working copy back
    async fn save_updated(
        &self,
        network: &Self::Handle,
        conn: &ConnectionParams,
    ) -> Result<(), ClientError>;

    /// Delete a network; [`ClientError::NotFound`] if it does not exist
    async fn delete(&self, name: &str, conn: &ConnectionParams) -> Result<(), ClientError>;
}

/// A fetched network as seen by the reconciler
///
/// Everything else the client keeps in its handle stays opaque.
pub trait NetworkHandle {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn config_value(&self, key: &str) -> Option<&str>;

    fn set_description(&mut self, description: &str);

    fn set_config(&mut self, key: &str, value: &str);
}

/// Plain network representation
///
/// Usable as a handle by clients that need nothing beyond name, description
/// and config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNetwork {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub config: CanonicalConfig,
}

impl RemoteNetwork {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

impl NetworkHandle for RemoteNetwork {
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
