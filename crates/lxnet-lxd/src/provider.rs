//! `NetworkClient` implementation for LXD

use crate::network::LxdNetwork;
use crate::rest::LxdRest;
use async_trait::async_trait;
use lxnet_core::{CanonicalConfig, ClientError, ConnectionParams, NetworkClient};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// LXD network client
pub struct LxdClient {
    timeout: Duration,
}

impl Default for LxdClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LxdClient {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn session(&self, conn: &ConnectionParams) -> Result<LxdRest, ClientError> {
        Ok(LxdRest::connect(conn, self.timeout).await?)
    }
}

#[async_trait]
impl NetworkClient for LxdClient {
    type Handle = LxdNetwork;

    fn name(&self) -> &str {
        "lxd"
    }

    async fn fetch(
        &self,
        name: &str,
        conn: &ConnectionParams,
    ) -> Result<Option<LxdNetwork>, ClientError> {
        let rest = self.session(conn).await?;
        Ok(rest.get_network(name).await?)
    }

    async fn create(
        &self,
        name: &str,
        config: &CanonicalConfig,
        description: &str,
        conn: &ConnectionParams,
    ) -> Result<(), ClientError> {
        let rest = self.session(conn).await?;
        rest.create_network(name, description, config).await?;
        tracing::info!("Created network {} on {}", name, rest.endpoint());
        Ok(())
    }

    async fn save_updated(
        &self,
        network: &LxdNetwork,
        conn: &ConnectionParams,
    ) -> Result<(), ClientError> {
        let rest = self.session(conn).await?;
        rest.update_network(network).await?;
        tracing::info!("Updated network {} on {}", network.name, rest.endpoint());
        Ok(())
    }

    async fn delete(&self, name: &str, conn: &ConnectionParams) -> Result<(), ClientError> {
        let rest = self.session(conn).await?;
        rest.delete_network(name).await?;
        tracing::info!("Deleted network {} on {}", name, rest.endpoint());
        Ok(())
    }
}
