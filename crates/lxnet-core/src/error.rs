//! Reconciler error types

use thiserror::Error;

/// Errors reported by a [`NetworkClient`](crate::NetworkClient)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The network does not exist on the remote side
    #[error("Network not found: {0}")]
    NotFound(String),

    /// Connection, authentication or protocol failure. Displayed verbatim.
    #[error("{0}")]
    Transport(String),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Invalid input, detected before any remote call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid network name: {0:?}")]
    InvalidName(String),

    #[error("Invalid config entry #{index}: {entry} (expected an object with \"key\" and \"value\")")]
    InvalidConfigEntry { index: usize, entry: String },

    #[error("Invalid value for config key \"{key}\": {value} (expected a string, number or boolean)")]
    InvalidConfigValue { key: String, value: String },

    /// The key would share a change-set slot with the description,
    /// creation or removal record
    #[error("Config key \"{0}\" is reserved")]
    ReservedConfigKey(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
