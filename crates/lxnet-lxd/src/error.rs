//! LXD client error types

use lxnet_core::ClientError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LxdError {
    #[error("unsupported remote address \"{0}\": expected an https:// URL or a unix socket path")]
    UnsupportedRemote(String),

    #[error("invalid URL \"{url}\": {message}")]
    InvalidUrl { url: String, message: String },

    #[error("cannot reach LXD on unix socket {}: {message}", path.display())]
    Socket { path: PathBuf, message: String },

    #[error("no response from LXD within {0:?}")]
    Timeout(Duration),

    #[error("cert and key must be given together")]
    IncompleteIdentity,

    #[error("failed to read {}: {source}", path.display())]
    ReadIdentity {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network not found: {0}")]
    NetworkNotFound(String),

    #[error("{message} (HTTP {code})")]
    Api { code: u16, message: String },

    #[error("unexpected LXD response: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LxdError>;

impl From<LxdError> for ClientError {
    fn from(err: LxdError) -> Self {
        match err {
            LxdError::NetworkNotFound(name) => ClientError::NotFound(name),
            other => ClientError::Transport(other.to_string()),
        }
    }
}
