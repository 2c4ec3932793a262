//! LXD REST session
//!
//! One session per remote call: the HTTP client is built from the
//! connection parameters of that call and dropped afterwards. The daemon is
//! reached either over HTTPS or over its local unix socket.

use crate::error::{LxdError, Result};
use crate::network::{ApiResponse, LxdNetwork, NetworksPost};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use hyperlocal::UnixConnector;
use lxnet_core::{CanonicalConfig, ConnectionParams};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

const API_VERSION: &str = "1.0";

/// Overrides the directory holding the local daemon's `unix.socket`
pub const LXD_DIR_ENV: &str = "LXD_DIR";

/// Local sockets tried in order when neither `remote_addr` nor `LXD_DIR` is set
const SOCKET_CANDIDATES: [&str; 2] = [
    "/var/lib/lxd/unix.socket",
    "/var/snap/lxd/common/lxd/unix.socket",
];

/// The unix socket transport ignores the host; only the path is sent
const SOCKET_BASE_URL: &str = "http://lxd/";

enum Transport {
    Https(reqwest::Client),
    Unix {
        client: Client<UnixConnector, Full<Bytes>>,
        socket: PathBuf,
    },
}

/// Connection to one LXD daemon
pub struct LxdRest {
    transport: Transport,
    base_url: Url,
    timeout: Duration,
}

impl LxdRest {
    /// Build a session for `conn`
    ///
    /// `remote_addr` is an `https://` URL, a unix socket path (`/path` or
    /// `unix:/path`), or `None` for the local daemon.
    pub async fn connect(conn: &ConnectionParams, timeout: Duration) -> Result<Self> {
        let remote = conn.remote_addr.as_deref().map(str::trim);

        let socket = match remote {
            None | Some("") => Some(default_socket_path(std::env::var_os(LXD_DIR_ENV))),
            Some(remote) => socket_path(remote),
        };

        if let Some(socket) = socket {
            return Ok(Self {
                transport: Transport::Unix {
                    client: Client::builder(TokioExecutor::new()).build(UnixConnector),
                    socket,
                },
                base_url: parse_url(SOCKET_BASE_URL)?,
                timeout,
            });
        }

        let remote = remote.unwrap_or_default();
        if !(remote.starts_with("https://") || remote.starts_with("http://")) {
            return Err(LxdError::UnsupportedRemote(remote.to_string()));
        }

        Ok(Self {
            transport: Transport::Https(https_client(conn, timeout).await?),
            base_url: parse_url(remote)?,
            timeout,
        })
    }

    /// Where requests go, for log lines
    pub fn endpoint(&self) -> String {
        match &self.transport {
            Transport::Https(_) => self.base_url.as_str().trim_end_matches('/').to_string(),
            Transport::Unix { socket, .. } => format!("unix:{}", socket.display()),
        }
    }

    /// `/1.0/networks[/<name>]` below the base URL, the name percent-encoded
    /// as a single segment
    fn networks_url(&self, name: Option<&str>) -> Result<Url> {
        if let Some(name) = name.filter(|n| n.is_empty() || *n == "." || *n == "..") {
            return Err(LxdError::InvalidUrl {
                url: self.base_url.to_string(),
                message: format!("\"{name}\" is not a network name"),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| LxdError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend([API_VERSION, "networks"])
            .extend(name);
        Ok(url)
    }

    /// `GET /1.0/networks/<name>`, `None` on 404
    pub async fn get_network(&self, name: &str) -> Result<Option<LxdNetwork>> {
        let url = self.networks_url(Some(name))?;
        match self.request::<(), LxdNetwork>(Method::GET, name, url, None).await {
            Ok(Some(network)) => Ok(Some(network)),
            Ok(None) => Err(LxdError::UnexpectedResponse(format!(
                "no metadata for network {name}"
            ))),
            Err(LxdError::NetworkNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `POST /1.0/networks`
    pub async fn create_network(
        &self,
        name: &str,
        description: &str,
        config: &CanonicalConfig,
    ) -> Result<()> {
        let body = NetworksPost {
            name,
            description,
            config,
        };
        let url = self.networks_url(None)?;
        self.request::<_, serde_json::Value>(Method::POST, name, url, Some(&body))
            .await?;
        Ok(())
    }

    /// `PUT /1.0/networks/<name>` with the description and full config
    pub async fn update_network(&self, network: &LxdNetwork) -> Result<()> {
        let url = self.networks_url(Some(&network.name))?;
        self.request::<_, serde_json::Value>(
            Method::PUT,
            &network.name,
            url,
            Some(&network.to_put()),
        )
        .await?;
        Ok(())
    }

    /// `DELETE /1.0/networks/<name>`
    pub async fn delete_network(&self, name: &str) -> Result<()> {
        let url = self.networks_url(Some(name))?;
        self.request::<(), serde_json::Value>(Method::DELETE, name, url, None)
            .await?;
        Ok(())
    }

    async fn request<B, T>(
        &self,
        method: Method,
        network: &str,
        url: Url,
        body: Option<&B>,
    ) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, text) = match &self.transport {
            Transport::Https(client) => {
                tracing::debug!("{} {}", method, url);

                let mut request = client.request(method, url);
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request.send().await?;
                let status = response.status();
                (status, response.text().await?)
            }
            Transport::Unix { client, socket } => {
                tracing::debug!("{} unix:{}{}", method, socket.display(), url.path());

                let body = body.map(serde_json::to_vec).transpose()?;
                let exchange = send_unix(client, socket, method, url.path(), body);
                tokio::time::timeout(self.timeout, exchange)
                    .await
                    .map_err(|_| LxdError::Timeout(self.timeout))??
            }
        };

        decode(status, network, &text)
    }
}

async fn send_unix(
    client: &Client<UnixConnector, Full<Bytes>>,
    socket: &Path,
    method: Method,
    path: &str,
    body: Option<Vec<u8>>,
) -> Result<(StatusCode, String)> {
    let mut request = hyper::Request::builder()
        .method(method)
        .uri(hyperlocal::Uri::new(socket, path));

    let payload = match body {
        Some(body) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Full::new(Bytes::from(body))
        }
        None => Full::new(Bytes::new()),
    };

    let response = client
        .request(request.body(payload)?)
        .await
        .map_err(|e| socket_error(socket, &e))?;
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| socket_error(socket, &e))?
        .to_bytes();

    Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
}

/// Unwrap the LXD envelope of a response
///
/// A 404 only means "no such network" when LXD itself says so in an error
/// envelope; a bare 404 from something else in front of the daemon is an
/// API error.
fn decode<T>(status: StatusCode, network: &str, text: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(text) {
        Ok(envelope) if status.is_success() && envelope.kind != "error" => envelope
            .metadata
            .map(serde_json::from_value)
            .transpose()
            .map_err(LxdError::from),
        Ok(envelope) if envelope.kind == "error" && envelope.error_code == 404 => {
            Err(LxdError::NetworkNotFound(network.to_string()))
        }
        Ok(envelope) => Err(api_error(status, envelope.error_code, &envelope.error)),
        Err(_) if !status.is_success() => Err(api_error(status, 0, text.trim())),
        Err(e) => Err(e.into()),
    }
}

fn api_error(status: StatusCode, error_code: u16, message: &str) -> LxdError {
    let code = if error_code != 0 {
        error_code
    } else {
        status.as_u16()
    };
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("unknown error")
    } else {
        message
    };

    LxdError::Api {
        code,
        message: message.to_string(),
    }
}

fn socket_error(socket: &Path, err: &dyn std::error::Error) -> LxdError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    LxdError::Socket {
        path: socket.to_path_buf(),
        message,
    }
}

/// `/path/unix.socket` or `unix:/path/unix.socket`
fn socket_path(remote: &str) -> Option<PathBuf> {
    let path = remote.strip_prefix("unix:").unwrap_or(remote);
    path.starts_with('/').then(|| PathBuf::from(path))
}

/// `$LXD_DIR/unix.socket`, else the first existing well-known socket
fn default_socket_path(lxd_dir: Option<OsString>) -> PathBuf {
    if let Some(dir) = lxd_dir.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir).join("unix.socket");
    }

    SOCKET_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(SOCKET_CANDIDATES[0]))
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| LxdError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}

async fn https_client(conn: &ConnectionParams, timeout: Duration) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(timeout);

    if !conn.verify_cert {
        builder = builder.danger_accept_invalid_certs(true);
    }

    match (&conn.cert, &conn.key) {
        (Some(cert), Some(key)) => {
            // reqwest wants certificate and key in a single PEM buffer
            let mut pem = read_pem(cert).await?;
            pem.push(b'\n');
            pem.extend_from_slice(&read_pem(key).await?);
            builder = builder.identity(reqwest::Identity::from_pem(&pem)?);
        }
        (None, None) => {}
        _ => return Err(LxdError::IncompleteIdentity),
    }

    Ok(builder.build()?)
}

async fn read_pem(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| LxdError::ReadIdentity {
            path: path.to_path_buf(),
            source,
        })
}
