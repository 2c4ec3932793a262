//! LXD backend for lxnet
//!
//! This crate implements the `NetworkClient` trait over the LXD REST API
//! (`/1.0/networks`).
//!
//! # Requirements
//!
//! Either access to the local daemon's unix socket (`$LXD_DIR/unix.socket`,
//! `/var/lib/lxd/unix.socket` or the snap location), or
//!
//! - an LXD daemon reachable over HTTPS (`core.https_address`)
//! - a client certificate trusted by the daemon (`lxc config trust add`)
//!
//! # Example
//!
//! ```ignore
//! use lxnet_core::{ConnectionParams, DesiredSpec, Reconciler};
//! use lxnet_lxd::LxdClient;
//!
//! let conn = ConnectionParams::remote("https://lxd.lan:8443")
//!     .with_identity("~/.config/lxc/client.crt", "~/.config/lxc/client.key")
//!     .with_verify_cert(false);
//!
//! let reconciler = Reconciler::new(LxdClient::new());
//! let outcome = reconciler
//!     .present(&DesiredSpec::new("lxdbr0").with_description("bridge"), &conn, false)
//!     .await?;
//! println!("{outcome}");
//! ```

pub mod error;
pub mod network;
pub mod provider;
pub mod rest;

pub use error::{LxdError, Result};
pub use network::LxdNetwork;
pub use provider::LxdClient;
pub use rest::{LXD_DIR_ENV, LxdRest};
