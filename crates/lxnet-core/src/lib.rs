//! lxnet core
//!
//! Converges a named LXD network to a desired declaration. The core fetches
//! the current network through a [`NetworkClient`], computes a structured
//! [`ChangeSet`] and applies it exactly once, or only reports it in dry-run
//! mode.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   lxnet CLI                      │
//! │            (lxnet apply / present / absent)      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                  lxnet-core                      │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │               Reconciler                  │   │
//! │  │        present() / absent()               │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌────────────┐  ┌────────────┐  ┌──────────┐   │
//! │  │ Normalizer │  │    Diff    │  │ Outcome  │   │
//! │  └────────────┘  └────────────┘  └──────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait NetworkClient
//! ┌─────────────────▼───────────────┐
//! │            lxnet-lxd            │
//! │        (LXD REST client)        │
//! └─────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod outcome;
pub mod reconciler;

// Re-exports
pub use client::{NetworkClient, NetworkHandle, RemoteNetwork};
pub use config::{CanonicalConfig, ConfigInput, normalize};
pub use diff::diff;
pub use error::{ClientError, NetworkError, Result};
pub use model::{ConnectionParams, DesiredSpec};
pub use outcome::{Change, ChangeSet, Outcome, OutcomeStatus, Summary};
pub use reconciler::Reconciler;
