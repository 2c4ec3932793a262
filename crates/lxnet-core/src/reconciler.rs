//! `present` / `absent` state machines

use crate::client::NetworkClient;
use crate::config::{CanonicalConfig, normalize};
use crate::diff::diff;
use crate::error::{ClientError, NetworkError, Result};
use crate::model::{ConnectionParams, DesiredSpec};
use crate::outcome::{CREATED_SLOT, Change, ChangeSet, Outcome, REMOVED_SLOT};

/// Converges networks through an injected [`NetworkClient`]
///
/// Holds no state between invocations: every call re-fetches the network,
/// so re-running after a failure is safe.
pub struct Reconciler<C> {
    client: C,
}

impl<C: NetworkClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Ensure the network exists with the given description and config
    ///
    /// Invalid input is returned as `Err` before anything is sent to the
    /// remote side. Remote failures end up as a [`Failure`] outcome.
    ///
    /// [`Failure`]: crate::OutcomeStatus::Failure
    pub async fn present(
        &self,
        spec: &DesiredSpec,
        conn: &ConnectionParams,
        dry_run: bool,
    ) -> Result<Outcome> {
        let name = validate_name(&spec.name)?;
        let config = normalize(spec.config.as_ref())?;
        let description = spec.description.as_deref().unwrap_or_default();

        tracing::debug!("Fetching network {} via {}", name, self.client.name());
        let fetched = match self.client.fetch(name, conn).await {
            Ok(network) => network,
            Err(ClientError::NotFound(_)) => None,
            Err(e) => return Ok(failed(name, e)),
        };

        let Some(mut network) = fetched else {
            return Ok(self
                .create(name, &config, description, conn, dry_run)
                .await);
        };

        let changes = diff(Some(description), &config, &mut network);

        if changes.is_empty() {
            return Ok(Outcome::no_op(name, "No changes"));
        }

        if dry_run {
            return Ok(
                Outcome::pending(name, format!("Network \"{name}\" would get changed."))
                    .with_changes(changes),
            );
        }

        tracing::info!("Updating network {}: {} change(s)", name, changes.len());
        if let Err(e) = self.client.save_updated(&network, conn).await {
            return Ok(failed(name, e));
        }

        Ok(Outcome::success(name, format!("{} changes", changes.len())).with_changes(changes))
    }

    /// Ensure the network does not exist
    pub async fn absent(
        &self,
        name: &str,
        conn: &ConnectionParams,
        dry_run: bool,
    ) -> Result<Outcome> {
        let name = validate_name(name)?;

        if dry_run {
            return Ok(match self.client.fetch(name, conn).await {
                Ok(Some(_)) => {
                    let message = format!("Network \"{name}\" would get deleted.");
                    Outcome::success(name, message.clone()).with_changes(ChangeSet::single(
                        REMOVED_SLOT,
                        Change::Removed { message },
                    ))
                }
                Ok(None) | Err(ClientError::NotFound(_)) => not_found(name),
                Err(e) => failed(name, e),
            });
        }

        tracing::info!("Deleting network {}", name);
        Ok(match self.client.delete(name, conn).await {
            Ok(()) => {
                let message = format!("Network \"{name}\" has been deleted.");
                Outcome::success(name, message.clone())
                    .with_changes(ChangeSet::single(REMOVED_SLOT, Change::Removed { message }))
            }
            Err(ClientError::NotFound(_)) => not_found(name),
            Err(e) => failed(name, e),
        })
    }

    async fn create(
        &self,
        name: &str,
        config: &CanonicalConfig,
        description: &str,
        conn: &ConnectionParams,
        dry_run: bool,
    ) -> Outcome {
        if dry_run {
            let message = format!("Would create the network \"{name}\"");
            return Outcome::pending(name, message.clone())
                .with_changes(ChangeSet::single(CREATED_SLOT, Change::Created { message }));
        }

        tracing::info!("Creating network {}", name);
        if let Err(e) = self.client.create(name, config, description, conn).await {
            return failed(name, e);
        }

        let message = format!("Network \"{name}\" has been created");
        Outcome::success(name, message.clone())
            .with_changes(ChangeSet::single(CREATED_SLOT, Change::Created { message }))
    }
}

/// A name must be usable as a single path segment under `/1.0/networks/`
fn validate_name(name: &str) -> Result<&str> {
    let blank = name.trim().is_empty();
    let dot_segment = name == "." || name == "..";
    let reserved_char = name.contains(['/', '?', '#', '%']);

    if blank || dot_segment || reserved_char {
        return Err(NetworkError::InvalidName(name.to_string()));
    }
    Ok(name)
}

fn not_found(name: &str) -> Outcome {
    Outcome::no_op(name, format!("Network \"{name}\" not found."))
}

fn failed(name: &str, error: ClientError) -> Outcome {
    tracing::warn!("Network {}: {}", name, error);
    Outcome::failure(name, error.to_string())
}
