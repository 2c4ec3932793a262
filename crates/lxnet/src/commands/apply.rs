use anyhow::Context;
use colored::Colorize;
use lxnet_config::{Declarations, Ensure};
use lxnet_core::{Outcome, Reconciler, normalize};
use lxnet_lxd::LxdClient;
use std::path::Path;

pub async fn handle(file: Option<&Path>, dry_run: bool) -> anyhow::Result<Vec<Outcome>> {
    let path = lxnet_config::find_declaration_file(file)?;
    let declarations = Declarations::load(&path)?;

    // Reject malformed config for every network before touching any daemon
    for network in &declarations.networks {
        if network.ensure == Ensure::Present {
            normalize(network.config.as_ref())
                .with_context(|| format!("network \"{}\"", network.name))?;
        }
    }

    let mode = if dry_run { " (dry-run)" } else { "" };
    eprintln!(
        "{}",
        format!(
            "Applying {} network(s) from {}{}",
            declarations.networks.len(),
            path.display(),
            mode
        )
        .dimmed()
    );

    let reconciler = Reconciler::new(LxdClient::new());
    let mut outcomes = Vec::with_capacity(declarations.networks.len());

    for network in &declarations.networks {
        let conn = network.connection();
        let outcome = match network.ensure {
            Ensure::Present => reconciler.present(&network.spec(), &conn, dry_run).await,
            Ensure::Absent => reconciler.absent(&network.name, &conn, dry_run).await,
        }
        .with_context(|| format!("network \"{}\"", network.name))?;

        tracing::debug!("{}: {}", network.name, outcome.status());
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
