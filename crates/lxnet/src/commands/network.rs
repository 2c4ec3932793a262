use lxnet_core::{ConfigInput, ConnectionParams, DesiredSpec, Outcome, Reconciler};
use lxnet_lxd::LxdClient;

pub async fn handle_present(
    name: String,
    description: Option<String>,
    config: &[String],
    conn: &ConnectionParams,
    dry_run: bool,
) -> anyhow::Result<Outcome> {
    let pairs = config
        .iter()
        .map(String::as_str)
        .map(parse_config_entry)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let spec = DesiredSpec {
        name,
        description,
        config: (!pairs.is_empty()).then(|| ConfigInput::from_pairs(pairs)),
    };

    let outcome = Reconciler::new(LxdClient::new())
        .present(&spec, conn, dry_run)
        .await?;
    Ok(outcome)
}

pub async fn handle_absent(
    name: &str,
    conn: &ConnectionParams,
    dry_run: bool,
) -> anyhow::Result<Outcome> {
    let outcome = Reconciler::new(LxdClient::new())
        .absent(name, conn, dry_run)
        .await?;
    Ok(outcome)
}

/// `ipv4.address=10.0.3.1/24` -> (`ipv4.address`, `10.0.3.1/24`)
fn parse_config_entry(entry: &str) -> anyhow::Result<(&str, &str)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => anyhow::bail!("invalid config entry '{}': expected KEY=VALUE", entry),
    }
}
