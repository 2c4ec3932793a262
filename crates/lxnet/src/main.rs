mod commands;
mod report;

use clap::{Args, Parser, Subcommand};
use lxnet_core::{ConnectionParams, Summary};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lxnet")]
#[command(about = "Declarative LXD network management", version, long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print outcomes as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every network of a declaration file
    Apply {
        /// Declaration file (default: LXNET_CONFIG_PATH, ./lxnet.yaml)
        file: Option<PathBuf>,
        /// Only report what would change (also LXNET_DRY_RUN)
        #[arg(long)]
        dry_run: bool,
    },
    /// Create or update one network
    Present {
        /// Network name
        name: String,
        /// Network description
        #[arg(short, long)]
        description: Option<String>,
        /// Config entry, repeatable
        #[arg(short = 'c', long = "config", value_name = "KEY=VALUE")]
        config: Vec<String>,
        #[command(flatten)]
        connection: ConnectionArgs,
        /// Only report what would change (also LXNET_DRY_RUN)
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete one network
    Absent {
        /// Network name
        name: String,
        #[command(flatten)]
        connection: ConnectionArgs,
        /// Only report what would change (also LXNET_DRY_RUN)
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// LXD endpoint: https://lxd.lan:8443 or a unix socket path (default: local daemon)
    #[arg(long, env = "LXNET_REMOTE")]
    remote_addr: Option<String>,

    /// PEM client certificate
    #[arg(long, env = "LXNET_CERT")]
    cert: Option<PathBuf>,

    /// PEM client key
    #[arg(long, env = "LXNET_KEY")]
    key: Option<PathBuf>,

    /// Do not verify the server certificate (LXD usually runs self-signed)
    #[arg(long)]
    no_verify_cert: bool,
}

impl ConnectionArgs {
    fn to_params(&self) -> ConnectionParams {
        ConnectionParams {
            remote_addr: self.remote_addr.clone(),
            cert: self.cert.as_deref().map(lxnet_config::expand_home),
            key: self.key.as_deref().map(lxnet_config::expand_home),
            verify_cert: !self.no_verify_cert,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let outcomes = match cli.command {
        Commands::Apply { file, dry_run } => {
            let dry_run = lxnet_config::resolve_dry_run(dry_run);
            commands::apply::handle(file.as_deref(), dry_run).await?
        }
        Commands::Present {
            name,
            description,
            config,
            connection,
            dry_run,
        } => {
            let dry_run = lxnet_config::resolve_dry_run(dry_run);
            let outcome = commands::network::handle_present(
                name,
                description,
                &config,
                &connection.to_params(),
                dry_run,
            )
            .await?;
            vec![outcome]
        }
        Commands::Absent {
            name,
            connection,
            dry_run,
        } => {
            let dry_run = lxnet_config::resolve_dry_run(dry_run);
            let outcome =
                commands::network::handle_absent(&name, &connection.to_params(), dry_run).await?;
            vec![outcome]
        }
    };

    if cli.json {
        report::print_json(&outcomes)?;
    } else {
        report::print_text(&outcomes);
    }

    let summary = Summary::of(&outcomes);
    if summary.failed > 0 {
        anyhow::bail!("{} of {} network(s) failed", summary.failed, outcomes.len());
    }

    Ok(())
}
