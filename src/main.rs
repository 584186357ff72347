use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gerrit_recheck::cli::Cli;
use gerrit_recheck::credentials::CredentialSource;
use gerrit_recheck::gerrit::GerritClient;
use gerrit_recheck::worker::{EffectExecutor, PollConfig, PollScheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gerrit_recheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let poll = PollConfig::from_env()?;
    let config = cli.recheck_config(poll);

    let source = CredentialSource::from_env(cli.password_file.clone());
    let username = cli.username.clone();
    let credentials = tokio::task::spawn_blocking(move || source.resolve(&username))
        .await
        .context("credential prompt panicked")?
        .context("failed to read password")?;

    let client = GerritClient::new(&cli.gerrit_config(), credentials)
        .context("failed to create Gerrit client")?;
    info!(url = %client.base_url(), dry_run = config.dry_run, "Starting");

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, shutting down");
            shutdown.cancel();
        }
    });

    let scheduler = PollScheduler::new(EffectExecutor::new(client, cancel), config);
    let summary = scheduler
        .run(&cli.changes)
        .await
        .context("failed to resolve changes")?;

    info!(
        passes = summary.passes,
        rechecks_posted = summary.rechecks_posted,
        tracked = summary.tracked.len(),
        "Done"
    );
    Ok(())
}
