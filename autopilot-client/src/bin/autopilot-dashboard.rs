//! Terminal dashboard: renders once, then again after every realtime change

use anyhow::Context;
use autopilot_client::dashboard::render;
use autopilot_client::{ClientConfig, Dashboard, HttpClient, RealtimeListener, Table};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autopilot_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env().context("loading client configuration")?;
    let http = HttpClient::new(&config).context("building HTTP client")?;

    let shutdown = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel(64);
    let listener = RealtimeListener::new(&http, Table::Reservations, tx, shutdown.clone())
        .context("preparing realtime listener")?
        .spawn();

    let mut dashboard = Dashboard::new(http);
    dashboard.load_all().await;
    print!("{}", render::render(&dashboard, &shared::util::today()));

    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        ctrl_c.cancel();
    });

    dashboard
        .run_realtime(&mut rx, &shutdown, |dashboard| {
            print!("{}", render::render(dashboard, &shared::util::today()));
        })
        .await;

    shutdown.cancel();
    let _ = listener.await;
    tracing::info!("autopilot-dashboard stopped");
    Ok(())
}
