mod api;
mod error;
mod locator;
mod network;
mod pipeline;
mod tfl;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::locator::DescriptorParser;
use crate::tfl::TflClient;

#[derive(Parser)]
#[command(name = "tube-tracker")]
#[command(about = "Live position estimation for London Underground vehicles")]
struct Args {
    /// Port to run the HTTP server on
    #[arg(short, long, env = "SERVER_PORT", default_value = "8080")]
    port: u16,

    /// Seconds between refresh cycles
    #[arg(short, long, env = "REFRESH_INTERVAL_SECS", default_value = "30")]
    interval: u64,

    /// TfL unified API application key (optional, raises the rate limit)
    #[arg(long, env = "TFL_APP_KEY")]
    app_key: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tube_tracker=info".into()),
        )
        .init();

    let args = Args::parse();

    let client = TflClient::new(args.app_key);
    let parser = DescriptorParser::new();
    let snapshot = Arc::new(RwLock::new(None));

    // First cycle up front so the server rarely answers 503 after startup.
    match pipeline::refresh_cycle(&client, &parser).await {
        Ok(first) => {
            info!(
                positions = first.positions.len(),
                lines = first.network.lines.len(),
                "initial snapshot ready"
            );
            *snapshot.write().await = Some(first);
        }
        Err(e) => {
            error!(error = %e, "initial refresh cycle failed, serving 503 until one succeeds");
        }
    }

    let refresher_snapshot = snapshot.clone();
    let refresher_handle = tokio::spawn(async move {
        pipeline::run_refresher(
            client,
            parser,
            refresher_snapshot,
            Duration::from_secs(args.interval),
        )
        .await;
    });

    let server_snapshot = snapshot.clone();
    let port = args.port;
    let server_handle = tokio::spawn(async move {
        api::server::run_server(server_snapshot, port).await;
    });

    tokio::select! {
        _ = refresher_handle => error!("refresher task exited"),
        _ = server_handle => error!("API server exited"),
    }
}
