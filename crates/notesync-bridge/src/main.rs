//! notesync bridge.
//!
//! This binary:
//! - Receives UI requests on POST /ipc
//! - Routes them to the cloud bucket and the local note store
//! - Streams replies, dialogs, window and menu descriptions on GET /events

use std::sync::Arc;

use clap::Parser;
use notesync_bridge::{app, AppContext, AppState, BroadcastUi, Config, RequestRouter};
use notesync_cloud::S3Connector;
use notesync_local::{JsonSettings, SqliteStore};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Outbound messages buffered per UI subscriber before it starts lagging.
const EVENT_BUFFER: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    let settings_path = config
        .settings_path()
        .ok_or_else(|| anyhow::anyhow!("no config directory; pass --settings-file"))?;
    let windows = config.windows();

    info!("Starting notesync-bridge v{}", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);
    info!("  Settings: {}", settings_path.display());
    info!("  Main window: {}", windows.main().url);
    if let Some(endpoint) = &config.cloud_endpoint {
        info!("  Cloud endpoint override: {}", endpoint);
    }

    let ui = Arc::new(BroadcastUi::new(EVENT_BUFFER));
    let ctx = AppContext::new(
        Arc::new(JsonSettings::new(settings_path)),
        Arc::new(S3Connector::new(config.cloud_endpoint.clone())),
        Arc::new(SqliteStore::new()),
        ui.clone(),
        windows,
    );
    let state = AppState {
        router: RequestRouter::new(Arc::new(ctx)),
        ui,
    };

    // Bind and serve
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM. In-flight request tasks are not
/// awaited.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = signal::ctrl_c() => {
                result.expect("Failed to install Ctrl+C handler");
                info!("Ctrl+C received, stopping bridge");
            }
            _ = sigterm.recv() => info!("SIGTERM received, stopping bridge"),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Ctrl+C received, stopping bridge");
    }
}
