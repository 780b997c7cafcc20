//! HTTP entry point for the relgraph entity API.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use relgraph_api::{build_router, AppState};
use relgraph_core::AppConfig;
use relgraph_graph::{GraphClient, GraphConfig};

#[derive(Parser)]
#[command(name = "relgraph-api")]
#[command(about = "REST facade over the relgraph entity graph")]
struct Cli {
    /// Config file prefix (default: relgraph).
    #[arg(short, long, default_value = "relgraph")]
    config: String,

    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let app_config = AppConfig::load(&cli.config)?;
    tracing::debug!(config = ?app_config, "Loaded configuration");

    // Connect to Neo4j; an unreachable engine aborts start-up.
    let graph_config = GraphConfig::from(&app_config.neo4j);
    let graph = GraphClient::connect(&graph_config).await?;

    let state = AppState::new(
        Arc::new(graph),
        app_config.server.api_token.clone(),
        app_config.server.allowed_labels.clone(),
    );
    let app = build_router(state, &app_config.server.cors_origins);

    let bind = cli.bind.unwrap_or(app_config.server.bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(addr = %bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router, and with it the last GraphClient handle, is gone here.
    tracing::info!("Server stopped, Neo4j connections released");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
