//! OncoLens Web Server
//!
//! Run with: cargo run -p oncolens-web -- --config oncolens.toml

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use oncolens_common::config::Config;

#[derive(Parser, Debug)]
#[command(name = "oncolens", version, about = "Clinical entity and answer extraction server")]
struct Cli {
    /// Path to the TOML configuration file [default: $ONCOLENS_CONFIG or ./oncolens.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host from the config file
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    // RUST_LOG takes precedence over the config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting OncoLens server");

    let state = oncolens_web::state::AppState::new(&config)?;
    info!(
        "Engine ready: default model {}, threshold {:.2}, max text {} chars",
        state.default_model,
        state.default_threshold,
        state.engine.max_text_length()
    );

    let app = oncolens_web::router::build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
