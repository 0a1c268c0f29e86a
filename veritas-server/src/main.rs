use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};
use veritas_core::{VerificationRouter, VeritasConfig};

use veritas_server::server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "veritas.toml")]
    config: String,

    /// Load the classifier, report collaborator status and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // SERPAPI_KEY usually lives in .env during development
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match VeritasConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let default_level = config
        .service
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();

    // Missing classifier artifacts are fatal at startup.
    let verifier = match VerificationRouter::from_config(&config) {
        Ok(v) => Arc::new(v),
        Err(e) => {
            eprintln!("Failed to initialise verifier: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        println!(
            "✅ Classifier loaded: {} ({} features)",
            verifier.classifier().name(),
            verifier.classifier().n_features()
        );
        if verifier.search().is_configured() {
            println!("✅ Evidence search configured: {}", verifier.search().name());
        } else {
            println!(
                "⚠️  Evidence search not configured: set {} for short-claim checks",
                veritas_core::search::API_KEY_ENV
            );
        }
        println!("✅ Veritas health check passed");
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    if config.http.enabled {
        let http_verifier = Arc::clone(&verifier);
        let http_config = config.clone();
        let http_shutdown = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) =
                veritas_server::http::start_http_server(http_verifier, http_config, http_shutdown).await
            {
                tracing::error!("HTTP server error: {}", e);
            }
        });
    }

    let socket_path = config.service.socket_path.clone();
    server::run_unix_server(&socket_path, verifier, tx.subscribe()).await?;

    Ok(())
}
