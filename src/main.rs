//! PDF Extraction Server - Entry point

use anyhow::Context;
use pdf_extract_server::{run_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_extract_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting PDF Extraction Server");

    // A missing Gemini key stops the process here, before any request
    let config = ServerConfig::from_env().context("Failed to load configuration")?;

    run_server(config).await
}
