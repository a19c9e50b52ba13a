use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

mod api;
mod config;
mod error;
mod extraction;

use crate::config::StaticConfig;
use crate::extraction::{ExtractionService, FsImageSink};

// Re-export config crate types to avoid namespace collision
use ::config::{Config as ConfigBuilder, Environment, File};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!(
        "Starting pdfpluck service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let static_config: StaticConfig = ConfigBuilder::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("PDFPLUCK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    info!(
        host = %static_config.server.host,
        port = static_config.server.port,
        "Static configuration loaded"
    );

    // Directory lifecycle belongs to the composition root, not the pipeline.
    std::fs::create_dir_all(&static_config.storage.upload_dir)?;
    std::fs::create_dir_all(&static_config.storage.extracted_dir)?;
    info!(
        upload_dir = %static_config.storage.upload_dir.display(),
        extracted_dir = %static_config.storage.extracted_dir.display(),
        "Storage directories ready"
    );

    let config = Arc::new(static_config);
    let sink = FsImageSink::new(config.storage.extracted_dir.clone());
    let service = Arc::new(ExtractionService::new(sink));

    let app = api::router(service, config.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdfpluck_service=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
