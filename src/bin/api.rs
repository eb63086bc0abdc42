use samtools::{api::start_server, config::Config, sam::SamClient, service::SearchService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!("🚀 SAM Section 889 Compliance Tool - API Server");
    info!("📍 Port: {}", config.port);
    info!("🔗 SAM Entities API: {}", config.sam_api_url);

    let registry = Arc::new(SamClient::new(&config)?);
    let service = Arc::new(SearchService::new(registry));

    info!("✅ Search service initialized");

    start_server(service, config.port).await?;

    Ok(())
}
