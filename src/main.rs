//! Portal Server - Entry Point

use opsportal::{HttpIdentityClient, PortalConfig, PortalServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    info!("Portal server v{}", env!("CARGO_PKG_VERSION"));

    let config = PortalConfig::from_env();
    let identity = Arc::new(HttpIdentityClient::from_config(&config)?);

    let server = PortalServer::new(config, identity);
    server.run().await?;

    Ok(())
}
