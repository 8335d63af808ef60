use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tripwise::{AppConfig, GeminiClient, web};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tripwise={}", config.logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Config (and the API key inside it) is read and validated exactly once,
    // before anything else starts
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);
    tracing::info!("Tripwise v{} starting", tripwise::VERSION);

    let client = GeminiClient::new(&config).context("Failed to create Gemini client")?;

    web::run(config.server.port, Arc::new(client)).await
}
