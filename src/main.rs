use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use pricepulse_backend::app::create_app;
use pricepulse_backend::config::AppConfig;
use pricepulse_backend::logging::{init_logging, LoggingConfig};
use pricepulse_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env()).map_err(|e| anyhow!(e.to_string()))?;

    let config = AppConfig::from_env().map_err(|e| anyhow!(e))?;
    info!(
        "Keepa: {}, SerpApi: {}, history file: {}",
        if config.keepa_api_key.is_some() { "enabled" } else { "disabled (KEEPA_API_KEY not set)" },
        if config.serpapi_api_key.is_some() { "enabled" } else { "disabled (SERPAPI_API_KEY not set)" },
        config.history_file.display()
    );

    let state = AppState::from_config(&config)?;
    let app = create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("🚀 PricePulse backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
