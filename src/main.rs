use tracing_subscriber::EnvFilter;

use tasktrack_api::{config, is_development, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, STORAGE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting tasktrack-api in {:?} mode", config.environment);
    if is_development!() {
        tracing::warn!("Running with development defaults");
    }

    server::run(config).await
}
