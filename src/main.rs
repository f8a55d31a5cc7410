use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn check_env() {
    // A missing key is not a boot failure: TMDb answers 401 on the first
    // request, which is the behavior callers see.
    if env::var("TMDB_API_KEY").is_err() {
        warn!("TMDB_API_KEY is not set - upstream requests will fail authentication");
    } else {
        info!("TMDB_API_KEY is set");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();
    check_env();
    streamvault::app::run_server().await
}
