use clap::Parser;
use tracing_subscriber::EnvFilter;

use staydesk_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SUPABASE_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = staydesk_api::config::config().clone();
    tracing::info!("Starting StayDesk API in {:?} mode", config.environment);

    cli::run(Cli::parse(), config).await
}
