use daily_crm::app::{init_tracing, serve};
use daily_crm::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    init_tracing(&config);
    config.validate()?;

    serve(config).await
}
