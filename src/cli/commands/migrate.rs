use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::migrations::{current_version, latest_version};
use crate::database::{Backend, DatabaseManager};

pub async fn handle(
    config: AppConfig,
    status_only: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    if Backend::from_url(&config.database.url)? == Backend::Memory {
        anyhow::bail!("the in-memory store has no schema to migrate; set DATABASE_URL to a postgres:// URL");
    }

    let manager = DatabaseManager::connect(&config.database).await?;

    if status_only {
        let current = current_version(manager.pool()).await.unwrap_or(0);
        let latest = latest_version();
        output_success(
            output_format,
            &format!("Schema at v{} (latest v{})", current, latest),
            Some(json!({ "current_version": current, "latest_version": latest })),
        )?;
    } else {
        let applied = manager.migrate().await?;
        let current = current_version(manager.pool()).await?;
        output_success(
            output_format,
            &format!("Applied {} migration(s); schema at v{}", applied, current),
            Some(json!({ "applied": applied, "current_version": current })),
        )?;
    }

    manager.close().await;
    Ok(())
}
