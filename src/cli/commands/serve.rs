use crate::app;
use crate::config::AppConfig;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    app::serve(config).await
}
