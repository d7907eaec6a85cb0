use clap::Subcommand;
use serde_json::json;

use crate::auth::issue_token;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token for an existing admin without a password")]
    Issue {
        #[arg(long, help = "Admin email")]
        email: String,
    },
}

pub async fn handle(
    cmd: TokenCommands,
    config: AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { email } => {
            config.validate()?;
            let store = DatabaseManager::open_store(&config.database).await?;
            let admin = store
                .find_admin_by_email(&email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("no admin with email {}", email))?;

            let issued = issue_token(&config.security, admin.id, &admin.email)?;
            output_value(
                output_format,
                &json!({
                    "admin_id": admin.id,
                    "access_token": issued.access_token,
                    "token_type": issued.token_type,
                    "expires_in": issued.expires_in,
                }),
            )
        }
    }
}
