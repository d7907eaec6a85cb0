use clap::Subcommand;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::{AdminView, NewAdmin};
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create an admin directly in the store")]
    Create {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, help = "Display name")]
        full_name: String,
        #[arg(long, help = "Password (falls back to CRM_ADMIN_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "List admins")]
    List,
}

pub async fn handle(
    cmd: AdminCommands,
    config: AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let store = DatabaseManager::open_store(&config.database).await?;

    match cmd {
        AdminCommands::Create {
            email,
            full_name,
            password,
        } => {
            let password = password
                .or_else(|| std::env::var("CRM_ADMIN_PASSWORD").ok())
                .filter(|p| !p.is_empty())
                .ok_or_else(|| anyhow::anyhow!("--password or CRM_ADMIN_PASSWORD is required"))?;

            if store.find_admin_by_email(&email).await?.is_some() {
                anyhow::bail!("admin with email {} already exists", email);
            }

            let admin = store
                .insert_admin(NewAdmin {
                    email,
                    full_name,
                    password_hash: hash_password(&password),
                })
                .await?;

            output_success(
                output_format,
                &format!("Created admin {} ({})", admin.id, admin.email),
                Some(json!({ "admin": AdminView::from(admin) })),
            )
        }
        AdminCommands::List => {
            let admins: Vec<AdminView> = store
                .list_admins()
                .await?
                .into_iter()
                .map(AdminView::from)
                .collect();

            match output_format {
                OutputFormat::Json => output_value(output_format, &json!({ "admins": admins })),
                OutputFormat::Text => {
                    if admins.is_empty() {
                        println!("No admins yet");
                    }
                    for admin in admins {
                        println!("{:>5}  {:<32} {}", admin.id, admin.email, admin.full_name);
                    }
                    Ok(())
                }
            }
        }
    }
}
