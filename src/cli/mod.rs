pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::init_tracing;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "Daily CRM - server and administration commands")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve,

    #[command(about = "Apply pending PostgreSQL migrations")]
    Migrate {
        #[arg(long, help = "Only report the current schema version")]
        status: bool,
    },

    #[command(about = "Admin account management")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Access token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Reviewer profile generation")]
    Reviewer {
        #[command(subcommand)]
        cmd: commands::reviewer::ReviewerCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env()?;
    init_tracing(&config);

    match cli.command {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::Migrate { status } => commands::migrate::handle(config, status, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, config, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, config, output_format).await,
        Commands::Reviewer { cmd } => commands::reviewer::handle(cmd, config, output_format).await,
    }
}
