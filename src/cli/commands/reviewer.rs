use clap::Subcommand;

use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::services::ReviewerGenerator;

#[derive(Subcommand)]
pub enum ReviewerCommands {
    #[command(about = "Generate a structured reviewer profile via the chat service")]
    Describe {
        #[arg(help = "Reviewer name")]
        name: String,
        #[arg(help = "Short description of what the reviewer assesses")]
        description: String,
    },
}

pub async fn handle(
    cmd: ReviewerCommands,
    config: AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ReviewerCommands::Describe { name, description } => {
            let generator = ReviewerGenerator::from_config(&config.gigachat);
            let reviewer = generator.generate(&name, &description).await?;

            match output_format {
                OutputFormat::Json => output_value(output_format, &serde_json::to_value(&reviewer)?),
                OutputFormat::Text => {
                    println!("{}", reviewer.name);
                    println!("{}", reviewer.summary);
                    for item in &reviewer.what_is_evaluated {
                        println!("  - {}", item);
                    }
                    for metric in &reviewer.metrics {
                        println!(
                            "  [{:>2}] {} ({}): {}",
                            metric.value, metric.display_name, metric.json_name, metric.description
                        );
                    }
                    Ok(())
                }
            }
        }
    }
}
