// services/reviewer.rs - turns a short reviewer description into a structured profile
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::gigachat::{ChatClient, GigaChatClient, UpstreamError};
use crate::config::GigaChatConfig;
use crate::database::models::ReviewerMetric;

/// Reviewer profile as returned by the chat service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StructuredReviewer {
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub what_is_evaluated: Vec<String>,
    #[validate(length(min = 4, message = "at least 4 metrics are required"))]
    #[validate(nested)]
    pub metrics: Vec<ReviewerMetric>,
}

const PROMPT_TEMPLATE: &str = r#"Build a structured description of an employee reviewer from its short description.
Reply with strict JSON only: no markdown, no comments, no explanations.
Use exactly this structure:
{
  "name": string,
  "summary": string,
  "what_is_evaluated": [string],
  "metrics": [
    {
      "value": integer from 1 to 10, higher means higher priority,
      "json_name": string in snake_case,
      "display_name": string,
      "description": string
    }
  ]
}
Provide at least 4 metrics."#;

pub fn build_prompt(name: &str, description: &str) -> String {
    format!(
        "{}\nReviewer name: {}\nShort reviewer description: {}",
        PROMPT_TEMPLATE,
        name.trim(),
        description.trim()
    )
}

/// Content of the first fenced code block, or the whole trimmed text.
///
/// Text right after the opening ticks counts as an info string (```` ```json ````)
/// only when it is a bare token followed by whitespace or the JSON itself.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_ticks = &trimmed[start + 3..];
    let tag_len = after_ticks
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')))
        .unwrap_or(after_ticks.len());
    let rest = &after_ticks[tag_len..];
    let body = if rest.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[') {
        rest
    } else {
        after_ticks
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// The reply as-is when it is already JSON, otherwise its fenced block
fn reply_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    if !trimmed.starts_with("```")
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return trimmed;
    }
    strip_code_fence(trimmed)
}

pub fn parse_reply(reply: &str) -> Result<StructuredReviewer, UpstreamError> {
    let json = reply_json(reply);
    if json.is_empty() {
        return Err(UpstreamError::Format(
            "chat service returned an empty reply".to_string(),
        ));
    }

    let reviewer: StructuredReviewer = serde_json::from_str(json)
        .map_err(|e| UpstreamError::Format(format!("reply is not valid reviewer JSON: {}", e)))?;

    reviewer
        .validate()
        .map_err(|e| UpstreamError::Format(format!("reply violates reviewer schema: {}", e)))?;

    Ok(reviewer)
}

pub struct ReviewerGenerator {
    client: Result<Arc<dyn ChatClient>, String>,
}

impl ReviewerGenerator {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client: Ok(client) }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            client: Err(reason.into()),
        }
    }

    pub fn from_config(config: &GigaChatConfig) -> Self {
        match GigaChatClient::from_config(config) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(err) => {
                if config.is_configured() {
                    tracing::warn!("Reviewer generation disabled: {}", err);
                } else {
                    tracing::info!("GIGACHAT_BASE_URL not set; reviewer generation disabled");
                }
                Self::unavailable(err.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_ok()
    }

    pub async fn generate(
        &self,
        name: &str,
        description: &str,
    ) -> Result<StructuredReviewer, UpstreamError> {
        let client = self
            .client
            .as_ref()
            .map_err(|reason| UpstreamError::NotConfigured(reason.clone()))?;

        let completion = client.chat(&build_prompt(name, description)).await?;
        let reply = completion.first_content().ok_or_else(|| {
            UpstreamError::Format("chat service returned no choices".to_string())
        })?;

        parse_reply(reply)
    }
}
