//! Client for a GigaChat-compatible chat-completion API

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::config::GigaChatConfig;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Message is shown to API clients as-is
    #[error("{0}")]
    NotConfigured(String),

    #[error("chat service unreachable: {0}")]
    Transport(String),

    #[error("chat service returned status {status}")]
    Status { status: u16, body: String },

    #[error("unexpected chat service reply: {0}")]
    Format(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Transport(format!("request timed out: {}", err))
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletion {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct OAuthToken {
    access_token: Option<String>,
}

/// Single-turn chat completion
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<ChatCompletion, UpstreamError>;
}

/// Talks to `{base_url}/chat/completions`, obtaining a token per call
pub struct GigaChatClient {
    http: Client,
    base_url: Url,
    oauth_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    scope: String,
    model: String,
    access_token: Option<String>,
}

impl GigaChatClient {
    pub fn from_config(config: &GigaChatConfig) -> Result<Self, UpstreamError> {
        let base = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                UpstreamError::NotConfigured(
                    "Reviewer generation is unavailable: GIGACHAT_BASE_URL is not set".to_string(),
                )
            })?;

        let base_url = Url::parse(base).map_err(|e| {
            UpstreamError::NotConfigured(format!(
                "Reviewer generation is unavailable: GIGACHAT_BASE_URL is invalid ({})",
                e
            ))
        })?;

        let http = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            http,
            base_url,
            oauth_url: config.oauth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
            model: config.model.clone(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Static token if configured, otherwise an OAuth client-credentials grant
    async fn access_token(&self) -> Result<String, UpstreamError> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }

        let oauth_url = self.oauth_url.as_deref().ok_or_else(|| {
            UpstreamError::NotConfigured(
                "Reviewer generation is unavailable: GIGACHAT_OAUTH_URL is required when no access token is set"
                    .to_string(),
            )
        })?;
        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret) else {
            return Err(UpstreamError::NotConfigured(
                "Reviewer generation is unavailable: GIGACHAT_CLIENT_ID and GIGACHAT_CLIENT_SECRET are required"
                    .to_string(),
            ));
        };

        let basic = STANDARD.encode(format!("{}:{}", client_id, client_secret));
        let response = self
            .http
            .post(oauth_url)
            .header("Authorization", format!("Basic {}", basic))
            .header("RqUID", Uuid::new_v4().to_string())
            .header(ACCEPT, "application/json")
            .form(&[
                ("scope", self.scope.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let token: OAuthToken = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Format(format!("OAuth reply is not JSON: {}", e)))?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| UpstreamError::Format("OAuth reply carries no access_token".to_string()))
    }
}

#[async_trait]
impl ChatClient for GigaChatClient {
    async fn chat(&self, prompt: &str) -> Result<ChatCompletion, UpstreamError> {
        let token = self.access_token().await?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let started = std::time::Instant::now();
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chat completion finished"
        );

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Format(format!("chat completion is not valid JSON: {}", e)))
    }
}
