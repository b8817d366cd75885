use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ChatCompletionResponse, ChatMessage, PromptPayload};

/// Outbound chat-completion boundary.
///
/// The analyzer only ever talks to this trait, so tests can swap in a fake.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, payload: &PromptPayload) -> Result<ChatCompletionResponse, AppError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

/// OpenAI-compatible endpoint reached over HTTP with bearer auth.
pub struct HttpLlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpLlmClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.llm_api_url.clone(),
            config.llm_api_key.clone(),
            config.request_timeout(),
        )
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, payload: &PromptPayload) -> Result<ChatCompletionResponse, AppError> {
        let request = ChatCompletionRequest {
            model: &payload.model,
            temperature: payload.temperature,
            max_tokens: payload.max_tokens,
            messages: payload.messages(),
        };

        tracing::debug!("POST {} with model {}", self.api_url, payload.model);
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("LLM endpoint returned {}: {}", status, body);
            return Err(AppError::Upstream(upstream_message(status, &body)));
        }

        response.json::<ChatCompletionResponse>().await.map_err(|e| {
            tracing::error!("Failed to decode LLM response: {}", e);
            AppError::Upstream(format!("AI模型返回数据格式异常: {}", e))
        })
    }
}

/// Prefers the provider's own `error.message`, falling back to status and body.
fn upstream_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("AI模型请求失败 ({}): {}", status, body.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn upstream_message_prefers_provider_detail() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        assert_eq!(
            upstream_message(StatusCode::TOO_MANY_REQUESTS, body),
            "Rate limit reached"
        );
    }

    #[test]
    fn upstream_message_falls_back_to_status_and_body() {
        let message = upstream_message(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert!(message.contains("502"));
        assert!(message.ends_with("upstream down"));
    }

    #[test]
    fn request_body_shape() {
        let payload = PromptPayload {
            system_prompt: "sys".to_string(),
            user_prompt: "usr".to_string(),
            model: "grok-2-1212".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        };
        let request = ChatCompletionRequest {
            model: &payload.model,
            temperature: payload.temperature,
            max_tokens: payload.max_tokens,
            messages: payload.messages(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "grok-2-1212");
        assert_eq!(value["max_tokens"], 4000);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
    }
}
