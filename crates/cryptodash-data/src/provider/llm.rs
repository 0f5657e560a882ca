//! OpenRouter chat completion 클라이언트.

use async_trait::async_trait;
use cryptodash_core::ProvidersConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ensure_success, http_client, DEFAULT_USER_AGENT};
use crate::error::{DataError, Result};

/// LLM 제공자 인터페이스.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// 단일 사용자 프롬프트에 대한 첫 번째 응답 텍스트를 반환합니다.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenRouter API 클라이언트.
pub struct OpenRouterClient {
    client: reqwest::Client,
    url: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    referer: String,
    title: String,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenRouterClient {
    pub fn new(url: impl Into<String>, api_key: SecretString, timeout: Duration) -> Result<Self> {
        let defaults = ProvidersConfig::default();
        Ok(Self {
            client: http_client(DEFAULT_USER_AGENT, timeout)?,
            url: url.into(),
            api_key,
            model: defaults.llm_model,
            max_tokens: defaults.llm_max_tokens,
            referer: defaults.llm_referer,
            title: defaults.llm_title,
        })
    }

    /// 설정에서 클라이언트를 생성합니다. API 키가 없으면 `None`.
    pub fn from_config(config: &ProvidersConfig) -> Result<Option<Self>> {
        let Some(key) = config.llm_api_key() else {
            return Ok(None);
        };

        let mut client = Self::new(
            config.llm_url.clone(),
            SecretString::new(key.into()),
            config.default_timeout(),
        )?;
        client.model = config.llm_model.clone();
        client.max_tokens = config.llm_max_tokens;
        client.referer = config.llm_referer.clone();
        client.title = config.llm_title.clone();
        Ok(Some(client))
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, "LLM 요청");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await?;

        let body = ensure_success("openrouter", response)?.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| DataError::InvalidData("chat completion has no content".to_string()))
    }
}
