use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use log::{debug, error};

use crate::config::CompletionConfig;
use crate::llm_provider::{ChatMessage, LLMProvider};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token accounting, logged only. Services differ in which counters they send.
#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
    #[serde(default)]
    total_tokens: usize,
}

/// Provider for any service exposing the OpenAI `chat/completions` endpoint
/// (Groq, OpenAI, OpenRouter).
#[derive(Debug, Clone)]
pub struct ChatCompletionsProvider {
    name: String,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    client: Client,
}

impl ChatCompletionsProvider {
    /// Build the provider described by `config`, reading the credential from
    /// the environment. A missing key is a startup error.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        Self::from_config_with_key(config, env::var(config.provider.api_key_var()).ok())
    }

    /// Same as [`from_config`](Self::from_config) with the credential already
    /// looked up.
    pub fn from_config_with_key(
        config: &CompletionConfig,
        api_key: Option<String>,
    ) -> Result<Self> {
        let key_var = config.provider.api_key_var();
        let api_key =
            api_key.with_context(|| format!("{} environment variable not set", key_var))?;
        if api_key.trim().is_empty() {
            bail!("{} environment variable is empty", key_var);
        }

        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            name: config.provider.name().to_string(),
            api_key,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| config.provider.default_base_url().to_string()),
            temperature: config.temperature,
            client,
        })
    }

    /// Create a provider with explicit settings, bypassing the environment.
    pub fn with_config(api_key: String, model: String, base_url: String) -> Self {
        Self {
            name: "custom".to_string(),
            api_key,
            model,
            base_url,
            temperature: None,
            client: Client::new(),
        }
    }

    /// Apply a request timeout to the underlying HTTP client
    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn parse_response(&self, body: &str) -> Result<String> {
        let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            error!("Failed to parse {} response: {}", self.name, e);
            debug!("Raw response was: {}", body);
            anyhow!("Failed to parse {} response: {}", self.name, e)
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "{} usage: {} prompt + {} completion = {} tokens",
                self.name, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("No content in {} response", self.name))
    }
}

#[async_trait]
impl LLMProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.name))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response body", self.name))?;
        if !status.is_success() {
            return Err(anyhow!("{} API error ({}): {}", self.name, status, body));
        }
        debug!("Raw {} response: {}", self.name, body);

        self.parse_response(&body)
    }
}
