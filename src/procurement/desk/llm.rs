//! Email drafting through a hosted language model.

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::procurement::desk::config::LlmConfig;
use crate::procurement::desk::error::{Result, ToolError};

/// Prompt in, text out.
pub trait LanguageModel {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    model: String,
    api_version: String,
    max_tokens: u32,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    /// Builds a client, reading the API key from the configured variable.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ToolError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_api_key(config, api_key)
    }

    /// Builds a client with an explicit API key.
    pub fn with_api_key(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
            api_key,
        })
    }
}

impl LanguageModel for AnthropicClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response: MessagesResponse = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        let text = first_text_block(response)?;
        debug!(reply_len = text.len(), "received completion");
        Ok(text)
    }
}

fn first_text_block(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .find_map(|block| block.text)
        .ok_or_else(|| ToolError::LlmResponse("reply contained no text block".to_string()))
}

/// Local stand-in that drafts a plain template without any network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineModel;

impl LanguageModel for OfflineModel {
    fn complete(&self, prompt: &str) -> Result<String> {
        Ok(format!(
            "Subject: Draft for review\n\nHello,\n\nThis draft was prepared offline from the following request:\n\n{}\n\nBest regards,\nProcurement Agent",
            prompt.trim()
        ))
    }
}

/// Picks the hosted client when possible, otherwise the offline drafter.
pub fn build_model(config: &LlmConfig) -> Result<Box<dyn LanguageModel>> {
    if config.offline {
        info!("LLM offline mode enabled");
        return Ok(Box::new(OfflineModel));
    }
    match AnthropicClient::from_config(config) {
        Ok(client) => Ok(Box::new(client)),
        Err(ToolError::MissingApiKey(variable)) => {
            warn!(%variable, "API key not set, drafting emails offline");
            Ok(Box::new(OfflineModel))
        }
        Err(error) => Err(error),
    }
}
