use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::llm::prompts::{
    build_correction_prompt, build_lemma_prompt, lemma_tool_schema, CORRECTION_SYSTEM_PROMPT,
    LEMMA_SYSTEM_PROMPT, LEMMA_TOOL_NAME,
};
use crate::llm::service::{Lemmatizer, TextCorrector};
use crate::models::LemmaSubmission;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (SEGALIGN_MODEL env var overrides the default)
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;
        let model = std::env::var("SEGALIGN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, model))
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.0,
            max_tokens: 8192,
        }
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send a message to Claude and get the text of the reply
    pub async fn send_message(&self, system: &str, user: &str) -> ServiceResult<String> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message::user(user)],
            tools: Vec::new(),
            tool_choice: None,
        };

        let response = self.post(&request).await?;

        response
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| ServiceError::MalformedResponse("No text content in response".into()))
    }

    /// Send a message that must be answered by calling `tool`
    async fn send_with_tool(
        &self,
        system: &str,
        user: &str,
        tool: Tool,
    ) -> ServiceResult<serde_json::Value> {
        let tool_name = tool.name.clone();
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message::user(user)],
            tool_choice: Some(ToolChoice {
                choice_type: "tool".to_string(),
                name: tool_name.clone(),
            }),
            tools: vec![tool],
        };

        let response = self.post(&request).await?;

        response
            .content
            .into_iter()
            .find(|c| c.content_type == "tool_use" && c.name.as_deref() == Some(tool_name.as_str()))
            .and_then(|c| c.input)
            .ok_or_else(|| ServiceError::MalformedResponse("No tool_use response found".into()))
    }

    async fn post(&self, request: &AnthropicRequest) -> ServiceResult<AnthropicResponse> {
        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl TextCorrector for AnthropicClient {
    async fn correct(&self, text: &str, language: &str) -> ServiceResult<String> {
        let reply = self
            .send_message(CORRECTION_SYSTEM_PROMPT, &build_correction_prompt(text, language))
            .await?;
        Ok(reply.trim().to_string())
    }
}

#[async_trait]
impl Lemmatizer for AnthropicClient {
    async fn lemmatize(
        &self,
        words: &[String],
        language: &str,
    ) -> ServiceResult<HashMap<String, String>> {
        let tool = Tool {
            name: LEMMA_TOOL_NAME.to_string(),
            description: "Submit the lemma of every requested word".to_string(),
            input_schema: lemma_tool_schema(),
        };

        let input = self
            .send_with_tool(LEMMA_SYSTEM_PROMPT, &build_lemma_prompt(words, language), tool)
            .await?;

        let submission: LemmaSubmission = serde_json::from_value(input)
            .map_err(|e| ServiceError::MalformedResponse(format!("Invalid lemma submission: {}", e)))?;

        Ok(submission.into_map())
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}
