//! OpenAI-compatible chat-completions generator.
//!
//! Sends the system/user prompt pair to `POST {api_base}/chat/completions`
//! asking for a JSON object response, and returns every choice's message
//! content as a reply.

use async_trait::async_trait;
use chartflow_pipeline::{GenerationReplies, Generator, Prompt, StageError};
use serde::{Deserialize, Serialize};

use crate::error::{parse_response, ProviderError};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiGenerator {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, mut config: LlmConfig) -> Self {
        config.api_base = config.api_base.trim_end_matches('/').to_string();
        Self { client, config }
    }

    pub async fn complete(&self, prompt: &Prompt) -> Result<GenerationReplies, ProviderError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response: ChatResponse = parse_response(request.send().await?).await?;
        if response.choices.is_empty() {
            return Err(ProviderError::UnexpectedResponse(
                "completion contained no choices".into(),
            ));
        }

        Ok(GenerationReplies {
            replies: response
                .choices
                .into_iter()
                .map(|choice| choice.message.content.unwrap_or_default())
                .collect(),
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<GenerationReplies, StageError> {
        Ok(self.complete(prompt).await?)
    }
}
