//! OpenAI chat completions provider.
//!
//! Asks for structured output shaped as `{"messages": ["...", ...]}` so a long
//! answer arrives pre-split into chat-sized parts.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::outbound::{Answer, CompletionError, CompletionProvider, build_prompt};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// The structured reply requested through `response_format`.
#[derive(Deserialize, Debug)]
struct MessageResponse {
    messages: Vec<String>,
}

fn message_response_format() -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": "message_response",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "messages": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                },
                "required": ["messages"],
                "additionalProperties": false
            }
        }
    })
}

/// Turns reply content into an answer. Content that is not the requested
/// JSON shape is kept whole as a single part.
fn parse_answer(content: &str) -> Result<Answer, CompletionError> {
    let answer = match serde_json::from_str::<MessageResponse>(content) {
        Ok(structured) => Answer::new(structured.messages),
        Err(e) => {
            warn!("Reply is not structured output ({}), using raw text", e);
            Answer::new(vec![content.to_string()])
        }
    };
    if answer.is_empty() {
        return Err(CompletionError::Parse("model returned an empty answer".to_string()));
    }
    Ok(answer)
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    prompt_template: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a provider with the default model, temperature and template.
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            prompt_template: crate::outbound::DEFAULT_PROMPT_TEMPLATE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: String, temperature: f32) -> Self {
        self.model = model;
        self.temperature = temperature;
        self
    }

    pub fn with_prompt_template(mut self, template: String) -> Self {
        self.prompt_template = template;
        self
    }

    fn build_request(&self, question: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(&self.prompt_template, question),
            }],
            temperature: self.temperature,
            response_format: message_response_format(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn ask(&self, question: &str) -> Result<Answer, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::Config("API key is not set".to_string()));
        }

        let request = self.build_request(question);
        info!(
            "OpenAI request: model={}, question_len={}",
            request.model,
            question.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        debug!("OpenAI response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("OpenAI API error: {} - {}", status, err_body);
            return Err(CompletionError::Api {
                status,
                message: err_body,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Parse("no choices in response".to_string()))?;

        let answer = parse_answer(&content)?;
        info!("OpenAI answer received: {} part(s)", answer.parts.len());
        Ok(answer)
    }
}
