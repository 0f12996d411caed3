//! OpenAI HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::{ModelRequest, TokenUsage};

pub(crate) fn build_api_request(request: &ModelRequest) -> OpenAiApiRequest {
    OpenAiApiRequest {
        model: request.model.clone(),
        messages: request
            .messages
            .iter()
            .map(|message| OpenAiApiMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            })
            .collect(),
        temperature: request.options.temperature,
        top_p: request.options.top_p,
        max_tokens: request.options.max_tokens,
    }
}

/// One normalization from the wire usage mapping to the shared record.
pub(crate) fn normalize_usage(usage: Option<OpenAiApiUsage>) -> Option<TokenUsage> {
    usage.map(|usage| TokenUsage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
    })
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<OpenAiApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiErrorEnvelope {
    pub error: OpenAiApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiError {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenAiApiRequest {
    pub model: String,
    pub messages: Vec<OpenAiApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenAiApiMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiApiResponse {
    pub model: String,
    pub choices: Vec<OpenAiApiChoice>,
    pub usage: Option<OpenAiApiUsage>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiApiChoice {
    pub message: OpenAiApiAssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiApiAssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OpenAiApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}
