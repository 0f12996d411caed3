//! Adapter for the Anthropic Messages API.
//!
//! The wire differs from the OpenAI-compatible family in three ways: the
//! system prompt travels in a dedicated `system` field, `max_tokens` is
//! mandatory, and usage is reported as a structured object with
//! `input_tokens` / `output_tokens`.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::adapters::{classify_status, send_error};
use crate::{
    Message, ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderFuture,
    ProviderId, Role, SecretString, TokenUsage,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Applied when the caller sets no token budget; the wire rejects
/// requests without one.
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub trait AnthropicTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: AnthropicApiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<AnthropicApiResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct AnthropicHttpTransport {
    client: Client,
    base_url: String,
}

impl AnthropicHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("request failed with http {status}"));
        classify_status(status, message)
    }
}

impl AnthropicTransport for AnthropicHttpTransport {
    fn complete<'a>(
        &'a self,
        request: AnthropicApiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<AnthropicApiResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint())
                .header("x-api-key", api_key.expose())
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&request)
                .send()
                .await
                .map_err(send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<AnthropicApiResponse>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }
}

pub struct AnthropicProvider {
    transport: Arc<dyn AnthropicTransport>,
    api_key: SecretString,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn AnthropicTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(api_key),
        }
    }

    pub fn default_http_transport(client: Client) -> AnthropicHttpTransport {
        AnthropicHttpTransport::new(client)
    }

    fn build_request(&self, request: &ModelRequest) -> AnthropicApiRequest {
        // System turns move into the dedicated field; the first one wins.
        let system = request
            .messages
            .iter()
            .find(|message| message.role == Role::System)
            .map(|message| message.content.clone());

        let messages = request
            .messages
            .iter()
            .filter(|message| message.role != Role::System)
            .map(|message| AnthropicApiMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            })
            .collect();

        AnthropicApiRequest {
            model: request.model.clone(),
            max_tokens: request.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages,
            system,
            temperature: request.options.temperature,
            top_p: request.options.top_p,
        }
    }
}

impl ModelProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_request = self.build_request(&request);
            let response = self.transport.complete(api_request, &self.api_key).await?;

            let content = response
                .content
                .iter()
                .find(|block| block.kind == "text")
                .and_then(|block| block.text.clone())
                .unwrap_or_default();

            Ok(ModelResponse {
                provider: ProviderId::Anthropic,
                model: response.model,
                message: Message::new(Role::Assistant, content),
                usage: normalize_usage(response.usage),
            })
        })
    }
}

/// One normalization from the structured usage object to the shared
/// record: `input_tokens` becomes the prompt count, `output_tokens` the
/// completion count.
fn normalize_usage(usage: Option<AnthropicApiUsage>) -> Option<TokenUsage> {
    usage.map(|usage| TokenUsage {
        prompt_tokens: usage.input_tokens,
        completion_tokens: usage.output_tokens,
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<AnthropicApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
struct AnthropicApiErrorEnvelope {
    error: AnthropicApiError,
}

#[derive(Debug, Deserialize)]
struct AnthropicApiError {
    message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicApiRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicApiMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AnthropicApiResponse {
    pub model: String,
    pub content: Vec<AnthropicApiContentBlock>,
    pub usage: Option<AnthropicApiUsage>,
}

#[derive(Debug, Deserialize)]
pub struct AnthropicApiContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AnthropicApiUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenerationOptions;

    #[test]
    fn usage_normalization_maps_structured_field_names() {
        let usage = normalize_usage(Some(AnthropicApiUsage {
            input_tokens: 42,
            output_tokens: 7,
        }))
        .expect("usage should be present");

        assert_eq!(usage.prompt_tokens, 42);
        assert_eq!(usage.completion_tokens, 7);
        assert!(normalize_usage(None).is_none());
    }

    #[test]
    fn response_body_parses_text_blocks_and_usage() {
        let body = r#"{
            "model": "claude-sonnet-4",
            "content": [{"type": "text", "text": "hello"}],
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;

        let parsed: AnthropicApiResponse =
            serde_json::from_str(body).expect("response should parse");
        assert_eq!(parsed.content[0].text.as_deref(), Some("hello"));
        assert_eq!(parsed.usage.expect("usage").input_tokens, 12);
    }

    #[test]
    fn request_serialization_requires_max_tokens_and_skips_unset_sampling() {
        let request = AnthropicApiRequest {
            model: "claude-sonnet-4".to_string(),
            max_tokens: 4096,
            messages: vec![AnthropicApiMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            system: Some("be terse".to_string()),
            temperature: None,
            top_p: None,
        };

        let json = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["system"], "be terse");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn system_turns_are_lifted_out_of_the_message_list() {
        let provider = AnthropicProvider::new(
            "sk-ant-test",
            Arc::new(AnthropicHttpTransport::new(Client::new())),
        );
        let request = ModelRequest::new(
            "claude-sonnet-4",
            vec![
                Message::new(Role::System, "be terse"),
                Message::new(Role::User, "hi"),
            ],
        )
        .with_options(GenerationOptions::default().with_max_tokens(256));

        let api_request = provider.build_request(&request);
        assert_eq!(api_request.system.as_deref(), Some("be terse"));
        assert_eq!(api_request.messages.len(), 1);
        assert_eq!(api_request.messages[0].role, "user");
        assert_eq!(api_request.max_tokens, 256);
    }
}
