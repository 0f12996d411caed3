//! Adapter for local inference over the native ollama chat API.
//!
//! This family takes its generation parameters through a single nested
//! `options` object, with the token budget named `num_predict`; the key
//! `max_tokens` never appears on this wire. Usage comes back as
//! `prompt_eval_count` / `eval_count` and there is no authentication.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::adapters::{classify_status, send_error};
use crate::{
    GenerationOptions, Message, ModelProvider, ModelRequest, ModelResponse, ProviderError,
    ProviderFuture, ProviderId, Role, TokenUsage,
};

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

pub trait OllamaTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: OllamaApiRequest,
    ) -> ProviderFuture<'a, Result<OllamaApiResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OllamaHttpTransport {
    client: Client,
    base_url: String,
}

impl OllamaHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: OLLAMA_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("request failed with http {status}"));
        classify_status(status, message)
    }
}

impl OllamaTransport for OllamaHttpTransport {
    fn complete<'a>(
        &'a self,
        request: OllamaApiRequest,
    ) -> ProviderFuture<'a, Result<OllamaApiResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint())
                .json(&request)
                .send()
                .await
                .map_err(send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<OllamaApiResponse>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }
}

pub struct OllamaProvider {
    transport: Arc<dyn OllamaTransport>,
}

impl OllamaProvider {
    pub fn new(transport: Arc<dyn OllamaTransport>) -> Self {
        Self { transport }
    }

    pub fn default_http_transport(client: Client) -> OllamaHttpTransport {
        OllamaHttpTransport::new(client)
    }

    fn build_request(&self, request: &ModelRequest) -> OllamaApiRequest {
        OllamaApiRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|message| OllamaApiMessage {
                    role: message.role.as_str().to_string(),
                    content: message.content.clone(),
                })
                .collect(),
            stream: false,
            options: OllamaApiOptions::from_options(&request.options),
        }
    }
}

impl ModelProvider for OllamaProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_request = self.build_request(&request);
            let response = self.transport.complete(api_request).await?;

            let usage = normalize_usage(&response);
            Ok(ModelResponse {
                provider: ProviderId::Ollama,
                model: request.model,
                message: Message::new(Role::Assistant, response.message.content),
                usage,
            })
        })
    }
}

/// One normalization from the eval counters to the shared record. Both
/// counters absent means the runtime reported nothing.
fn normalize_usage(response: &OllamaApiResponse) -> Option<TokenUsage> {
    if response.prompt_eval_count.is_none() && response.eval_count.is_none() {
        return None;
    }

    Some(TokenUsage {
        prompt_tokens: response.prompt_eval_count.unwrap_or(0),
        completion_tokens: response.eval_count.unwrap_or(0),
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<OllamaApiErrorEnvelope>(body).ok()?;
    Some(parsed.error)
}

#[derive(Debug, Deserialize)]
struct OllamaApiErrorEnvelope {
    error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OllamaApiRequest {
    pub model: String,
    pub messages: Vec<OllamaApiMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaApiOptions>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OllamaApiMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OllamaApiOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl OllamaApiOptions {
    /// The local-inference parameter translation: `max_tokens` becomes
    /// `num_predict`, everything rides in the nested options object.
    fn from_options(options: &GenerationOptions) -> Option<Self> {
        if options.is_empty() {
            return None;
        }

        Some(Self {
            num_predict: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct OllamaApiResponse {
    pub message: OllamaApiResponseMessage,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaApiResponseMessage {
    pub content: String,
}
