//! OpenAI-compatible provider: request building and reply normalization.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    Message, ModelProvider, ModelRequest, ModelResponse, ProviderError, ProviderFuture,
    ProviderId, Role, SecretString,
};

use super::serde_api::{build_api_request, normalize_usage};
use super::transport::{OpenAiHttpTransport, OpenAiTransport};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    transport: Arc<dyn OpenAiTransport>,
    api_key: SecretString,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn OpenAiTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(api_key),
        }
    }

    pub fn default_http_transport(client: Client) -> OpenAiHttpTransport {
        OpenAiHttpTransport::new(client)
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_request = build_api_request(&request);
            let response = self.transport.complete(api_request, &self.api_key).await?;

            let choice = response.choices.into_iter().next().ok_or_else(|| {
                ProviderError::transport("response did not include choices")
            })?;

            Ok(ModelResponse {
                provider: ProviderId::OpenAi,
                model: response.model,
                message: Message::new(
                    Role::Assistant,
                    choice.message.content.unwrap_or_default(),
                ),
                usage: normalize_usage(response.usage),
            })
        })
    }
}
