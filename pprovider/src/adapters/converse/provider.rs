//! Converse provider: request building and reply normalization.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    GenerationOptions, Message, ModelProvider, ModelRequest, ModelResponse, ProviderError,
    ProviderFuture, ProviderId, Role, SecretString,
};

use super::serde_api::{ConverseApiMessage, ConverseApiPayload, ConverseApiRequest};
use super::transport::{ConverseHttpTransport, ConverseTransport};

pub const CONVERSE_BASE_URL: &str = "https://api.boisestate.ai/chat/api-converse";

/// Wire protocol revision. V1 gateways accept only the latest user turn;
/// V2 gateways accept the full message array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConverseProtocol {
    #[default]
    V1,
    V2,
}

pub struct ConverseProvider {
    transport: Arc<dyn ConverseTransport>,
    api_key: SecretString,
    protocol: ConverseProtocol,
    default_options: GenerationOptions,
}

impl ConverseProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn ConverseTransport>) -> Self {
        Self {
            transport,
            api_key: SecretString::new(api_key),
            protocol: ConverseProtocol::default(),
            // The gateway expects a temperature and a token budget on
            // every call; these fill in when the caller sets neither.
            default_options: GenerationOptions::default()
                .with_temperature(0.7)
                .with_max_tokens(1000),
        }
    }

    pub fn with_protocol(mut self, protocol: ConverseProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_default_options(mut self, default_options: GenerationOptions) -> Self {
        self.default_options = default_options;
        self
    }

    pub fn default_http_transport(client: Client) -> ConverseHttpTransport {
        ConverseHttpTransport::new(client)
    }

    fn build_request(&self, request: &ModelRequest) -> ConverseApiRequest {
        let message = match self.protocol {
            ConverseProtocol::V1 => ConverseApiPayload::Text(
                request
                    .messages
                    .iter()
                    .rev()
                    .find(|message| message.role == Role::User)
                    .map(|message| message.content.clone())
                    .unwrap_or_default(),
            ),
            ConverseProtocol::V2 => ConverseApiPayload::Messages(
                request
                    .messages
                    .iter()
                    .map(|message| ConverseApiMessage {
                        role: message.role.as_str().to_string(),
                        content: message.content.clone(),
                    })
                    .collect(),
            ),
        };

        let options = request.options.or_defaults(&self.default_options);

        ConverseApiRequest {
            message,
            model_id: request.model.clone(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
        }
    }
}

impl ModelProvider for ConverseProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Converse
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let converse_request = self.build_request(&request);
            let reply = self
                .transport
                .exchange(converse_request, &self.api_key)
                .await?;

            Ok(ModelResponse {
                provider: ProviderId::Converse,
                model: request.model,
                message: Message::new(Role::Assistant, reply.into_content()),
                // This backend never reports token usage.
                usage: None,
            })
        })
    }
}
