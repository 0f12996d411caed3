//! Provider and service construction from static settings.

use std::sync::Arc;

use pchat::ChatService;
use pprovider::adapters::anthropic::AnthropicProvider;
use pprovider::adapters::converse::ConverseProvider;
use pprovider::adapters::ollama::OllamaProvider;
use pprovider::adapters::openai::OpenAiProvider;
use pprovider::{ModelProvider, ProviderError, ProviderId};
use reqwest::Client;

use crate::ProviderSettings;

/// Construction-time family selection: one concrete adapter per tag,
/// all sharing one HTTP client that carries the configured timeout.
pub fn build_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let http = Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    match settings.provider_id {
        ProviderId::Converse => {
            let api_key = require_api_key(settings)?;
            let mut transport = ConverseProvider::default_http_transport(http);
            if let Some(base_url) = &settings.base_url {
                transport = transport.with_base_url(base_url.clone());
            }
            Ok(Arc::new(ConverseProvider::new(api_key, Arc::new(transport))))
        }
        ProviderId::OpenAi => {
            let api_key = require_api_key(settings)?;
            let mut transport = OpenAiProvider::default_http_transport(http);
            if let Some(base_url) = &settings.base_url {
                transport = transport.with_base_url(base_url.clone());
            }
            Ok(Arc::new(OpenAiProvider::new(api_key, Arc::new(transport))))
        }
        ProviderId::Anthropic => {
            let api_key = require_api_key(settings)?;
            let mut transport = AnthropicProvider::default_http_transport(http);
            if let Some(base_url) = &settings.base_url {
                transport = transport.with_base_url(base_url.clone());
            }
            Ok(Arc::new(AnthropicProvider::new(api_key, Arc::new(transport))))
        }
        ProviderId::Ollama => {
            let mut transport = OllamaProvider::default_http_transport(http);
            if let Some(base_url) = &settings.base_url {
                transport = transport.with_base_url(base_url.clone());
            }
            Ok(Arc::new(OllamaProvider::new(Arc::new(transport))))
        }
    }
}

pub fn build_chat_service(settings: &ProviderSettings) -> Result<ChatService, ProviderError> {
    let provider = build_provider(settings)?;
    Ok(ChatService::new(provider, settings.model.clone()))
}

/// Settings and service in one step, for binaries that configure
/// themselves entirely from the environment.
pub fn chat_service_from_env() -> Result<ChatService, ProviderError> {
    build_chat_service(&ProviderSettings::from_env()?)
}

fn require_api_key(settings: &ProviderSettings) -> Result<&str, ProviderError> {
    settings
        .api_key
        .as_deref()
        .ok_or_else(|| ProviderError::configuration("API_KEY is not set"))
}
