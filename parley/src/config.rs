//! Startup configuration resolved from the process environment.
//!
//! Required values: `MODEL_PROVIDER` (backend family tag) and
//! `MODEL_CHAT` (model id). `API_KEY` is required for every family
//! except local inference. `PROVIDER_URL` overrides the family's
//! default base URL and `REQUEST_TIMEOUT_SECS` the outbound deadline.

use std::fmt;
use std::time::Duration;

use pprovider::{ProviderError, ProviderId};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Static, process-wide provider settings. Read once at startup and
/// immutable afterwards; a missing required value fails construction
/// before any session exists.
#[derive(Clone)]
pub struct ProviderSettings {
    pub provider_id: ProviderId,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider_id", &self.provider_id)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderSettings {
    pub fn new(provider_id: ProviderId, model: impl Into<String>) -> Self {
        Self {
            provider_id,
            model: model.into(),
            api_key: None,
            base_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ProviderError> {
        let provider = lookup("MODEL_PROVIDER")
            .ok_or_else(|| ProviderError::configuration("MODEL_PROVIDER is not set"))?;
        let provider_id = parse_provider_id(&provider).ok_or_else(|| {
            ProviderError::configuration(format!("unknown MODEL_PROVIDER '{provider}'"))
        })?;

        let model = lookup("MODEL_CHAT")
            .ok_or_else(|| ProviderError::configuration("MODEL_CHAT is not set"))?;

        let api_key = lookup("API_KEY");
        if api_key.is_none() && provider_id != ProviderId::Ollama {
            return Err(ProviderError::configuration("API_KEY is not set"));
        }

        let timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.parse::<u64>().map_err(|_| {
                    ProviderError::configuration(format!(
                        "REQUEST_TIMEOUT_SECS must be a number of seconds, got '{value}'"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            provider_id,
            model,
            api_key,
            base_url: lookup("PROVIDER_URL"),
            timeout,
        })
    }
}

pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "converse" | "boise-state" => Some(ProviderId::Converse),
        "openai" => Some(ProviderId::OpenAi),
        "anthropic" | "claude" => Some(ProviderId::Anthropic),
        "ollama" | "local" => Some(ProviderId::Ollama),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn parse_provider_id_accepts_family_aliases() {
        assert_eq!(parse_provider_id("converse"), Some(ProviderId::Converse));
        assert_eq!(parse_provider_id("boise-state"), Some(ProviderId::Converse));
        assert_eq!(parse_provider_id(" OpenAI "), Some(ProviderId::OpenAi));
        assert_eq!(parse_provider_id("claude"), Some(ProviderId::Anthropic));
        assert_eq!(parse_provider_id("local"), Some(ProviderId::Ollama));
        assert_eq!(parse_provider_id("vertex"), None);
    }

    #[test]
    fn missing_required_values_fail_fatally() {
        let err = ProviderSettings::from_lookup(env(&[])).expect_err("must fail");
        assert_eq!(err.kind, pprovider::ProviderErrorKind::Configuration);
        assert!(err.message.contains("MODEL_PROVIDER"));

        let err = ProviderSettings::from_lookup(env(&[("MODEL_PROVIDER", "openai")]))
            .expect_err("must fail");
        assert!(err.message.contains("MODEL_CHAT"));

        let err = ProviderSettings::from_lookup(env(&[
            ("MODEL_PROVIDER", "openai"),
            ("MODEL_CHAT", "gpt-4o-mini"),
        ]))
        .expect_err("must fail");
        assert!(err.message.contains("API_KEY"));
    }

    #[test]
    fn unknown_provider_tag_is_a_configuration_error() {
        let err = ProviderSettings::from_lookup(env(&[
            ("MODEL_PROVIDER", "vertex"),
            ("MODEL_CHAT", "gemini"),
            ("API_KEY", "k"),
        ]))
        .expect_err("must fail");
        assert_eq!(err.kind, pprovider::ProviderErrorKind::Configuration);
        assert!(err.message.contains("vertex"));
    }

    #[test]
    fn local_inference_needs_no_credential() {
        let settings = ProviderSettings::from_lookup(env(&[
            ("MODEL_PROVIDER", "ollama"),
            ("MODEL_CHAT", "llama3.2"),
        ]))
        .expect("settings should load");

        assert_eq!(settings.provider_id, ProviderId::Ollama);
        assert!(settings.api_key.is_none());
        assert_eq!(settings.timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn optional_overrides_are_honored() {
        let settings = ProviderSettings::from_lookup(env(&[
            ("MODEL_PROVIDER", "boise-state"),
            ("MODEL_CHAT", "campus-large"),
            ("API_KEY", "campus-key"),
            ("PROVIDER_URL", "https://gateway.example.edu/chat"),
            ("REQUEST_TIMEOUT_SECS", "15"),
        ]))
        .expect("settings should load");

        assert_eq!(settings.provider_id, ProviderId::Converse);
        assert_eq!(
            settings.base_url.as_deref(),
            Some("https://gateway.example.edu/chat")
        );
        assert_eq!(settings.timeout, Duration::from_secs(15));
    }

    #[test]
    fn malformed_timeout_is_rejected() {
        let err = ProviderSettings::from_lookup(env(&[
            ("MODEL_PROVIDER", "openai"),
            ("MODEL_CHAT", "gpt-4o-mini"),
            ("API_KEY", "k"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .expect_err("must fail");
        assert!(err.message.contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn debug_output_redacts_the_credential() {
        let settings = ProviderSettings::new(ProviderId::OpenAi, "gpt-4o-mini")
            .with_api_key("sk-live-secret");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-live-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
