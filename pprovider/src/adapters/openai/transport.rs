//! OpenAI transport trait and reqwest-based HTTP implementation.

use reqwest::{Client, Response};

use crate::adapters::{classify_status, send_error};
use crate::{ProviderError, ProviderFuture, SecretString};

use super::serde_api::{extract_error_message, OpenAiApiRequest, OpenAiApiResponse};

pub trait OpenAiTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: OpenAiApiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<OpenAiApiResponse, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    client: Client,
    base_url: String,
}

impl OpenAiHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: super::OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("request failed with http {status}"));
        classify_status(status, message)
    }
}

impl OpenAiTransport for OpenAiHttpTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiApiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<OpenAiApiResponse, ProviderError>> {
        Box::pin(async move {
            let url = self.endpoint("chat/completions");
            let response = self
                .client
                .post(url)
                .bearer_auth(api_key.expose())
                .json(&request)
                .send()
                .await
                .map_err(send_error)?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<OpenAiApiResponse>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }
}
