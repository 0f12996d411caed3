//! Converse transport trait and reqwest-based HTTP implementation.

use reqwest::Client;

use crate::adapters::send_error;
use crate::{ProviderError, ProviderFuture, SecretString};

use super::serde_api::{ConverseApiReply, ConverseApiRequest};

pub trait ConverseTransport: Send + Sync + std::fmt::Debug {
    fn exchange<'a>(
        &'a self,
        request: ConverseApiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ConverseApiReply, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct ConverseHttpTransport {
    client: Client,
    base_url: String,
}

impl ConverseHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: super::CONVERSE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ConverseTransport for ConverseHttpTransport {
    fn exchange<'a>(
        &'a self,
        request: ConverseApiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<ConverseApiReply, ProviderError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.base_url)
                .header("X-API-Key", api_key.expose())
                .json(&request)
                .send()
                .await
                .map_err(send_error)?;

            // This family reports failures in-band, so the status code is
            // not gated; the reply body decides what the caller sees.
            response
                .json::<ConverseApiReply>()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))
        })
    }
}
