//! Adapter for OpenAI-compatible hosted backends.
//!
//! Usage is normalized from the reply's `usage.prompt_tokens` /
//! `usage.completion_tokens` mapping.

mod provider;
mod serde_api;
mod transport;

pub use provider::{OpenAiProvider, OPENAI_BASE_URL};
pub use serde_api::{
    OpenAiApiAssistantMessage, OpenAiApiChoice, OpenAiApiMessage, OpenAiApiRequest,
    OpenAiApiResponse, OpenAiApiUsage,
};
pub use transport::{OpenAiHttpTransport, OpenAiTransport};
