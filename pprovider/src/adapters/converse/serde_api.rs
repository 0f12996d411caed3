//! Converse HTTP payload serde models and reply mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed content used when a reply matches no recognized shape. The
/// exchange proceeds with this text instead of failing.
pub(crate) const FALLBACK_REPLY: &str = "Unknown error";

#[derive(Debug, Clone, Serialize)]
pub struct ConverseApiRequest {
    pub message: ConverseApiPayload,
    #[serde(rename = "modelId")]
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

/// Protocol V1 sends the latest user turn as a bare string; V2 sends the
/// full message array.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConverseApiPayload {
    Text(String),
    Messages(Vec<ConverseApiMessage>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConverseApiMessage {
    pub role: String,
    pub content: String,
}

/// Every field is optional on purpose: the gateway's reply shape varies
/// and unrecognized shapes degrade to [`FALLBACK_REPLY`].
#[derive(Debug, Clone, Deserialize)]
pub struct ConverseApiReply {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ConverseApiReply {
    /// Reply mapping, in priority order: an `error` key surfaces the
    /// accompanying `message` as content (best-effort, not a failure),
    /// then `text`, then the fallback string.
    pub(crate) fn into_content(self) -> String {
        if self.error.is_some() {
            return self.message.unwrap_or_else(|| FALLBACK_REPLY.to_string());
        }

        if let Some(text) = self.text {
            return text;
        }

        FALLBACK_REPLY.to_string()
    }
}
