//! Adapter for converse-style REST gateways.
//!
//! This family wraps a single chat endpoint behind an `X-API-Key` header
//! and reports failures in-band as JSON rather than through HTTP status
//! codes. It never reports token usage.

mod provider;
mod serde_api;
mod transport;

pub use provider::{ConverseProtocol, ConverseProvider, CONVERSE_BASE_URL};
pub use serde_api::{ConverseApiMessage, ConverseApiPayload, ConverseApiReply, ConverseApiRequest};
pub use transport::{ConverseHttpTransport, ConverseTransport};
