//! Tracing-based observability hooks for chat turns.
//!
//! ```rust
//! use pchat::ChatTurnHooks;
//! use pobserve::TracingChatHooks;
//!
//! fn accepts_hooks(_hooks: &dyn ChatTurnHooks) {}
//!
//! let hooks = TracingChatHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatTurnHooks};
use pprovider::{ProviderId, TokenUsage};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChatHooks;

impl ChatTurnHooks for TracingChatHooks {
    fn on_turn_start(&self, session_id: &str, provider: ProviderId, model: &str) {
        tracing::info!(
            phase = "chat",
            event = "turn_start",
            provider = %provider,
            session_id,
            model
        );
    }

    fn on_turn_success(
        &self,
        session_id: &str,
        provider: ProviderId,
        usage: Option<TokenUsage>,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "chat",
            event = "turn_success",
            provider = %provider,
            session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            prompt_tokens = usage.map(|usage| usage.prompt_tokens),
            completion_tokens = usage.map(|usage| usage.completion_tokens)
        );
    }

    fn on_turn_failure(
        &self,
        session_id: &str,
        provider: ProviderId,
        error: &ChatError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "chat",
            event = "turn_failure",
            provider = %provider,
            session_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
