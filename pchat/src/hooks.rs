//! Turn-lifecycle hook contracts for observability layers.
//!
//! ```rust
//! use pchat::{ChatTurnHooks, NoopChatTurnHooks};
//!
//! fn accepts_hooks(_hooks: &dyn ChatTurnHooks) {}
//!
//! let hooks = NoopChatTurnHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use pprovider::{ProviderId, TokenUsage};

use crate::ChatError;

pub trait ChatTurnHooks: Send + Sync {
    fn on_turn_start(&self, _session_id: &str, _provider: ProviderId, _model: &str) {}

    fn on_turn_success(
        &self,
        _session_id: &str,
        _provider: ProviderId,
        _usage: Option<TokenUsage>,
        _elapsed: Duration,
    ) {
    }

    fn on_turn_failure(
        &self,
        _session_id: &str,
        _provider: ProviderId,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatTurnHooks;

impl ChatTurnHooks for NoopChatTurnHooks {}
