//! Metrics-based observability hooks for chat turns.
//!
//! ```rust
//! use pchat::ChatTurnHooks;
//! use pobserve::MetricsChatHooks;
//!
//! fn accepts_hooks(_hooks: &dyn ChatTurnHooks) {}
//!
//! let hooks = MetricsChatHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatTurnHooks};
use pprovider::{ProviderId, TokenUsage};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsChatHooks;

impl ChatTurnHooks for MetricsChatHooks {
    fn on_turn_start(&self, _session_id: &str, provider: ProviderId, _model: &str) {
        metrics::counter!(
            "parley_chat_turn_start_total",
            "provider" => provider.to_string()
        )
        .increment(1);
    }

    fn on_turn_success(
        &self,
        _session_id: &str,
        provider: ProviderId,
        usage: Option<TokenUsage>,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_chat_turn_success_total",
            "provider" => provider.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_chat_turn_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());

        if let Some(usage) = usage {
            metrics::histogram!(
                "parley_chat_turn_total_tokens",
                "provider" => provider.to_string()
            )
            .record(usage.total() as f64);
        }
    }

    fn on_turn_failure(
        &self,
        _session_id: &str,
        provider: ProviderId,
        error: &ChatError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_chat_turn_failure_total",
            "provider" => provider.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_chat_turn_duration_seconds",
            "provider" => provider.to_string()
        )
        .record(elapsed.as_secs_f64());
    }
}
