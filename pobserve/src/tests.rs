use std::time::Duration;

use pchat::{ChatError, ChatTurnHooks};
use pprovider::{ProviderId, TokenUsage};

use crate::{MetricsChatHooks, TracingChatHooks};

fn exercise(hooks: &dyn ChatTurnHooks) {
    hooks.on_turn_start("s1", ProviderId::Converse, "campus-large");
    hooks.on_turn_success(
        "s1",
        ProviderId::Converse,
        Some(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        }),
        Duration::from_millis(120),
    );
    hooks.on_turn_success("s1", ProviderId::Converse, None, Duration::from_millis(80));
    hooks.on_turn_failure(
        "s1",
        ProviderId::Converse,
        &ChatError::provider("backend unreachable"),
        Duration::from_millis(40),
    );
}

#[test]
fn tracing_hooks_accept_every_event_without_a_subscriber() {
    exercise(&TracingChatHooks);
}

#[test]
fn metrics_hooks_accept_every_event_without_a_recorder() {
    exercise(&MetricsChatHooks);
}
