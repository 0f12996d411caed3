//! Unified facade over the parley workspace crates.
//!
//! Parley relays user turns to a chat-completion backend and keeps
//! per-session history in memory. This crate is the single dependency
//! for most applications: it re-exports the core crates and wires a
//! [`ChatService`] from static settings or the environment.
//!
//! ```rust
//! use parley::{build_chat_service, ProviderId, ProviderSettings};
//!
//! let settings = ProviderSettings::new(ProviderId::Converse, "campus-large")
//!     .with_api_key("campus-key");
//! let service = build_chat_service(&settings).expect("service should build");
//! drop(service);
//! ```

mod config;
mod providers;

pub mod prelude {
    pub use crate::{
        build_chat_service, build_provider, chat_service_from_env, parse_provider_id,
        ProviderSettings, DEFAULT_REQUEST_TIMEOUT,
    };
    pub use pchat::prelude::*;
}

pub use pchat;
pub use pprovider;

pub use pchat::{
    ChatError, ChatErrorKind, ChatFuture, ChatMessage, ChatService, ChatTurnHooks,
    ConversationStore, InMemoryConversationStore, MessageUsage, NoopChatTurnHooks,
};
pub use pprovider::{
    GenerationOptions, Message, ModelProvider, ModelRequest, ModelResponse, ProviderError,
    ProviderErrorKind, ProviderFuture, ProviderId, Role, SecretString, TokenUsage,
};

pub use config::{parse_provider_id, ProviderSettings, DEFAULT_REQUEST_TIMEOUT};
pub use providers::{build_chat_service, build_provider, chat_service_from_env};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::prelude::*;
    use crate::{Message, ModelRequest, ModelResponse, ProviderError, ProviderId, Role};
    use pprovider::ProviderFuture;

    struct CannedProvider;

    impl crate::ModelProvider for CannedProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Converse
        }

        fn complete<'a>(
            &'a self,
            request: ModelRequest,
        ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
            Box::pin(async move {
                Ok(ModelResponse {
                    provider: ProviderId::Converse,
                    model: request.model,
                    message: Message::new(Role::Assistant, "canned"),
                    usage: None,
                })
            })
        }
    }

    #[tokio::test]
    async fn facade_service_runs_a_turn_end_to_end() {
        let service = ChatService::new(Arc::new(CannedProvider), "campus-large");
        service
            .chat("s1", "hello", GenerationOptions::default())
            .await
            .expect("turn should work");

        let history = service.history("s1").await.expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "canned");
    }
}
