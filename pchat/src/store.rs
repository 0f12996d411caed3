//! Conversation storage contracts and a basic in-memory implementation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use pprovider::Role;

use crate::{ChatError, ChatMessage};

pub type ChatFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Append-only per-session history. Sessions are created lazily on first
/// append and never destroyed; unknown sessions read as empty, not as
/// errors.
pub trait ConversationStore: Send + Sync {
    fn load_messages<'a>(
        &'a self,
        session_id: &'a str,
    ) -> ChatFuture<'a, Result<Vec<ChatMessage>, ChatError>>;

    fn append_message<'a>(
        &'a self,
        session_id: &'a str,
        message: ChatMessage,
    ) -> ChatFuture<'a, Result<(), ChatError>>;

    fn session_exists<'a>(&'a self, session_id: &'a str) -> ChatFuture<'a, Result<bool, ChatError>>;

    /// Retroactive billing: set the prompt-token count on the session's
    /// most recent message. Only fills an unset field on a trailing user
    /// message; anything else is a no-op.
    fn record_prompt_tokens<'a>(
        &'a self,
        session_id: &'a str,
        prompt_tokens: u32,
    ) -> ChatFuture<'a, Result<(), ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    sessions: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn load_messages<'a>(
        &'a self,
        session_id: &'a str,
    ) -> ChatFuture<'a, Result<Vec<ChatMessage>, ChatError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("conversation store lock poisoned"))?;

            Ok(sessions.get(session_id).cloned().unwrap_or_default())
        })
    }

    fn append_message<'a>(
        &'a self,
        session_id: &'a str,
        message: ChatMessage,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("conversation store lock poisoned"))?;

            sessions
                .entry(session_id.to_string())
                .or_default()
                .push(message);

            Ok(())
        })
    }

    fn session_exists<'a>(&'a self, session_id: &'a str) -> ChatFuture<'a, Result<bool, ChatError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("conversation store lock poisoned"))?;

            Ok(sessions.contains_key(session_id))
        })
    }

    fn record_prompt_tokens<'a>(
        &'a self,
        session_id: &'a str,
        prompt_tokens: u32,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| ChatError::store("conversation store lock poisoned"))?;

            if let Some(messages) = sessions.get_mut(session_id)
                && let Some(last) = messages.last_mut()
                && last.role == Role::User
                && last.usage.prompt_tokens.is_none()
            {
                last.usage.prompt_tokens = Some(prompt_tokens);
            }

            Ok(())
        })
    }
}
