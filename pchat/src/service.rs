//! Turn orchestration: validation, history assembly, token accounting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use pprovider::{GenerationOptions, Message, ModelProvider, ModelRequest};

use crate::{
    ChatError, ChatMessage, ChatTurnHooks, ConversationStore, InMemoryConversationStore,
    NoopChatTurnHooks,
};

/// Drives one provider against one conversation store. Turns on the same
/// session serialize on a per-session lock; different sessions never
/// block each other.
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ModelProvider>,
    store: Arc<dyn ConversationStore>,
    model: String,
    system_prompt: Option<String>,
    hooks: Arc<dyn ChatTurnHooks>,
    turn_locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ChatService {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            store: Arc::new(InMemoryConversationStore::new()),
            model: model.into(),
            system_prompt: None,
            hooks: Arc::new(NoopChatTurnHooks),
            turn_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ChatTurnHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Run one exchange: append the user turn, invoke the provider with
    /// the entire session history, account token usage, append the
    /// assistant turn. Provider failures propagate and leave the user
    /// turn committed.
    pub async fn chat(
        &self,
        session_id: &str,
        user_text: &str,
        options: GenerationOptions,
    ) -> Result<(), ChatError> {
        if user_text.trim().is_empty() {
            return Err(ChatError::invalid_request("user_text must not be empty"));
        }
        options.validate().map_err(ChatError::from)?;

        let turn_lock = self.turn_lock(session_id)?;
        let _guard = turn_lock.lock().await;

        let provider_id = self.provider.id();
        self.hooks.on_turn_start(session_id, provider_id, &self.model);
        let started = Instant::now();

        self.store
            .append_message(session_id, ChatMessage::user(user_text))
            .await?;

        let history = self.store.load_messages(session_id).await?;
        let mut messages = Vec::with_capacity(history.len() + 1);
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(Message::new(pprovider::Role::System, system_prompt.clone()));
        }
        messages.extend(
            history
                .iter()
                .map(|message| Message::new(message.role, message.content.clone())),
        );

        let request = ModelRequest::new(self.model.clone(), messages).with_options(options);
        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(err) => {
                let error = ChatError::from(err);
                self.hooks
                    .on_turn_failure(session_id, provider_id, &error, started.elapsed());
                return Err(error);
            }
        };

        // Prompt cost bills retroactively onto the user turn that
        // incurred it; completion cost stays on the assistant turn.
        if let Some(usage) = response.usage {
            self.store
                .record_prompt_tokens(session_id, usage.prompt_tokens)
                .await?;
        }

        let mut assistant =
            ChatMessage::assistant(response.message.content).with_requested(options);
        if let Some(usage) = response.usage {
            assistant = assistant.with_completion_tokens(usage.completion_tokens);
        }

        self.store.append_message(session_id, assistant).await?;
        self.hooks
            .on_turn_success(session_id, provider_id, response.usage, started.elapsed());

        Ok(())
    }

    /// Ordered history for rendering; unknown sessions read as empty.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        self.store.load_messages(session_id).await
    }

    pub async fn session_exists(&self, session_id: &str) -> Result<bool, ChatError> {
        self.store.session_exists(session_id).await
    }

    fn turn_lock(&self, session_id: &str) -> Result<Arc<tokio::sync::Mutex<()>>, ChatError> {
        let mut locks = self
            .turn_locks
            .lock()
            .map_err(|_| ChatError::store("turn lock registry poisoned"))?;

        Ok(locks.entry(session_id.to_string()).or_default().clone())
    }
}
