//! Stored turn records and their per-message accounting metadata.
//!
//! ```rust
//! use pchat::ChatMessage;
//! use pprovider::Role;
//!
//! let message = ChatMessage::user("hello");
//! assert_eq!(message.role, Role::User);
//! assert!(message.usage.is_empty());
//! ```

use pprovider::{GenerationOptions, Role};

/// Per-message token accounting. Prompt cost lands on the user message
/// that incurred it, completion cost on the assistant message; the
/// attribution is asymmetric on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl MessageUsage {
    pub fn is_empty(&self) -> bool {
        self.prompt_tokens.is_none() && self.completion_tokens.is_none()
    }
}

/// One stored conversational turn. `content` is fixed at construction;
/// the accounting fields may be filled in later but never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub usage: MessageUsage,
    /// The generation parameters actually requested for this turn, kept
    /// as an audit trail independent of how they were encoded on the
    /// wire. Empty on user messages.
    pub requested: GenerationOptions,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            usage: MessageUsage::default(),
            requested: GenerationOptions::default(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_requested(mut self, requested: GenerationOptions) -> Self {
        self.requested = requested;
        self
    }

    pub fn with_completion_tokens(mut self, completion_tokens: u32) -> Self {
        self.usage.completion_tokens = Some(completion_tokens);
        self
    }
}
