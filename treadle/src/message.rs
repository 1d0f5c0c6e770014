//! Minimal message types for stage and solver conversations.
//!
//! Message roles: System (usually first in the list), User, Assistant.
//! Every `LlmClient::invoke` call takes a list of these.

/// A single message in the conversation.
///
/// Roles: system prompt, user input, assistant reply.
/// Tool results are rendered as User messages by the solver; there is no
/// separate Tool role in this minimal design.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System(String),
    /// User input.
    User(String),
    /// Model/agent reply.
    Assistant(String),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }
}
