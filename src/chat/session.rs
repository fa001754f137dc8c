//! Chat history as an explicit value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A message in the chat history: a role and text content.
///
/// # Examples
///
/// ```
/// use tabletalk::chat::ChatMessage;
///
/// let question = ChatMessage::user("How many orders shipped today?");
/// assert!(question.has_role(ChatMessage::USER));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the sender. Use the constants on [`ChatMessage`].
    pub role: String,
    /// The text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// User input message role.
    pub const USER: &'static str = "user";
    /// Assistant response message role.
    pub const ASSISTANT: &'static str = "assistant";

    #[must_use]
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[must_use]
    pub fn user(content: &str) -> Self {
        Self::new(Self::USER, content)
    }

    #[must_use]
    pub fn assistant(content: &str) -> Self {
        Self::new(Self::ASSISTANT, content)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

/// Violations of the single-writer turn discipline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a turn is already in progress")]
    TurnInProgress,

    #[error("no turn is in progress")]
    NoActiveTurn,
}

/// Process-local chat history with a single-writer turn guard.
///
/// A fresh session holds the fixed greeting pair. While a turn is active
/// the session accepts no new user message; the turn either commits with
/// the bot's final text or aborts without recording a response.
/// [`ChatSession::reset`] rebuilds the default greeting state in place
/// rather than mutating anything process-wide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    turn_active: bool,
}

impl ChatSession {
    /// Fixed opening user placeholder.
    pub const OPENING_USER: &str = "Hi...";

    /// Fixed welcome message.
    pub const WELCOME: &str = "Hello! Ask me about your database tables and I will \
        give you the answers. Remember to be specific in your wording.";

    pub fn new() -> Self {
        Self {
            messages: vec![
                ChatMessage::user(Self::OPENING_USER),
                ChatMessage::assistant(Self::WELCOME),
            ],
            turn_active: false,
        }
    }

    /// The history so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn turn_active(&self) -> bool {
        self.turn_active
    }

    /// Accepts the user's message and opens a turn.
    ///
    /// Rejected while a previous turn's stream is still running.
    pub fn begin_turn(&mut self, user_text: impl Into<String>) -> Result<(), SessionError> {
        if self.turn_active {
            return Err(SessionError::TurnInProgress);
        }
        self.messages.push(ChatMessage {
            role: ChatMessage::USER.to_string(),
            content: user_text.into(),
        });
        self.turn_active = true;
        Ok(())
    }

    /// Commits the bot's final text and closes the turn.
    pub fn complete_turn(&mut self, final_text: impl Into<String>) -> Result<(), SessionError> {
        if !self.turn_active {
            return Err(SessionError::NoActiveTurn);
        }
        self.messages.push(ChatMessage {
            role: ChatMessage::ASSISTANT.to_string(),
            content: final_text.into(),
        });
        self.turn_active = false;
        Ok(())
    }

    /// Closes the turn without recording a response.
    ///
    /// Used after a stream protocol violation: the turn is gone and the
    /// session accepts the next user message.
    pub fn abort_turn(&mut self) -> Result<(), SessionError> {
        if !self.turn_active {
            return Err(SessionError::NoActiveTurn);
        }
        self.turn_active = false;
        Ok(())
    }

    /// Clears history back to the fixed greeting pair.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
