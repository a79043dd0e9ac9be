use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::ids::MessageId;

/// Fixed greeting seeded at session start and after every clear.
pub const WELCOME_TEXT: &str = "👋 Hello! I'm the portfolio assistant. Feel free to ask me about \
     experience, projects, skills, or how we can work together. What would you like to know?";

/// Fixed user-safe fallback appended when a send fails.
pub const SEND_FAILURE_TEXT: &str = "Sorry, I encountered an error. Please try again.";

// The welcome message reuses one fixed id and fixed content, so a reseeded
// transcript is indistinguishable from a fresh session.
const WELCOME_MESSAGE_ID: MessageId = MessageId(Uuid::nil());

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

/// Core immutable message model.
///
/// Once appended to a transcript a message is never edited or removed except
/// by a full transcript reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at_unix_seconds: u64,
}

impl Message {
    /// Creates a message with explicit id and timestamp.
    pub fn new(
        id: MessageId,
        role: Role,
        content: impl Into<String>,
        created_at_unix_seconds: u64,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            created_at_unix_seconds,
        }
    }

    /// Creates a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(
            MessageId::generate(),
            Role::User,
            content,
            current_unix_timestamp_seconds(),
        )
    }

    /// Creates an assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(
            MessageId::generate(),
            Role::Assistant,
            content,
            current_unix_timestamp_seconds(),
        )
    }

    /// Creates the welcome message used to seed a transcript.
    pub fn welcome() -> Self {
        Self::new(
            WELCOME_MESSAGE_ID,
            Role::Assistant,
            WELCOME_TEXT,
            current_unix_timestamp_seconds(),
        )
    }

    /// Creates the synthetic assistant message appended after a failed send.
    pub fn send_failure() -> Self {
        Self::assistant(SEND_FAILURE_TEXT)
    }
}

pub fn current_unix_timestamp_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
