//! Conversation state: per-(author, channel) history, reply links, chunking.

pub mod chunker;
pub mod history;
pub mod replies;

pub use chunker::split_response;
pub use history::HistoryStore;
pub use replies::{ReplyHandle, ReplyTracker};

use serde::Serialize;

/// Identifier for one (author, channel) pair's message thread.
///
/// Stable for the process lifetime; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub author_id: u64,
    pub channel_id: u64,
}

impl ConversationKey {
    pub fn new(author_id: u64, channel_id: u64) -> Self {
        Self {
            author_id,
            channel_id,
        }
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.author_id, self.channel_id)
    }
}

/// Speaker role of a stored turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged message unit in a conversation history.
///
/// Immutable once appended; `content` may be empty but is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub name: Option<String>,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            name: None,
            content: content.into(),
        }
    }

    pub fn assistant(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            name: Some(name.into()),
            content: content.into(),
        }
    }
}
