use serde::{Deserialize, Serialize};
use crate::message::{Message, Sender};

/// Maximum number of chats kept in history
pub const MAX_SAVED_CHATS: usize = 50;
/// Title length, in characters, taken from the first question
pub const TITLE_MAX_CHARS: usize = 50;
/// Title used when a chat has no question text
pub const DEFAULT_CHAT_TITLE: &str = "محادثة جديدة";

/// A persisted conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedChat {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    /// Creation instant, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl SavedChat {
    pub fn new(id: String, messages: Vec<Message>, timestamp: i64) -> Self {
        Self {
            id,
            title: derive_title(&messages),
            messages,
            timestamp,
        }
    }

    pub fn question_count(&self) -> usize {
        self.messages.iter().filter(|m| m.sender == Sender::User).count()
    }

    /// Local date of the chat for listings, e.g. `2024-12-21`
    pub fn date_label(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
            .map(|dt| dt.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Title from the first user-authored message, truncated to 50 characters.
pub fn derive_title(messages: &[Message]) -> String {
    let title: String = messages
        .iter()
        .find(|m| m.sender == Sender::User)
        .map(|m| m.text.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_default();
    if title.is_empty() {
        DEFAULT_CHAT_TITLE.to_string()
    } else {
        title
    }
}

/// Aggregate counters shown in the sidebar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStats {
    pub total_chats: usize,
    pub total_messages: usize,
    pub total_questions: usize,
    pub total_answers: usize,
}

impl ChatStats {
    pub fn from_chats(chats: &[SavedChat]) -> Self {
        let total_messages: usize = chats.iter().map(|c| c.messages.len()).sum();
        let total_questions: usize = chats.iter().map(SavedChat::question_count).sum();
        Self {
            total_chats: chats.len(),
            total_messages,
            total_questions,
            total_answers: total_messages - total_questions,
        }
    }
}
