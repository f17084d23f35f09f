//! Chat history kept under one storage key.
//!
//! The whole history is a single JSON array, newest first, capped at
//! [`MAX_SAVED_CHATS`]. Every write is read-modify-write of that array.
//! Reads fail soft: a missing or corrupt value is an empty history.

use std::rc::Rc;
use tutor_types::{
    Result,
    message::Message,
    session::{ChatStats, SavedChat, MAX_SAVED_CHATS},
};
use crate::ports::{Clock, StoragePort};

pub const CHATS_STORAGE_KEY: &str = "education_platform_chats";

pub struct ChatStore {
    storage: Rc<dyn StoragePort>,
    clock: Rc<dyn Clock>,
}

impl ChatStore {
    pub fn new(storage: Rc<dyn StoragePort>, clock: Rc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Save a transcript as a new chat and return its id; empty input saves nothing.
    pub async fn save(&self, messages: &[Message]) -> Result<String> {
        if messages.is_empty() {
            return Ok(String::new());
        }

        let mut chats = self.get_all().await;
        let now = self.clock.now_millis();
        let mut id = now;
        while chats.iter().any(|c| c.id == id.to_string()) {
            id += 1;
        }

        let chat = SavedChat::new(id.to_string(), messages.to_vec(), now);
        let chat_id = chat.id.clone();
        log::debug!("saving chat {} ({} messages)", chat_id, chat.messages.len());

        chats.insert(0, chat);
        chats.truncate(MAX_SAVED_CHATS);
        self.write_all(&chats).await?;
        Ok(chat_id)
    }

    /// All saved chats, newest first.
    pub async fn get_all(&self) -> Vec<SavedChat> {
        let data = match self.storage.get(CHATS_STORAGE_KEY).await {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Error loading chats from {}: {}", self.storage.backend_name(), e);
                return Vec::new();
            }
        };
        match serde_json::from_slice::<Vec<SavedChat>>(&data) {
            Ok(chats) => chats,
            Err(e) => {
                log::error!("Error loading chats: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get(&self, chat_id: &str) -> Option<SavedChat> {
        self.get_all().await.into_iter().find(|c| c.id == chat_id)
    }

    pub async fn delete(&self, chat_id: &str) -> Result<()> {
        let mut chats = self.get_all().await;
        chats.retain(|c| c.id != chat_id);
        self.write_all(&chats).await
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.storage.delete(CHATS_STORAGE_KEY).await
    }

    pub async fn stats(&self) -> ChatStats {
        ChatStats::from_chats(&self.get_all().await)
    }

    async fn write_all(&self, chats: &[SavedChat]) -> Result<()> {
        let json = serde_json::to_vec(chats)?;
        self.storage.set(CHATS_STORAGE_KEY, &json).await
    }
}
