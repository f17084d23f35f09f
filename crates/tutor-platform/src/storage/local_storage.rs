//! `window.localStorage` backend.
//!
//! Values are UTF-8 text (the chat history and config are JSON), so bytes
//! are stored as strings. Quota errors surface from `set`.

use async_trait::async_trait;
use tutor_core::ports::StoragePort;
use tutor_types::{Result, TutorError};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the page's local storage; fails in private modes that block it.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| TutorError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| TutorError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| TutorError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .storage
            .get_item(key)
            .map_err(|e| TutorError::Storage(format!("{:?}", e)))?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| TutorError::Storage(format!("value for {} is not UTF-8: {}", key, e)))?;
        self.storage
            .set_item(key, text)
            .map_err(|e| TutorError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| TutorError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}
