//! Pick a storage backend.
//!
//! Priority: localStorage → Memory (fallback)

use std::rc::Rc;
use tutor_core::ports::StoragePort;
use tutor_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Open the best available backend. Never fails: memory is always there.
pub fn auto_detect_storage() -> Rc<dyn StoragePort> {
    match LocalStorage::open() {
        Ok(local) => {
            log::info!("Storage backend: localStorage");
            Rc::new(local)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}

/// Open the backend named in config.
pub fn open_storage(backend: StorageBackendType) -> Rc<dyn StoragePort> {
    match backend {
        StorageBackendType::Auto | StorageBackendType::LocalStorage => auto_detect_storage(),
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory");
            Rc::new(MemoryStorage::new())
        }
    }
}
