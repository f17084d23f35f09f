pub mod chat;
pub mod input;
pub mod presentation;
pub mod settings;
pub mod sidebar;
pub mod welcome;
