pub mod message;
pub mod event;
pub mod presentation;
pub mod config;
pub mod error;
pub mod session;
pub mod voice;

#[cfg(test)]
mod tests;

pub use error::TutorError;
pub type Result<T> = std::result::Result<T, TutorError>;
