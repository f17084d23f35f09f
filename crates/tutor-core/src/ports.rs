//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `tutor-core` (pure Rust).
//! Implementations live in `tutor-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use tutor_types::{
    Result,
    config::{augment_prompt, GenerationConfig, SamplingConfig},
    message::InlineImage,
    voice::VoiceError,
};

// ─── Generation Port ─────────────────────────────────────────

/// Everything the provider needs to answer one question
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub system_instruction: String,
    pub sampling: SamplingConfig,
}

impl GenerationRequest {
    /// Build the request for a student question, wrapped in the curriculum prompt.
    pub fn for_question(config: &GenerationConfig, question: &str, image: Option<InlineImage>) -> Self {
        Self {
            model: config.model.clone(),
            prompt: augment_prompt(question),
            image,
            system_instruction: config.system_instruction.clone(),
            sampling: config.sampling,
        }
    }
}

/// Stream of answer fragments in arrival order; an `Err` item ends the stream.
pub type FragmentSource = Pin<Box<dyn Stream<Item = Result<String>>>>;

pub trait GenerationPort {
    /// Start generating; fragments arrive as the provider produces them.
    fn stream_generate(&self, req: GenerationRequest) -> FragmentSource;

    /// Name of this provider (for logging/debug)
    fn provider_name(&self) -> &str;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Voice Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait VoicePort {
    /// Run one recognition and return the final transcript.
    async fn capture(&self) -> std::result::Result<String, VoiceError>;

    /// Stop a recognition in progress; a no-op when idle.
    fn stop(&self);

    fn is_supported(&self) -> bool;
}

// ─── Clock Port ──────────────────────────────────────────────

/// Source of time-derived ids and timestamps
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock (JS `Date` on wasm32)
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
