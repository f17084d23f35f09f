pub mod sse;
pub mod gemini;

pub use gemini::GeminiProvider;
pub use sse::SseDecoder;
