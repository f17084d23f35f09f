//! Incremental decoder for the `alt=sse` response of `streamGenerateContent`.
//!
//! Bytes arrive in arbitrary chunks. Only complete lines are decoded, so a
//! multi-byte character split across chunks is never cut in half.

use serde::Deserialize;
use tutor_types::{Result, TutorError};

const DATA_PREFIX: &str = "data:";

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk; returns the fragments (or provider errors) it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<String>> {
        self.pending.extend_from_slice(bytes);
        let mut items = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(item) = decode_line(&String::from_utf8_lossy(&line)) {
                items.push(item);
            }
        }
        items
    }

    /// Flush a final line that had no trailing newline.
    pub fn finish(&mut self) -> Vec<Result<String>> {
        let rest = std::mem::take(&mut self.pending);
        decode_line(&String::from_utf8_lossy(&rest)).into_iter().collect()
    }
}

fn decode_line(line: &str) -> Option<Result<String>> {
    let payload = line.trim_end_matches(['\r', '\n']).strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => chunk.into_fragment(),
        Err(e) => {
            log::warn!("skipping undecodable SSE payload: {}", e);
            None
        }
    }
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl ApiError {
    pub(crate) fn into_error(self) -> TutorError {
        TutorError::from_provider(format!("{} ({})", self.message, self.status))
    }
}

impl StreamChunk {
    fn into_fragment(self) -> Option<Result<String>> {
        if let Some(err) = self.error {
            return Some(Err(err.into_error()));
        }
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        Some(Ok(text))
    }
}

/// Error envelope of a non-2xx response body
#[derive(Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ApiError,
}
