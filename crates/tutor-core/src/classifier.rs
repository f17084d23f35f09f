//! Decide how an assistant answer is rendered.
//!
//! Teaching answers arrive as a JSON slide deck, small talk as plain text.
//! Classification never fails: anything that is not a complete deck is
//! narrative text, which also covers half-streamed JSON.

use tutor_types::message::Message;
use tutor_types::presentation::PresentationData;

const FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "```";

#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// Answer not started yet
    Thinking,
    Presentation(PresentationData),
    Narrative(String),
}

/// Remove one leading ```` ```json ```` line and one trailing fence, nothing else.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.strip_prefix(FENCE_OPEN).unwrap_or(text);
    text.strip_suffix(FENCE_CLOSE).unwrap_or(text)
}

/// Parse a finished answer as a slide deck, if it is one.
pub fn parse_presentation(text: &str) -> Option<PresentationData> {
    let deck: PresentationData = serde_json::from_str(strip_code_fence(text)).ok()?;
    if deck.title.is_empty() || deck.slides.is_empty() {
        return None;
    }
    Some(deck)
}

pub fn classify(text: &str) -> Classified {
    match parse_presentation(text) {
        Some(deck) => Classified::Presentation(deck),
        None => Classified::Narrative(text.to_string()),
    }
}

/// Classify a message for display. User and error messages are always narrative.
///
/// `streaming_id` is the placeholder of the turn still in flight. Only that
/// message shows the thinking indicator; an answer that finished empty is
/// plain narrative.
pub fn classify_message(message: &Message, streaming_id: Option<&str>) -> Classified {
    let awaiting = streaming_id == Some(message.id.as_str()) && message.text.is_empty();
    if awaiting && !message.is_user() && !message.is_error {
        Classified::Thinking
    } else if message.is_user() || message.is_error {
        Classified::Narrative(message.text.clone())
    } else {
        classify(&message.text)
    }
}
