//! WASM-target tests for tutor-types.
//!
//! Mirrors the native unit tests but runs under wasm32-unknown-unknown
//! via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use tutor_types::message::*;
use tutor_types::presentation::*;
use tutor_types::config::*;
use tutor_types::session::*;
use tutor_types::voice::*;
use tutor_types::TutorError;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_user() {
    let msg = Message::user("1", "مرحباً");
    assert_eq!(msg.sender, Sender::User);
    assert_eq!(msg.text, "مرحباً");
}

#[wasm_bindgen_test]
fn message_persisted_layout() {
    let msg = Message::assistant("2", "جواب");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains(r#""sender":"ai""#));
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

// ─── Session Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn saved_chat_title_and_counts() {
    let chat = SavedChat::new(
        "1".to_string(),
        vec![Message::user("a", "ما هي الخلية؟"), Message::assistant("b", "...")],
        1_700_000_000_000,
    );
    assert_eq!(chat.title, "ما هي الخلية؟");
    assert_eq!(chat.question_count(), 1);
    let stats = ChatStats::from_chats(&[chat]);
    assert_eq!(stats.total_answers, 1);
}

// ─── Presentation Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn presentation_icon_fallback() {
    let slide: Slide =
        serde_json::from_str(r#"{"type":"intro","title":"t","content":"c","icon":"Nope"}"#).unwrap();
    assert_eq!(slide.kind, SlideKind::Intro);
    assert_eq!(slide.icon, IconName::BookIcon);
}

// ─── Config / Error / Voice Tests ────────────────────────

#[wasm_bindgen_test]
fn config_sampling_defaults() {
    let sampling = SamplingConfig::default();
    assert_eq!(sampling.top_k, 40);
    assert_eq!(sampling.max_output_tokens, 8192);
}

#[wasm_bindgen_test]
fn provider_error_mapping() {
    assert_eq!(TutorError::from_provider("API_KEY_INVALID"), TutorError::InvalidApiKey);
    assert!(matches!(TutorError::from_provider("quota"), TutorError::Generation(_)));
}

#[wasm_bindgen_test]
fn voice_error_codes() {
    assert_eq!(VoiceError::from_recognition_code("no-speech"), VoiceError::NoSpeech);
    assert_eq!(append_transcript("أ", "ب"), "أ ب");
}
