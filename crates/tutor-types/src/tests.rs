#[cfg(test)]
mod tests {
    use crate::error::*;
    use crate::message::*;
    use crate::event::*;
    use crate::presentation::*;
    use crate::config::*;
    use crate::session::*;
    use crate::voice::*;

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("1", "مرحباً");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "مرحباً");
        assert!(msg.image_preview.is_none());
        assert!(!msg.is_error);
        assert!(msg.is_user());
    }

    #[test]
    fn test_message_placeholder_is_empty_answer() {
        let msg = Message::placeholder("2");
        assert_eq!(msg.sender, Sender::Assistant);
        assert!(msg.text.is_empty());
        assert!(!msg.is_error);
        assert!(!msg.is_user());
    }

    #[test]
    fn test_message_persisted_layout() {
        let msg = Message::user("1700000000000", "سؤال")
            .with_image_preview(Some("photo.png".to_string()));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "user");
        assert_eq!(json["imagePreview"], "photo.png");
        assert!(json.get("isError").is_none());

        let answer = Message::assistant("1700000000001", "جواب");
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["sender"], "ai");
        assert!(json.get("imagePreview").is_none());
    }

    #[test]
    fn test_message_reads_error_flag() {
        let msg: Message = serde_json::from_str(
            r#"{"id":"5","sender":"ai","text":"فشل","isError":true}"#,
        )
        .unwrap();
        assert!(msg.is_error);
        assert_eq!(msg.sender, Sender::Assistant);
    }

    #[test]
    fn test_sender_labels() {
        assert_eq!(Sender::User.label(), "👤 أنت");
        assert_eq!(Sender::Assistant.label(), "🤖 المساعد");
    }

    #[test]
    fn test_image_attachment_inline() {
        let img = ImageAttachment {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
            preview: "q.png".to_string(),
        };
        let inline = img.inline();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "aGVsbG8=");
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_title_from_first_user_message() {
        let messages = vec![
            Message::assistant("1", "أهلاً"),
            Message::user("2", "اشرح قاعدة أرخميدس"),
        ];
        assert_eq!(derive_title(&messages), "اشرح قاعدة أرخميدس");
    }

    #[test]
    fn test_title_truncates_by_characters() {
        let long: String = "ب".repeat(80);
        let messages = vec![Message::user("1", long)];
        let title = derive_title(&messages);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_title_defaults_without_question() {
        assert_eq!(derive_title(&[Message::assistant("1", "hi")]), DEFAULT_CHAT_TITLE);
        assert_eq!(derive_title(&[Message::user("1", "")]), DEFAULT_CHAT_TITLE);
    }

    #[test]
    fn test_stats_from_chats() {
        let chats = vec![
            SavedChat::new(
                "1".to_string(),
                vec![Message::user("a", "q"), Message::assistant("b", "a")],
                1,
            ),
            SavedChat::new("2".to_string(), vec![Message::user("c", "q")], 2),
        ];
        let stats = ChatStats::from_chats(&chats);
        assert_eq!(stats.total_chats, 2);
        assert_eq!(stats.total_messages, 3);
        assert_eq!(stats.total_questions, 2);
        assert_eq!(stats.total_answers, 1);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(ChatStats::from_chats(&[]), ChatStats::default());
    }

    #[test]
    fn test_saved_chat_date_label() {
        let chat = SavedChat::new("1".to_string(), vec![], 1_700_000_000_000);
        assert_eq!(chat.date_label().len(), 10);
    }

    // ─── Presentation Tests ──────────────────────────────────

    #[test]
    fn test_presentation_deserialize() {
        let json = r#"{
            "title": "الكثافة",
            "slides": [
                {"type": "intro", "title": "مقدمة", "content": "نص", "icon": "BookIcon"},
                {"type": "summary", "title": "الخلاصة", "content": "ملخص", "icon": "HeaderIcon"}
            ]
        }"#;
        let deck: PresentationData = serde_json::from_str(json).unwrap();
        assert_eq!(deck.title, "الكثافة");
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].kind, SlideKind::Intro);
        assert_eq!(deck.slides[1].icon, IconName::HeaderIcon);
    }

    #[test]
    fn test_unknown_icon_falls_back_to_book() {
        let slide: Slide = serde_json::from_str(
            r#"{"type":"step","title":"t","content":"c","icon":"RocketIcon"}"#,
        )
        .unwrap();
        assert_eq!(slide.icon, IconName::BookIcon);
    }

    #[test]
    fn test_unknown_slide_kind_is_step() {
        let slide: Slide = serde_json::from_str(r#"{"type":"bonus","title":"t"}"#).unwrap();
        assert_eq!(slide.kind, SlideKind::Step);
        assert!(slide.content.is_empty());
    }

    #[test]
    fn test_slide_serializes_type_field() {
        let slide = Slide {
            kind: SlideKind::Quiz,
            title: "سؤال".to_string(),
            content: "?".to_string(),
            icon: IconName::TargetIcon,
        };
        let json = serde_json::to_value(&slide).unwrap();
        assert_eq!(json["type"], "quiz");
        assert_eq!(json["icon"], "TargetIcon");
    }

    #[test]
    fn test_clamp_index() {
        let deck = PresentationData {
            title: "t".to_string(),
            slides: vec![
                Slide { kind: SlideKind::Intro, title: String::new(), content: String::new(), icon: IconName::AiIcon },
                Slide { kind: SlideKind::Step, title: String::new(), content: String::new(), icon: IconName::AiIcon },
            ],
        };
        assert_eq!(deck.clamp_index(0), 0);
        assert_eq!(deck.clamp_index(7), 1);
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = TutorConfig::default();
        assert_eq!(config.generation.model, "gemini-2.0-flash-exp");
        assert_eq!(config.generation.sampling.temperature, 0.7);
        assert_eq!(config.generation.sampling.top_p, 0.95);
        assert_eq!(config.generation.sampling.top_k, 40);
        assert_eq!(config.generation.sampling.max_output_tokens, 8192);
        assert_eq!(config.storage.backend, StorageBackendType::Auto);
        assert!(!config.generation.has_api_key());
        assert!(config.generation.system_instruction.contains("JSON"));
    }

    #[test]
    fn test_base_url_override() {
        let mut gen = GenerationConfig::default();
        assert_eq!(gen.base_url(), GEMINI_BASE_URL);
        gen.api_base = Some(String::new());
        assert_eq!(gen.base_url(), GEMINI_BASE_URL);
        gen.api_base = Some("http://localhost:8080".to_string());
        assert_eq!(gen.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = TutorConfig::default();
        config.generation.api_key = "key".to_string();
        let json = serde_json::to_string(&config).unwrap();
        let back: TutorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_augment_prompt_wraps_question() {
        let prompt = augment_prompt("ما هو الزخم؟");
        assert!(prompt.contains("ما هو الزخم؟"));
        assert!(prompt.contains("كتب السادس الإعدادي"));
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_provider_invalid_key() {
        let err = TutorError::from_provider("400: API key not valid. Please pass a valid API key.");
        assert_eq!(err, TutorError::InvalidApiKey);
        assert_eq!(TutorError::from_provider("reason: API_KEY_INVALID"), TutorError::InvalidApiKey);
        assert!(err.to_string().contains("مفتاح API"));
    }

    #[test]
    fn test_provider_generic_failure() {
        let err = TutorError::from_provider("HTTP 500: internal");
        assert!(matches!(err, TutorError::Generation(ref d) if d == "HTTP 500: internal"));
        assert_eq!(err.to_string(), crate::error::GENERATION_FAILED_MESSAGE);
        assert!(err.is_generation_failure());
        assert!(!TutorError::Storage("x".to_string()).is_generation_failure());
    }

    #[test]
    fn test_error_from_serde() {
        let err: TutorError = serde_json::from_str::<PresentationData>("{").unwrap_err().into();
        assert!(matches!(err, TutorError::Serialization(_)));
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_event_serialization() {
        let event = TutorEvent::Fragment {
            message_id: "2".to_string(),
            text: "Hi".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: TutorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    // ─── Voice Tests ─────────────────────────────────────────

    #[test]
    fn test_voice_recognition_codes() {
        assert_eq!(VoiceError::from_recognition_code("not-allowed"), VoiceError::PermissionDenied);
        assert_eq!(VoiceError::from_recognition_code("permission-denied"), VoiceError::PermissionDenied);
        assert_eq!(VoiceError::from_recognition_code("no-speech"), VoiceError::NoSpeech);
        assert_eq!(VoiceError::from_recognition_code("network"), VoiceError::Network);
        assert_eq!(
            VoiceError::from_recognition_code("aborted"),
            VoiceError::Other("aborted".to_string())
        );
    }

    #[test]
    fn test_voice_media_error_names() {
        assert_eq!(VoiceError::from_media_error_name("NotAllowedError", ""), VoiceError::PermissionDenied);
        assert_eq!(VoiceError::from_media_error_name("PermissionDeniedError", ""), VoiceError::PermissionDenied);
        assert_eq!(VoiceError::from_media_error_name("NotFoundError", ""), VoiceError::NotFound);
        assert_eq!(
            VoiceError::from_media_error_name("AbortError", "boom"),
            VoiceError::Other("boom".to_string())
        );
    }

    #[test]
    fn test_voice_messages_are_distinct() {
        let kinds = [
            VoiceError::PermissionDenied,
            VoiceError::NotFound,
            VoiceError::NoSpeech,
            VoiceError::Network,
        ];
        let messages: std::collections::HashSet<String> =
            kinds.iter().map(|k| k.user_message()).collect();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn test_append_transcript() {
        assert_eq!(append_transcript("", "مرحبا"), "مرحبا");
        assert_eq!(append_transcript("اشرح", "الكثافة"), "اشرح الكثافة");
    }
}
