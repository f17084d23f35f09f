#[cfg(test)]
mod tests {
    use crate::attachment::*;
    use crate::llm::gemini::{build_request_body, status_error, GeminiProvider};
    use crate::llm::SseDecoder;
    use crate::storage::MemoryStorage;
    use tutor_core::ports::{GenerationRequest, StoragePort};
    use tutor_types::config::GenerationConfig;
    use tutor_types::message::InlineImage;
    use tutor_types::TutorError;

    use futures::executor::block_on;

    fn fragments(items: Vec<tutor_types::Result<String>>) -> Vec<String> {
        items.into_iter().map(|i| i.unwrap()).collect()
    }

    // ─── SSE Decoder Tests ───────────────────────────────────

    #[test]
    fn test_sse_single_event() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\r\n\r\n");
        assert_eq!(fragments(out), vec!["Hi"]);
    }

    #[test]
    fn test_sse_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let line = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"مرحباً\"}]}}]}\n\n";
        let bytes = line.as_bytes();
        // Split inside a multi-byte character
        let cut = line.find("مرحباً").unwrap() + 1;
        assert!(decoder.push(&bytes[..cut]).is_empty());
        assert_eq!(fragments(decoder.push(&bytes[cut..])), vec!["مرحباً"]);
    }

    #[test]
    fn test_sse_joins_parts_of_one_candidate() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"A\"},{\"text\":\"B\"}]}}]}\n");
        assert_eq!(fragments(out), vec!["AB"]);
    }

    #[test]
    fn test_sse_multiple_events_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let chunk = b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\n\n\
data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\" there\"}]}}]}\n\n";
        assert_eq!(fragments(decoder.push(chunk)), vec!["Hi", " there"]);
    }

    #[test]
    fn test_sse_ignores_non_data_lines() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b": keep-alive\nevent: message\n\ndata: [DONE]\n").is_empty());
    }

    #[test]
    fn test_sse_candidate_without_content_is_skipped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder
            .push(b"data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n")
            .is_empty());
    }

    #[test]
    fn test_sse_error_payload() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(
            b"data: {\"error\":{\"code\":400,\"message\":\"API key not valid. Please pass a valid API key.\",\"status\":\"INVALID_ARGUMENT\"}}\n",
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out.into_iter().next().unwrap().unwrap_err(), TutorError::InvalidApiKey);
    }

    #[test]
    fn test_sse_finish_flushes_last_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder
            .push(b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"end\"}]}}]}")
            .is_empty());
        assert_eq!(fragments(decoder.finish()), vec!["end"]);
        assert!(decoder.finish().is_empty());
    }

    // ─── Gemini Request Tests ────────────────────────────────

    #[test]
    fn test_request_body_shape() {
        let config = GenerationConfig::default();
        let image = InlineImage { mime_type: "image/png".to_string(), data: "iVBOR".to_string() };
        let req = GenerationRequest::for_question(&config, "ما هو الضوء؟", Some(image));
        let body = build_request_body(&req);

        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("ما هو الضوء؟"));
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "iVBOR");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], config.system_instruction.as_str());
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_request_body_without_image() {
        let req = GenerationRequest::for_question(&GenerationConfig::default(), "سؤال", None);
        let body = build_request_body(&req);
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_stream_url() {
        let config = GenerationConfig {
            api_key: " KEY ".to_string(),
            ..GenerationConfig::default()
        };
        let provider = GeminiProvider::new(config);
        assert_eq!(
            provider.stream_url("gemini-2.0-flash-exp"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:streamGenerateContent?alt=sse&key=KEY"
        );
    }

    #[test]
    fn test_stream_url_custom_base() {
        let config = GenerationConfig {
            api_base: Some("http://localhost:8080/".to_string()),
            api_key: "k".to_string(),
            ..GenerationConfig::default()
        };
        let url = GeminiProvider::new(config).stream_url("m");
        assert!(url.starts_with("http://localhost:8080/v1beta/models/m:"));
    }

    #[test]
    fn test_status_error_mapping() {
        assert_eq!(status_error(401, ""), TutorError::InvalidApiKey);
        assert_eq!(status_error(403, "forbidden"), TutorError::InvalidApiKey);
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(status_error(400, body), TutorError::InvalidApiKey);
        assert!(matches!(status_error(500, "oops"), TutorError::Generation(_)));
        let quota = r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(status_error(429, quota), TutorError::Generation(_)));
    }

    // ─── Attachment Tests ────────────────────────────────────

    #[test]
    fn test_guess_image_mime() {
        assert_eq!(guess_image_mime("photo.JPG"), Some("image/jpeg"));
        assert_eq!(guess_image_mime("diagram.png"), Some("image/png"));
        assert_eq!(guess_image_mime("notes.txt"), None);
        assert_eq!(guess_image_mime("noext"), None);
    }

    #[test]
    fn test_image_attachment_encodes_base64() {
        let att = image_attachment("مسألة.png", None, b"abc").unwrap();
        assert_eq!(att.mime_type, "image/png");
        assert_eq!(att.data, "YWJj");
        assert_eq!(att.preview, "مسألة.png");
    }

    #[test]
    fn test_image_attachment_prefers_given_mime() {
        let att = image_attachment("blob", Some("image/webp"), b"x").unwrap();
        assert_eq!(att.mime_type, "image/webp");
    }

    #[test]
    fn test_image_attachment_rejects_non_images() {
        assert!(image_attachment("notes.txt", Some("text/plain"), b"x").is_err());
        assert!(image_attachment("a.png", None, b"").is_err());
    }

    // ─── MemoryStorage Tests ─────────────────────────────────

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(block_on(storage.get("k")).unwrap(), None);
        block_on(storage.set("k", b"v")).unwrap();
        assert_eq!(block_on(storage.get("k")).unwrap(), Some(b"v".to_vec()));
        block_on(storage.delete("k")).unwrap();
        assert_eq!(block_on(storage.get("k")).unwrap(), None);
        assert_eq!(storage.backend_name(), "memory");
    }
}
