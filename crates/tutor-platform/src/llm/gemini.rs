//! Gemini streaming adapter.
//!
//! Calls `models/{model}:streamGenerateContent?alt=sse` through browser
//! `fetch()` (gloo-net) and forwards text fragments as they are decoded.
//! A background task reads the response body and feeds an unbounded
//! channel; when the receiving side is dropped the body is cancelled.

use futures::channel::mpsc;
use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::ReadableStreamDefaultReader;

use tutor_core::ports::{FragmentSource, GenerationPort, GenerationRequest};
use tutor_types::{config::GenerationConfig, Result, TutorError};

use super::sse::{ErrorEnvelope, SseDecoder};

const API_VERSION: &str = "v1beta";

pub struct GeminiProvider {
    config: GenerationConfig,
}

impl GeminiProvider {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.config.base_url().trim_end_matches('/'),
            API_VERSION,
            model,
            self.config.api_key.trim(),
        )
    }
}

impl GenerationPort for GeminiProvider {
    fn stream_generate(&self, req: GenerationRequest) -> FragmentSource {
        let (tx, rx) = mpsc::unbounded();

        if !self.config.has_api_key() {
            let _ = tx.unbounded_send(Err(TutorError::InvalidApiKey));
            return Box::pin(rx);
        }

        let url = self.stream_url(&req.model);
        let body = build_request_body(&req);
        spawn_local(async move {
            if let Err(e) = forward_stream(&url, &body, &tx).await {
                log::error!("Gemini request failed: {}", e);
                let _ = tx.unbounded_send(Err(e));
            }
        });
        Box::pin(rx)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

/// JSON body of a `streamGenerateContent` call.
pub fn build_request_body(req: &GenerationRequest) -> Value {
    let mut parts = vec![json!({ "text": req.prompt })];
    if let Some(ref image) = req.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": image.data,
            }
        }));
    }

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "systemInstruction": { "parts": [{ "text": req.system_instruction }] },
        "generationConfig": {
            "temperature": req.sampling.temperature,
            "topP": req.sampling.top_p,
            "topK": req.sampling.top_k,
            "maxOutputTokens": req.sampling.max_output_tokens,
        },
    })
}

/// Map a non-2xx status and its body to an error.
pub fn status_error(status: u16, body: &str) -> TutorError {
    if status == 401 || status == 403 {
        return TutorError::InvalidApiKey;
    }
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.into_error(),
        Err(_) => TutorError::from_provider(format!("HTTP {}: {}", status, body)),
    }
}

type FragmentSender = mpsc::UnboundedSender<Result<String>>;

async fn forward_stream(url: &str, body: &Value, tx: &FragmentSender) -> Result<()> {
    let response = Request::post(url)
        .header("Content-Type", "application/json")
        .json(body)
        .map_err(|e| TutorError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| TutorError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(status_error(status, &text));
    }

    let stream = response
        .body()
        .ok_or_else(|| TutorError::Generation("empty response body".to_string()))?;
    let reader: ReadableStreamDefaultReader = stream.get_reader().unchecked_into();

    let mut decoder = SseDecoder::new();
    while let Some(bytes) = read_chunk(&reader).await? {
        for item in decoder.push(&bytes) {
            if tx.unbounded_send(item).is_err() {
                log::debug!("fragment receiver dropped, cancelling response body");
                let _ = reader.cancel();
                return Ok(());
            }
        }
    }
    for item in decoder.finish() {
        let _ = tx.unbounded_send(item);
    }
    Ok(())
}

async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>> {
    let result = JsFuture::from(reader.read()).await.map_err(js_error)?;
    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(js_error)?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(&result, &JsValue::from_str("value")).map_err(js_error)?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}

fn js_error(e: JsValue) -> TutorError {
    TutorError::Network(format!("{:?}", e))
}
