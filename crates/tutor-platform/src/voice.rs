//! Speech-recognition adapter.
//!
//! `SpeechRecognition` is not part of stable web-sys, so the constructor
//! (standard or `webkit`-prefixed) and its properties are reached through
//! `js_sys::Reflect`. One capture asks for the microphone first, then runs
//! a single non-continuous recognition and resolves with its transcript.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};

use tutor_core::ports::VoicePort;
use tutor_types::voice::{VoiceError, RECOGNITION_LOCALE};

type Outcome = Result<String, VoiceError>;
type OutcomeSlot = Rc<RefCell<Option<oneshot::Sender<Outcome>>>>;

const CONSTRUCTOR_NAMES: [&str; 2] = ["SpeechRecognition", "webkitSpeechRecognition"];
const HANDLERS: [&str; 3] = ["onresult", "onerror", "onend"];

#[derive(Default)]
pub struct BrowserVoice {
    /// Recognition object of the capture in progress
    active: RefCell<Option<JsValue>>,
}

impl BrowserVoice {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl VoicePort for BrowserVoice {
    async fn capture(&self) -> Outcome {
        let ctor = recognition_constructor().ok_or(VoiceError::Unsupported)?;
        request_microphone().await?;

        let recognition = Reflect::construct(&ctor, &Array::new())
            .map_err(|e| VoiceError::Other(format!("{:?}", e)))?;
        set_prop(&recognition, "lang", &JsValue::from_str(RECOGNITION_LOCALE))?;
        set_prop(&recognition, "continuous", &JsValue::FALSE)?;
        set_prop(&recognition, "interimResults", &JsValue::FALSE)?;
        set_prop(&recognition, "maxAlternatives", &JsValue::from_f64(1.0))?;

        let (sender, receiver) = oneshot::channel();
        let slot: OutcomeSlot = Rc::new(RefCell::new(Some(sender)));

        let result_slot = slot.clone();
        let onresult = Closure::wrap(Box::new(move |event: JsValue| {
            settle(&result_slot, Ok(first_transcript(&event).unwrap_or_default()));
        }) as Box<dyn FnMut(JsValue)>);

        let error_slot = slot.clone();
        let onerror = Closure::wrap(Box::new(move |event: JsValue| {
            let code = Reflect::get(&event, &JsValue::from_str("error"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            log::error!("speech recognition error: {}", code);
            settle(&error_slot, Err(VoiceError::from_recognition_code(&code)));
        }) as Box<dyn FnMut(JsValue)>);

        // Ending without a result (stopped by the user) yields an empty transcript
        let end_slot = slot.clone();
        let onend = Closure::wrap(Box::new(move |_event: JsValue| {
            settle(&end_slot, Ok(String::new()));
        }) as Box<dyn FnMut(JsValue)>);

        start_with_handlers(
            &recognition,
            [onresult.as_ref(), onerror.as_ref(), onend.as_ref()],
        )?;
        log::info!("speech recognition started ({})", RECOGNITION_LOCALE);
        *self.active.borrow_mut() = Some(recognition.clone());

        let outcome = receiver
            .await
            .unwrap_or_else(|_| Err(VoiceError::Other("recognition dropped".to_string())));

        self.active.borrow_mut().take();
        detach_handlers(&recognition);
        drop((onresult, onerror, onend));
        outcome
    }

    fn stop(&self) {
        if let Some(recognition) = self.active.borrow().as_ref() {
            if let Err(e) = call_method(recognition, "stop") {
                log::warn!("failed to stop recognition: {}", e);
            }
        }
    }

    fn is_supported(&self) -> bool {
        recognition_constructor().is_some()
    }
}

/// Install `onresult`, `onerror`, `onend` (in that order) and call `start()`.
///
/// On failure every handler is reset to `null` before returning, so the
/// recognizer never calls into a closure the caller is about to drop.
pub fn start_with_handlers(recognition: &JsValue, handlers: [&JsValue; 3]) -> Result<(), VoiceError> {
    let started = HANDLERS
        .iter()
        .zip(handlers)
        .try_for_each(|(name, handler)| set_prop(recognition, name, handler))
        .and_then(|_| call_method(recognition, "start"));
    if started.is_err() {
        detach_handlers(recognition);
    }
    started
}

pub fn detach_handlers(recognition: &JsValue) {
    for handler in HANDLERS {
        let _ = Reflect::set(recognition, &JsValue::from_str(handler), &JsValue::NULL);
    }
}

fn settle(slot: &OutcomeSlot, outcome: Outcome) {
    if let Some(sender) = slot.borrow_mut().take() {
        let _ = sender.send(outcome);
    }
}

fn recognition_constructor() -> Option<Function> {
    let window: JsValue = web_sys::window()?.into();
    CONSTRUCTOR_NAMES.iter().find_map(|name| {
        Reflect::get(&window, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
    })
}

/// Ask for the microphone and release it again; recognition opens its own stream.
async fn request_microphone() -> Result<(), VoiceError> {
    let Some(window) = web_sys::window() else {
        return Err(VoiceError::Unsupported);
    };
    // Older browsers without mediaDevices go straight to recognition
    let Ok(devices) = window.navigator().media_devices() else {
        return Ok(());
    };

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(media_error)?;
    let stream: MediaStream = JsFuture::from(promise)
        .await
        .map_err(media_error)?
        .unchecked_into();

    for track in stream.get_tracks().iter() {
        track.unchecked_into::<MediaStreamTrack>().stop();
    }
    log::debug!("microphone permission granted");
    Ok(())
}

fn media_error(e: JsValue) -> VoiceError {
    let field = |key: &str| {
        Reflect::get(&e, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    };
    let err = VoiceError::from_media_error_name(&field("name"), &field("message"));
    log::error!("microphone request failed: {}", err);
    err
}

/// `event.results[0][0].transcript`
fn first_transcript(event: &JsValue) -> Option<String> {
    let results = Reflect::get(event, &JsValue::from_str("results")).ok()?;
    let first = Reflect::get_u32(&results, 0).ok()?;
    let alternative = Reflect::get_u32(&first, 0).ok()?;
    Reflect::get(&alternative, &JsValue::from_str("transcript"))
        .ok()?
        .as_string()
}

fn set_prop(target: &JsValue, key: &str, value: &JsValue) -> Result<(), VoiceError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| VoiceError::Other(format!("{:?}", e)))
}

fn call_method(target: &JsValue, name: &str) -> Result<(), VoiceError> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| VoiceError::Other(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|_| VoiceError::Other(format!("{} is not a function", name)))?;
    method
        .call0(target)
        .map(|_| ())
        .map_err(|e| VoiceError::Other(format!("{:?}", e)))
}
