//! Microphone and speech-recognition failures.
//!
//! These never touch the conversation: the UI shows the instruction text
//! and the user clicks the microphone again.

use thiserror::Error;

/// Locale used for single-shot recognition
pub const RECOGNITION_LOCALE: &str = "ar-SA";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no microphone found")]
    NotFound,

    #[error("no speech detected")]
    NoSpeech,

    #[error("network failure during recognition")]
    Network,

    #[error("speech recognition not supported")]
    Unsupported,

    #[error("voice capture failed: {0}")]
    Other(String),
}

impl VoiceError {
    /// Map a `SpeechRecognitionErrorEvent.error` code.
    pub fn from_recognition_code(code: &str) -> Self {
        match code {
            "not-allowed" | "permission-denied" | "service-not-allowed" => VoiceError::PermissionDenied,
            "no-speech" => VoiceError::NoSpeech,
            "network" => VoiceError::Network,
            "audio-capture" => VoiceError::NotFound,
            other => VoiceError::Other(other.to_string()),
        }
    }

    /// Map the `name` of a DOMException raised by `getUserMedia`.
    pub fn from_media_error_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => VoiceError::PermissionDenied,
            "NotFoundError" => VoiceError::NotFound,
            _ => VoiceError::Other(message.to_string()),
        }
    }

    /// Instruction shown to the user
    pub fn user_message(&self) -> String {
        match self {
            VoiceError::PermissionDenied => "❌ تم رفض الوصول للميكروفون\n\n\
                يرجى السماح بالوصول:\n\
                1. اضغط أيقونة القفل 🔒 أو الميكروفون 🎤 في شريط العنوان\n\
                2. اسمح بالميكروفون\n\
                3. حدّث الصفحة"
                .to_string(),
            VoiceError::NotFound => "❌ لم يتم العثور على ميكروفون\n\nتأكد من توصيل ميكروفون".to_string(),
            VoiceError::NoSpeech => "⚠️ لم يتم اكتشاف أي صوت\n\nتكلم بوضوح وجرب مرة أخرى".to_string(),
            VoiceError::Network => "❌ خطأ في الاتصال\n\nتحقق من اتصال الإنترنت".to_string(),
            VoiceError::Unsupported => "❌ التسجيل الصوتي غير مدعوم\n\n✅ استخدم:\n• Chrome\n• Edge\n• Safari (iOS 14.5+)".to_string(),
            VoiceError::Other(msg) => format!("❌ حدث خطأ: {}\n\nجرب متصفح آخر", msg),
        }
    }
}

/// Append a recognised transcript to whatever the user already typed.
pub fn append_transcript(existing: &str, transcript: &str) -> String {
    if existing.is_empty() {
        transcript.to_string()
    } else {
        format!("{} {}", existing, transcript)
    }
}
