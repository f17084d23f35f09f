use thiserror::Error;

/// Guidance shown in place of an answer when the provider rejects the API key.
pub const INVALID_API_KEY_GUIDANCE: &str = "🔑 مفتاح API غير صحيح!

للحصول على مفتاح صحيح:
1. افتح: https://makersuite.google.com/app/apikey
2. سجل دخول بحساب Google
3. انقر \"Create API Key\"
4. انسخ المفتاح وضعه في الإعدادات من القائمة الجانبية
5. أرسل سؤالك مرة أخرى";

/// Short message shown for every other generation failure.
pub const GENERATION_FAILED_MESSAGE: &str =
    "حدث خطأ أثناء الاتصال بالنموذج. يرجى مراجعة وحدة التحكم لمزيد من التفاصيل.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TutorError {
    #[error("{}", INVALID_API_KEY_GUIDANCE)]
    InvalidApiKey,

    /// The payload keeps the provider detail for logs; the display stays generic.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl TutorError {
    /// Map a raw provider failure description onto the two user-facing kinds.
    pub fn from_provider(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if detail.contains("API key not valid") || detail.contains("API_KEY_INVALID") {
            TutorError::InvalidApiKey
        } else {
            TutorError::Generation(detail)
        }
    }

    /// True for the kinds that mark a conversation turn as failed.
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, TutorError::InvalidApiKey | TutorError::Generation(_))
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(e: serde_json::Error) -> Self {
        TutorError::Serialization(e.to_string())
    }
}
