use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

impl Sender {
    /// Label used in exported transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "👤 أنت",
            Sender::Assistant => "🤖 المساعد",
        }
    }
}

/// A single chat message. The assistant's text grows while its answer streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_preview: Option<String>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub is_error: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: Sender::User,
            text: text.into(),
            image_preview: None,
            is_error: false,
        }
    }

    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: Sender::Assistant,
            text: text.into(),
            image_preview: None,
            is_error: false,
        }
    }

    /// Empty assistant message that stands in for an answer still on its way.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::assistant(id, String::new())
    }

    pub fn with_image_preview(mut self, preview: Option<String>) -> Self {
        self.image_preview = preview;
        self
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Image bytes sent inline with a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix
    pub data: String,
}

/// An image the user attached in the input box.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data: String,
    /// Reference kept on the user message (file name)
    pub preview: String,
}

impl ImageAttachment {
    pub fn inline(&self) -> InlineImage {
        InlineImage {
            mime_type: self.mime_type.clone(),
            data: self.data.clone(),
        }
    }
}
