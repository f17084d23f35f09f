//! Slide-deck answers.
//!
//! The model answers teaching questions with a JSON document shaped like
//! [`PresentationData`]. Parsing is lenient on the slide level: unknown slide
//! kinds and icon names degrade to a sensible default instead of rejecting
//! the whole deck.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationData {
    pub title: String,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "type", default)]
    pub kind: SlideKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub icon: IconName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SlideKind {
    Intro,
    #[default]
    Step,
    Quiz,
    Summary,
}

impl From<String> for SlideKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "intro" => SlideKind::Intro,
            "quiz" => SlideKind::Quiz,
            "summary" => SlideKind::Summary,
            _ => SlideKind::Step,
        }
    }
}

/// Icons the model may reference; anything else renders as the book icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum IconName {
    #[default]
    BookIcon,
    PaperIcon,
    TargetIcon,
    HeaderIcon,
    WelcomeIcon,
    AiIcon,
}

impl From<String> for IconName {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PaperIcon" => IconName::PaperIcon,
            "TargetIcon" => IconName::TargetIcon,
            "HeaderIcon" => IconName::HeaderIcon,
            "WelcomeIcon" => IconName::WelcomeIcon,
            "AiIcon" => IconName::AiIcon,
            _ => IconName::BookIcon,
        }
    }
}

impl IconName {
    /// Glyph drawn next to a slide title
    pub fn glyph(&self) -> &'static str {
        match self {
            IconName::BookIcon => "📖",
            IconName::PaperIcon => "📄",
            IconName::TargetIcon => "🎯",
            IconName::HeaderIcon => "📌",
            IconName::WelcomeIcon => "🎓",
            IconName::AiIcon => "🤖",
        }
    }
}

impl PresentationData {
    /// Clamp a slide index into range for this deck.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.slides.len().saturating_sub(1))
    }
}
