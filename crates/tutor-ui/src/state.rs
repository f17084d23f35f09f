//! UI-level state that drives rendering.
//!
//! The transcript itself is read from the conversation controller every
//! frame; this struct only holds what the controller does not know about
//! (input box, sidebar contents, slide positions, notices), updated each
//! frame by draining the EventBus.

use std::collections::HashMap;

use tutor_types::event::TutorEvent;
use tutor_types::message::ImageAttachment;
use tutor_types::session::{ChatStats, SavedChat};
use tutor_types::voice::{append_transcript, VoiceError};

pub const STATUS_READY: &str = "جاهز";
pub const STATUS_THINKING: &str = "جاري التفكير...";
pub const STATUS_WRITING: &str = "جاري الكتابة...";
pub const STATUS_FAILED: &str = "حدث خطأ";

/// Suggestions rotated on the welcome screen
pub const WELCOME_PHRASES: [&str; 8] = [
    "🎓 أهلاً بك في المستقبل. كيف يمكنني تبسيط دراستك اليوم؟",
    "🔬 اشرح لي قاعدة أرخميدس مع مثال عملي",
    "📸 هل تعلم؟ يمكنك إرسال صورة لسؤالك وسأقوم بحله لك",
    "📚 لخص قصيدة 'أنشودة المطر' للسياب بأسلوب مبسط",
    "✨ حوّل أي موضوع معقد إلى عرض تقديمي سهل وممتع",
    "🎯 اسألني عن أي مادة: رياضيات، فيزياء، كيمياء، أحياء، أدب",
    "💡 احصل على شرح مفصل مع أمثلة وتمارين تطبيقية",
    "🚀 جاهز لمساعدتك في التفوق الدراسي على مدار الساعة",
];

/// State visible to UI panels
pub struct UiState {
    /// Input field content
    pub input_text: String,
    /// Image waiting to be sent with the next question
    pub attachment: Option<ImageAttachment>,
    /// Status line text
    pub status_text: String,
    /// A turn is in flight
    pub busy: bool,
    pub show_sidebar: bool,
    pub show_settings: bool,
    /// Dismissible notice (voice and export problems)
    pub notice: Option<String>,
    /// Current slide per presentation message id
    pub slide_index: HashMap<String, usize>,
    /// Index into [`WELCOME_PHRASES`]
    pub welcome_phrase: usize,
    pub saved_chats: Vec<SavedChat>,
    pub stats: ChatStats,
    /// Chat id awaiting delete confirmation
    pub confirm_delete: Option<String>,
    pub confirm_clear_all: bool,
    pub recording: bool,
    /// Sidebar contents are stale and should be reloaded
    pub history_dirty: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            attachment: None,
            status_text: STATUS_READY.to_string(),
            busy: false,
            show_sidebar: true,
            show_settings: false,
            notice: None,
            slide_index: HashMap::new(),
            welcome_phrase: 0,
            saved_chats: Vec::new(),
            stats: ChatStats::default(),
            confirm_delete: None,
            confirm_clear_all: false,
            recording: false,
            history_dirty: true,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<TutorEvent>) {
        for event in events {
            match event {
                TutorEvent::TurnStart { .. } => {
                    self.busy = true;
                    self.status_text = STATUS_THINKING.to_string();
                }
                TutorEvent::Fragment { .. } => {
                    self.status_text = STATUS_WRITING.to_string();
                }
                TutorEvent::TurnEnd { .. } => {
                    self.busy = false;
                    if self.status_text != STATUS_FAILED {
                        self.status_text = STATUS_READY.to_string();
                    }
                }
                TutorEvent::TurnCancelled { .. } => {
                    self.busy = false;
                    self.status_text = STATUS_READY.to_string();
                }
                TutorEvent::SessionSaved { .. } => {
                    self.history_dirty = true;
                }
                TutorEvent::ConversationReset => {
                    self.busy = false;
                    self.slide_index.clear();
                    self.status_text = STATUS_READY.to_string();
                }
                TutorEvent::Error { message } => {
                    log::warn!("turn failed: {}", message.lines().next().unwrap_or_default());
                    self.status_text = STATUS_FAILED.to_string();
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Text or an image is ready and no turn is running.
    pub fn can_submit(&self) -> bool {
        !self.busy && (!self.input_text.trim().is_empty() || self.attachment.is_some())
    }

    /// Take the pending question out of the input box.
    pub fn take_submission(&mut self) -> Option<(String, Option<ImageAttachment>)> {
        if !self.can_submit() {
            return None;
        }
        let text = std::mem::take(&mut self.input_text);
        Some((text, self.attachment.take()))
    }

    pub fn set_history(&mut self, chats: Vec<SavedChat>, stats: ChatStats) {
        self.saved_chats = chats;
        self.stats = stats;
        self.history_dirty = false;
    }

    /// Copy of a listed chat, so the sidebar can open it without a storage round trip.
    pub fn saved_chat(&self, id: &str) -> Option<SavedChat> {
        self.saved_chats.iter().find(|c| c.id == id).cloned()
    }

    pub fn append_voice_transcript(&mut self, transcript: &str) {
        self.recording = false;
        let transcript = transcript.trim();
        if !transcript.is_empty() {
            self.input_text = append_transcript(&self.input_text, transcript);
        }
    }

    pub fn show_voice_error(&mut self, err: &VoiceError) {
        self.recording = false;
        self.notice = Some(err.user_message());
    }

    pub fn advance_welcome_phrase(&mut self) {
        self.welcome_phrase = (self.welcome_phrase + 1) % WELCOME_PHRASES.len();
    }

    pub fn welcome_phrase(&self) -> &'static str {
        WELCOME_PHRASES[self.welcome_phrase % WELCOME_PHRASES.len()]
    }

    /// Current slide of a presentation, kept inside `0..total`.
    pub fn slide_position(&self, message_id: &str, total: usize) -> usize {
        let index = self.slide_index.get(message_id).copied().unwrap_or(0);
        index.min(total.saturating_sub(1))
    }

    /// Move a presentation by `delta` slides, stopping at both ends.
    pub fn step_slide(&mut self, message_id: &str, delta: isize, total: usize) {
        let current = self.slide_position(message_id, total) as isize;
        let last = total.saturating_sub(1) as isize;
        let next = (current + delta).clamp(0, last) as usize;
        self.slide_index.insert(message_id.to_string(), next);
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
