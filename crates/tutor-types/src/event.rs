use serde::{Deserialize, Serialize};

/// Events emitted by the conversation controller.
/// UI subscribes to these for status updates and history refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TutorEvent {
    /// A question was accepted and its placeholder answer appended
    TurnStart { turn_id: u64, message_id: String },

    /// A fragment was appended to the answer with this id
    Fragment { message_id: String, text: String },

    /// The turn reached a terminal state (complete or error)
    TurnEnd { turn_id: u64 },

    /// The turn was abandoned before the answer finished
    TurnCancelled { turn_id: u64 },

    /// The conversation was written to history
    SessionSaved { session_id: String },

    /// The active conversation was cleared or replaced
    ConversationReset,

    /// A generation error marked the answer as failed
    Error { message: String },
}
