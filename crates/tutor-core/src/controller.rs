//! Conversation controller — owns the active transcript.
//!
//! One turn at a time moves through
//! `Idle → AwaitingResponse → Streaming → Complete`, or ends in `Error`.
//! Every fragment carries the id of the turn that produced it, so text
//! from an abandoned turn never lands on a newer message.
//!
//! The controller is shared as `Rc<RefCell<_>>`. [`run_turn`] only borrows
//! it between awaits, which keeps the UI free to read it while a stream is open.

use std::cell::RefCell;
use std::rc::Rc;

use tutor_types::{
    Result,
    config::GenerationConfig,
    event::TutorEvent,
    message::{ImageAttachment, Message},
    session::SavedChat,
};
use crate::aggregator::{Completion, FragmentStream, StreamHandle};
use crate::event_bus::EventBus;
use crate::ports::{Clock, GenerationPort, GenerationRequest};
use crate::session_store::ChatStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
    Streaming,
    Complete,
    Error(String),
}

/// An accepted question, ready to be streamed by [`run_turn`].
#[derive(Debug, Clone)]
pub struct TurnTicket {
    pub turn_id: u64,
    pub message_id: String,
    pub request: GenerationRequest,
}

struct ActiveTurn {
    turn_id: u64,
    message_id: String,
    handle: Option<StreamHandle>,
}

pub struct ConversationController {
    config: GenerationConfig,
    messages: Vec<Message>,
    state: TurnState,
    active: Option<ActiveTurn>,
    session_id: Option<String>,
    event_bus: EventBus,
    clock: Rc<dyn Clock>,
    turn_counter: u64,
    last_message_id: i64,
}

impl ConversationController {
    pub fn new(config: GenerationConfig, event_bus: EventBus, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            messages: Vec::new(),
            state: TurnState::Idle,
            active: None,
            session_id: None,
            event_bus,
            clock,
            turn_counter: 0,
            last_message_id: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.active.is_some()
    }

    /// Placeholder id of the turn in flight, if any.
    pub fn streaming_message_id(&self) -> Option<&str> {
        self.active.as_ref().map(|t| t.message_id.as_str())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_config(&mut self, config: GenerationConfig) {
        self.config = config;
    }

    /// Accept a question: append it and an empty answer placeholder.
    ///
    /// Returns `None` (and changes nothing) while another turn is in flight
    /// or when there is neither text nor an image.
    pub fn begin_turn(&mut self, text: &str, image: Option<ImageAttachment>) -> Option<TurnTicket> {
        if self.is_in_flight() || (text.trim().is_empty() && image.is_none()) {
            return None;
        }

        self.turn_counter += 1;
        let turn_id = self.turn_counter;

        let user_id = self.next_message_id();
        let preview = image.as_ref().map(|img| img.preview.clone());
        self.messages.push(Message::user(user_id, text).with_image_preview(preview));

        let message_id = self.next_message_id();
        self.messages.push(Message::placeholder(message_id.clone()));

        self.active = Some(ActiveTurn {
            turn_id,
            message_id: message_id.clone(),
            handle: None,
        });
        self.state = TurnState::AwaitingResponse;
        self.event_bus.emit(TutorEvent::TurnStart {
            turn_id,
            message_id: message_id.clone(),
        });

        let request = GenerationRequest::for_question(
            &self.config,
            text,
            image.as_ref().map(ImageAttachment::inline),
        );
        Some(TurnTicket { turn_id, message_id, request })
    }

    /// Keep the stream handle of a live turn; a stale turn's stream is closed at once.
    pub fn attach_handle(&mut self, turn_id: u64, handle: StreamHandle) -> bool {
        match self.active.as_mut() {
            Some(turn) if turn.turn_id == turn_id => {
                turn.handle = Some(handle);
                true
            }
            _ => {
                handle.close();
                false
            }
        }
    }

    /// Append a fragment to the placeholder of `turn_id`. Stale fragments are dropped.
    pub fn apply_fragment(&mut self, turn_id: u64, fragment: &str) -> bool {
        let Some(message_id) = self.live_message_id(turn_id) else {
            log::debug!("dropping fragment for abandoned turn {}", turn_id);
            return false;
        };
        let Some(msg) = self.messages.iter_mut().find(|m| m.id == message_id) else {
            return false;
        };
        msg.text.push_str(fragment);
        self.state = TurnState::Streaming;
        self.event_bus.emit(TutorEvent::Fragment {
            message_id,
            text: fragment.to_string(),
        });
        true
    }

    /// Close out a turn. Returns `true` when the turn was still live.
    ///
    /// On failure the placeholder keeps its place and shows the error text.
    pub fn finish_turn(&mut self, turn_id: u64, outcome: Result<Completion>) -> bool {
        let Some(message_id) = self.live_message_id(turn_id) else {
            return false;
        };
        self.active = None;

        match outcome {
            Ok(_) => {
                self.state = TurnState::Complete;
            }
            Err(e) => {
                let text = e.to_string();
                if let Some(msg) = self.messages.iter_mut().find(|m| m.id == message_id) {
                    msg.text = text.clone();
                    msg.is_error = true;
                }
                self.state = TurnState::Error(text.clone());
                self.event_bus.emit(TutorEvent::Error { message: text });
            }
        }
        self.event_bus.emit(TutorEvent::TurnEnd { turn_id });
        true
    }

    /// Remember the id of the first save of this conversation.
    pub fn record_save(&mut self, session_id: &str) {
        if session_id.is_empty() {
            return;
        }
        if self.session_id.is_none() {
            self.session_id = Some(session_id.to_string());
        }
        self.event_bus.emit(TutorEvent::SessionSaved {
            session_id: session_id.to_string(),
        });
    }

    /// Start over. The saved history is left alone.
    pub fn new_conversation(&mut self) {
        self.abandon_turn();
        self.messages.clear();
        self.session_id = None;
        self.state = TurnState::Idle;
        self.event_bus.emit(TutorEvent::ConversationReset);
    }

    /// Replace the transcript with a chat from history.
    pub fn load_session(&mut self, chat: SavedChat) {
        self.abandon_turn();
        self.last_message_id = chat
            .messages
            .iter()
            .filter_map(|m| m.id.parse::<i64>().ok())
            .fold(self.last_message_id, i64::max);
        self.messages = chat.messages;
        self.session_id = Some(chat.id);
        self.state = TurnState::Idle;
        self.event_bus.emit(TutorEvent::ConversationReset);
    }

    fn abandon_turn(&mut self) {
        if let Some(turn) = self.active.take() {
            if let Some(handle) = turn.handle {
                handle.close();
            }
            log::info!("turn {} abandoned", turn.turn_id);
            self.event_bus.emit(TutorEvent::TurnCancelled { turn_id: turn.turn_id });
        }
    }

    fn live_message_id(&self, turn_id: u64) -> Option<String> {
        self.active
            .as_ref()
            .filter(|t| t.turn_id == turn_id)
            .map(|t| t.message_id.clone())
    }

    /// Millisecond ids, strictly increasing even within one millisecond.
    fn next_message_id(&mut self) -> String {
        let id = self.clock.now_millis().max(self.last_message_id + 1);
        self.last_message_id = id;
        id.to_string()
    }
}

/// Stream the answer for `ticket`, then save the transcript.
///
/// Returns the id of the saved chat, or `None` when the turn was abandoned
/// before it finished. Generation failures are recorded on the answer
/// message and still lead to a save; only a storage write failure is an `Err`.
pub async fn run_turn(
    controller: Rc<RefCell<ConversationController>>,
    generator: Rc<dyn GenerationPort>,
    store: Rc<ChatStore>,
    ticket: TurnTicket,
) -> Result<Option<String>> {
    let TurnTicket { turn_id, request, .. } = ticket;

    let (stream, handle) = FragmentStream::open(generator.as_ref(), request);
    if !controller.borrow_mut().attach_handle(turn_id, handle) {
        return Ok(None);
    }

    let outcome = stream
        .pump(|fragment| {
            controller.borrow_mut().apply_fragment(turn_id, fragment);
        })
        .await;

    if let Err(ref e) = outcome {
        log::warn!("turn {} failed: {:?}", turn_id, e);
    }
    if !controller.borrow_mut().finish_turn(turn_id, outcome) {
        return Ok(None);
    }

    let messages = controller.borrow().messages().to_vec();
    let session_id = store.save(&messages).await.map_err(|e| {
        log::error!("failed to save chat: {}", e);
        e
    })?;
    controller.borrow_mut().record_save(&session_id);
    Ok(Some(session_id))
}

