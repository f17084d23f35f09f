//! WASM-target tests for tutor-core.
//!
//! Runs the event bus, classifier, chat store, and full question turns
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use tutor_core::aggregator::Completion;
use tutor_core::classifier::{classify, Classified};
use tutor_core::controller::{run_turn, ConversationController, TurnState};
use tutor_core::event_bus::EventBus;
use tutor_core::ports::*;
use tutor_core::session_store::ChatStore;
use tutor_types::config::GenerationConfig;
use tutor_types::event::TutorEvent;
use tutor_types::message::*;
use tutor_types::TutorError;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use async_trait::async_trait;

// ─── Mock Ports ──────────────────────────────────────────

#[derive(Default)]
struct MockStorage {
    data: RefCell<HashMap<String, Vec<u8>>>,
}

#[async_trait(?Send)]
impl StoragePort for MockStorage {
    async fn get(&self, key: &str) -> tutor_types::Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> tutor_types::Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> tutor_types::Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct TickClock(Cell<i64>);

impl Clock for TickClock {
    fn now_millis(&self) -> i64 {
        let now = self.0.get();
        self.0.set(now + 1);
        now
    }
}

struct MockGenerator {
    fragments: Vec<&'static str>,
    error: Option<TutorError>,
}

impl GenerationPort for MockGenerator {
    fn stream_generate(&self, _req: GenerationRequest) -> FragmentSource {
        let mut items: Vec<tutor_types::Result<String>> =
            self.fragments.iter().map(|f| Ok(f.to_string())).collect();
        if let Some(err) = self.error.clone() {
            items.push(Err(err));
        }
        Box::pin(futures::stream::iter(items))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

fn setup() -> (Rc<RefCell<ConversationController>>, Rc<ChatStore>, EventBus) {
    let bus = EventBus::new();
    let clock = Rc::new(TickClock(Cell::new(1_000)));
    let controller = ConversationController::new(GenerationConfig::default(), bus.clone(), clock.clone());
    let store = ChatStore::new(Rc::new(MockStorage::default()), clock);
    (Rc::new(RefCell::new(controller)), Rc::new(store), bus)
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(TutorEvent::TurnStart { turn_id: 1, message_id: "2".to_string() });
    bus.emit(TutorEvent::TurnEnd { turn_id: 1 });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 2);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn event_bus_coalesces_fragments() {
    let bus = EventBus::new();
    bus.emit(TutorEvent::Fragment { message_id: "2".to_string(), text: "A".to_string() });
    bus.emit(TutorEvent::Fragment { message_id: "2".to_string(), text: "B".to_string() });
    assert_eq!(
        bus.drain(),
        vec![TutorEvent::Fragment { message_id: "2".to_string(), text: "AB".to_string() }]
    );
}

// ─── Classifier Tests ────────────────────────────────────

#[wasm_bindgen_test]
fn classify_deck_and_text() {
    let deck = r#"{"title":"الخلية","slides":[{"type":"summary","title":"خلاصة","content":"...","icon":"LightbulbIcon"}]}"#;
    assert!(matches!(classify(deck), Classified::Presentation(_)));
    assert!(matches!(classify("مرحباً!"), Classified::Narrative(_)));
}

// ─── Turn Tests ──────────────────────────────────────────

#[wasm_bindgen_test]
async fn turn_streams_and_saves() {
    let (controller, store, bus) = setup();
    let generator = Rc::new(MockGenerator { fragments: vec!["Hi", " there", "!"], error: None });

    let ticket = controller.borrow_mut().begin_turn("Hello", None).unwrap();
    let saved = run_turn(controller.clone(), generator, store.clone(), ticket).await.unwrap();

    assert_eq!(controller.borrow().messages()[1].text, "Hi there!");
    assert_eq!(*controller.borrow().state(), TurnState::Complete);

    let chats = store.get_all().await;
    assert_eq!(chats.len(), 1);
    assert_eq!(saved, Some(chats[0].id.clone()));
    assert_eq!(chats[0].messages.len(), 2);

    let events = bus.drain();
    assert!(events.iter().any(|e| matches!(e, TutorEvent::TurnEnd { .. })));
    assert!(events.iter().any(|e| matches!(e, TutorEvent::SessionSaved { .. })));
}

#[wasm_bindgen_test]
async fn turn_with_invalid_key() {
    let (controller, store, bus) = setup();
    let generator = Rc::new(MockGenerator { fragments: vec![], error: Some(TutorError::InvalidApiKey) });

    let ticket = controller.borrow_mut().begin_turn("سؤال", None).unwrap();
    run_turn(controller.clone(), generator, store.clone(), ticket).await.unwrap();

    let c = controller.borrow();
    assert!(c.messages()[1].is_error);
    assert!(c.messages()[1].text.contains("مفتاح API"));
    assert!(!c.is_in_flight());
    assert!(bus.drain().iter().any(|e| matches!(e, TutorEvent::Error { .. })));
}

#[wasm_bindgen_test]
async fn turn_abandoned_by_new_chat() {
    let (controller, store, _bus) = setup();
    let generator = Rc::new(MockGenerator { fragments: vec!["late"], error: None });

    let ticket = controller.borrow_mut().begin_turn("Hello", None).unwrap();
    controller.borrow_mut().new_conversation();
    let saved = run_turn(controller.clone(), generator, store.clone(), ticket).await.unwrap();

    assert!(saved.is_none());
    assert!(controller.borrow().messages().is_empty());
    assert!(store.get_all().await.is_empty());
}

#[wasm_bindgen_test]
fn finish_turn_reports_cancelled_as_complete() {
    let (controller, _store, _bus) = setup();
    let mut c = controller.borrow_mut();
    let ticket = c.begin_turn("Hello", None).unwrap();
    assert!(c.finish_turn(ticket.turn_id, Ok(Completion::Cancelled)));
    assert_eq!(*c.state(), TurnState::Complete);
}
