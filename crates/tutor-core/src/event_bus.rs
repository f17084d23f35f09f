//! Event bus between the conversation controller and the UI.
//!
//! Single-threaded (WASM): the controller pushes, the UI drains once per
//! frame. Fragment events for the same answer that pile up between two
//! frames are merged on drain, so a fast stream costs one update per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tutor_types::event::TutorEvent;

/// Shared event queue, cloned into every producer.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<TutorEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: TutorEvent) {
        log::trace!("event: {:?}", event);
        self.queue.borrow_mut().push_back(event);
    }

    /// Take every pending event in order, merging adjacent fragments of one answer.
    pub fn drain(&self) -> Vec<TutorEvent> {
        let mut out: Vec<TutorEvent> = Vec::new();
        for event in self.queue.borrow_mut().drain(..) {
            if let (
                Some(TutorEvent::Fragment { message_id: prev_id, text: prev_text }),
                TutorEvent::Fragment { message_id, text },
            ) = (out.last_mut(), &event)
            {
                if *prev_id == *message_id {
                    prev_text.push_str(text);
                    continue;
                }
            }
            out.push(event);
        }
        out
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}
