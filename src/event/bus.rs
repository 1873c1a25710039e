use std::cell::RefCell;
use std::fmt;

use crate::event::{EditorEvent, EventHandler};

/// Fans editor events out to subscribed handlers, in subscription order.
///
/// Lives on the UI thread; handlers are invoked synchronously from `emit`.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventBus({} handlers)", self.handler_count())
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn emit(&self, event: EditorEvent) {
        log::trace!("emit {:?}", event);
        self.handlers
            .borrow_mut()
            .iter_mut()
            .for_each(|handler| handler.handle_event(&event));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}
