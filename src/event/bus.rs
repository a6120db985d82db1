use std::cell::RefCell;
use uuid::Uuid;

use crate::event::{EventHandler, SessionEvent};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

/// A simple event bus for broadcasting session events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Box<dyn EventHandler>)>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Remove a handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: SessionEvent) {
        for (_, handler) in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_unsubscribed_handler_stops_receiving() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = bus.subscribe(Box::new(move |event: &SessionEvent| {
            sink.lock().unwrap().push(event.clone());
        }));

        bus.emit(SessionEvent::Undone);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(SessionEvent::Redone);

        assert_eq!(*seen.lock().unwrap(), vec![SessionEvent::Undone]);
        assert!(bus.is_empty());
    }
}
