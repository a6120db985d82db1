mod bus;
mod events;

pub use bus::{EventBus, SubscriptionId};
pub use events::SessionEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &SessionEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&SessionEvent) + Send,
{
    fn handle_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}
