mod bus;
mod events;
mod toast;

pub use bus::EventBus;
pub use toast::{Toast, ToastHandler, ToastQueue, TOAST_TTL_SECS};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

// Re-export the event types
pub use events::EditorEvent;
pub use events::Notification;
pub use events::NotificationVariant;
