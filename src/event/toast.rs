use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::event::{EditorEvent, EventHandler, Notification, NotificationVariant};

/// How long a toast stays on screen, in seconds
pub const TOAST_TTL_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    /// Time the toast was first shown; stamped by [`ToastQueue::expire`]
    shown_at: Option<f64>,
}

/// Notifications waiting to be shown or currently on screen
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push(Toast {
            id,
            title: notification.title,
            description: notification.description,
            variant: notification.variant,
            shown_at: None,
        });
        id
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Drops toasts that have been visible longer than `ttl` seconds
    pub fn expire(&mut self, now: f64, ttl: f64) {
        for toast in &mut self.toasts {
            toast.shown_at.get_or_insert(now);
        }
        self.toasts
            .retain(|toast| toast.shown_at.is_some_and(|shown| now - shown < ttl));
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Feeds notifications from the event bus into a shared [`ToastQueue`]
pub struct ToastHandler {
    queue: Arc<Mutex<ToastQueue>>,
}

impl ToastHandler {
    pub fn new(queue: Arc<Mutex<ToastQueue>>) -> Self {
        Self { queue }
    }
}

impl EventHandler for ToastHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        if let EditorEvent::Notify(notification) = event {
            self.queue.lock().push(notification.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut queue = ToastQueue::new();
        let a = queue.push(Notification::success("Success", "done"));
        let b = queue.push(Notification::error("Error", "failed"));
        assert_ne!(a, b);

        queue.dismiss(a);
        assert_eq!(queue.toasts().len(), 1);
        assert_eq!(queue.toasts()[0].id, b);
        assert_eq!(queue.toasts()[0].variant, NotificationVariant::Destructive);
    }

    #[test]
    fn test_expire_counts_from_first_display() {
        let mut queue = ToastQueue::new();
        queue.push(Notification::success("Success", "done"));

        queue.expire(100.0, TOAST_TTL_SECS);
        assert_eq!(queue.toasts().len(), 1);
        queue.expire(104.0, TOAST_TTL_SECS);
        assert_eq!(queue.toasts().len(), 1);
        queue.expire(105.5, TOAST_TTL_SECS);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_handler_only_queues_notifications() {
        let queue = Arc::new(Mutex::new(ToastQueue::new()));
        let mut handler = ToastHandler::new(queue.clone());

        handler.handle_event(&EditorEvent::SelectionCleared);
        handler.handle_event(&EditorEvent::Notify(Notification::error("Error", "nope")));

        assert_eq!(queue.lock().toasts().len(), 1);
        assert_eq!(queue.lock().toasts()[0].description, "nope");
    }
}
