//! In-process pub/sub hub for client-side events.
//!
//! Room topics carry server-pushed events republished by the realtime
//! channel; dedicated channels carry one-shot toasts and navigation
//! redirects. Views subscribe and drop the receiver to unsubscribe.
//!
//! # Usage
//!
//! Producers (realtime channel, session service):
//!   hub.publish("request:abc-123", event).await;
//!   hub.toast(ToastLevel::Success, "Welcome back, Ada!");
//!
//! Consumers (views):
//!   let rx = hub.subscribe("request:abc-123").await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::realtime::protocol::ServerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// One-shot dismissable user-visible message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Navigation side effect emitted by the session service; the view layer
/// owns the actual routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Dashboard,
    AdminHome,
    Login,
}

/// Topic for updates about a single blood request.
pub fn request_topic(id: &Uuid) -> String {
    format!("request:{}", id)
}

/// Topic for presence/status updates about a single user.
pub fn user_topic(id: &Uuid) -> String {
    format!("user:{}", id)
}

/// Topic-keyed hub plus the two fixed side-effect channels.
///
/// Thread-safe, cloneable.
#[derive(Clone)]
pub struct EventHub {
    rooms: Arc<RwLock<HashMap<String, broadcast::Sender<ServerEvent>>>>,
    toasts: broadcast::Sender<Toast>,
    redirects: broadcast::Sender<Redirect>,
    capacity: usize,
}

impl EventHub {
    /// Create a hub with default capacity (64 events per channel).
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            toasts: broadcast::channel(capacity).0,
            redirects: broadcast::channel(capacity).0,
            capacity,
        }
    }

    /// Publish an event to a room topic. No-op if nobody is subscribed.
    pub async fn publish(&self, topic: &str, event: ServerEvent) {
        let rooms = self.rooms.read().await;
        if let Some(tx) = rooms.get(topic) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(event);
        }
    }

    /// Subscribe to a room topic. Creates the channel if it doesn't exist.
    /// Dropping the receiver unsubscribes.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<ServerEvent> {
        let mut rooms = self.rooms.write().await;
        let tx = rooms
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Emit a one-shot toast.
    pub fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        let _ = self.toasts.send(Toast {
            level,
            message: message.into(),
        });
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.toasts.subscribe()
    }

    /// Emit a navigation redirect.
    pub fn redirect(&self, target: Redirect) {
        let _ = self.redirects.send(target);
    }

    pub fn subscribe_redirects(&self) -> broadcast::Receiver<Redirect> {
        self.redirects.subscribe()
    }

    /// Remove room topics with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut rooms = self.rooms.write().await;
        rooms.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ServerEvent {
        ServerEvent::UserStatusUpdate {
            user_id: Uuid::new_v4(),
            online: true,
        }
    }

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe("request:abc").await;

        let event = sample_event();
        hub.publish("request:abc", event.clone()).await;

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_publish_no_subscribers_is_noop() {
        let hub = EventHub::new();
        // Should not panic
        hub.publish("nobody:listening", sample_event()).await;
    }

    #[tokio::test]
    async fn test_cleanup_removes_empty_rooms() {
        let hub = EventHub::new();
        let rx = hub.subscribe("ephemeral").await;

        assert_eq!(hub.rooms.read().await.len(), 1);

        drop(rx);
        hub.cleanup().await;

        assert_eq!(hub.rooms.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_toasts_reach_all_subscribers() {
        let hub = EventHub::new();
        let mut rx1 = hub.subscribe_toasts();
        let mut rx2 = hub.subscribe_toasts();

        hub.toast(ToastLevel::Success, "saved");

        assert_eq!(rx1.recv().await.unwrap().message, "saved");
        assert_eq!(rx2.recv().await.unwrap().level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn test_redirect_channel() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe_redirects();

        hub.redirect(Redirect::AdminHome);

        assert_eq!(rx.recv().await.unwrap(), Redirect::AdminHome);
    }
}
