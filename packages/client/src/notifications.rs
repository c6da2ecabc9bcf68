//! Local mirror of the user's notification feed.
//!
//! Push events prepend; the polling fallback replaces the list and count
//! wholesale with server truth. Pushed and polled entries are NOT
//! deduplicated against each other — a notification may transiently appear
//! twice between a push and the next poll tick. That is the accepted,
//! documented behavior, not a bug to fix here.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::{Notification, NotificationPage};
use uuid::Uuid;

/// Retained entries. The feed only backs the visible dropdown/page; older
/// history lives server-side.
pub const MAX_FEED_LEN: usize = 100;

/// Point-in-time view of the feed, most-recent-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: u32,
}

/// Mutable feed state behind a watch channel.
///
/// Cloneable; clones share state. Owned by the realtime service — views
/// observe snapshots and never mutate directly.
#[derive(Clone)]
pub struct NotificationFeed {
    state: Arc<watch::Sender<FeedSnapshot>>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::channel(FeedSnapshot::default()).0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.state.subscribe()
    }

    pub fn current(&self) -> FeedSnapshot {
        self.state.borrow().clone()
    }

    /// Prepend a pushed notification and bump the unread count.
    pub fn push(&self, notification: Notification) {
        self.state.send_modify(|feed| {
            feed.notifications.insert(0, notification);
            feed.notifications.truncate(MAX_FEED_LEN);
            feed.unread_count += 1;
        });
    }

    /// Replace list and count with a poll result (server truth).
    pub fn replace(&self, page: NotificationPage) {
        self.state.send_modify(|feed| {
            feed.notifications = page.notifications;
            feed.notifications.truncate(MAX_FEED_LEN);
            feed.unread_count = page.unread_count;
        });
    }

    /// Optimistically mark one entry read. Decrements the unread count only
    /// when the entry was actually unread.
    pub fn mark_read(&self, id: Uuid) {
        self.state.send_modify(|feed| {
            if let Some(n) = feed.notifications.iter_mut().find(|n| n.id == id) {
                if !n.read {
                    n.read = true;
                    feed.unread_count = feed.unread_count.saturating_sub(1);
                }
            }
        });
    }

    /// Optimistically mark everything read. Idempotent.
    pub fn mark_all_read(&self) {
        self.state.send_modify(|feed| {
            for n in &mut feed.notifications {
                n.read = true;
            }
            feed.unread_count = 0;
        });
    }

    /// Drop all local state (logout).
    pub fn reset(&self) {
        self.state.send_modify(|feed| *feed = FeedSnapshot::default());
    }
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationPriority;
    use chrono::Utc;

    fn notification(title: &str, read: bool) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: "body".to_string(),
            kind: "request_match".to_string(),
            priority: NotificationPriority::Normal,
            read,
            data: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn push_prepends_and_increments() {
        let feed = NotificationFeed::new();
        feed.push(notification("first", false));
        feed.push(notification("second", false));

        let snapshot = feed.current();
        assert_eq!(snapshot.notifications[0].title, "second");
        assert_eq!(snapshot.unread_count, 2);
    }

    #[test]
    fn replace_overwrites_with_server_truth() {
        let feed = NotificationFeed::new();
        feed.push(notification("pushed", false));

        feed.replace(NotificationPage {
            notifications: vec![notification("polled", true)],
            unread_count: 7,
        });

        let snapshot = feed.current();
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.notifications[0].title, "polled");
        assert_eq!(snapshot.unread_count, 7);
    }

    #[test]
    fn mark_read_only_decrements_unread_entries() {
        let feed = NotificationFeed::new();
        let n = notification("a", false);
        let id = n.id;
        feed.push(n);

        feed.mark_read(id);
        assert_eq!(feed.current().unread_count, 0);

        // Second mark on an already-read entry changes nothing.
        feed.mark_read(id);
        assert_eq!(feed.current().unread_count, 0);
    }

    #[test]
    fn mark_all_read_is_idempotent() {
        let feed = NotificationFeed::new();
        feed.push(notification("a", false));
        feed.push(notification("b", false));

        feed.mark_all_read();
        let first = feed.current();
        assert_eq!(first.unread_count, 0);
        assert_eq!(first.notifications.len(), 2);

        feed.mark_all_read();
        let second = feed.current();
        assert_eq!(second.unread_count, 0);
        assert_eq!(second.notifications.len(), 2);
        assert!(second.notifications.iter().all(|n| n.read));
    }

    #[test]
    fn feed_is_bounded() {
        let feed = NotificationFeed::new();
        for i in 0..(MAX_FEED_LEN + 20) {
            feed.push(notification(&format!("n{}", i), false));
        }
        assert_eq!(feed.current().notifications.len(), MAX_FEED_LEN);
        // Count still reflects every push; the bound is a display cap.
        assert_eq!(feed.current().unread_count, (MAX_FEED_LEN + 20) as u32);
    }

    #[test]
    fn reset_clears_everything() {
        let feed = NotificationFeed::new();
        feed.push(notification("a", false));
        feed.reset();
        assert_eq!(feed.current(), FeedSnapshot::default());
    }
}
