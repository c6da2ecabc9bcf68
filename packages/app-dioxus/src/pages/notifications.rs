//! Notification feed page.
//!
//! Renders the SDK's local mirror; mark-read actions are optimistic and the
//! badge updates instantly.

use client_core::notifications::FeedSnapshot;
use client_core::types::{Notification, NotificationPriority};
use dioxus::prelude::*;
use uuid::Uuid;

use crate::services;

#[component]
pub fn NotificationsPage() -> Element {
    let mut snapshot = use_signal(FeedSnapshot::default);

    use_effect(move || {
        spawn(async move {
            let mut rx = services().feed.subscribe();
            loop {
                let current = rx.borrow_and_update().clone();
                snapshot.set(current);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    });

    let handle_mark_all = move |_| {
        spawn(async move {
            services().realtime.mark_all_read().await;
        });
    };

    let current = snapshot();

    rsx! {
        div {
            class: "flex items-center justify-between mb-6",
            h1 { class: "text-2xl font-bold text-stone-900", "Notifications" }
            if current.unread_count > 0 {
                button {
                    class: "text-sm text-red-700 hover:underline",
                    onclick: handle_mark_all,
                    "Mark all as read ({current.unread_count})"
                }
            }
        }

        if current.notifications.is_empty() {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 p-12 text-center",
                p { class: "text-stone-500", "Nothing here yet." }
            }
        } else {
            div {
                class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                for notification in current.notifications {
                    NotificationRow {
                        notification,
                        on_read: move |id: Uuid| {
                            spawn(async move {
                                services().realtime.mark_read(id).await;
                            });
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct NotificationRowProps {
    notification: Notification,
    on_read: EventHandler<Uuid>,
}

#[component]
fn NotificationRow(props: NotificationRowProps) -> Element {
    let n = &props.notification;
    let id = n.id;
    let when = n.created_at.format("%Y-%m-%d %H:%M").to_string();
    let row_class = if n.read {
        "p-4 opacity-60"
    } else {
        "p-4 bg-red-50/40"
    };
    let priority_badge = match n.priority {
        NotificationPriority::Critical => Some("bg-red-100 text-red-700"),
        NotificationPriority::High => Some("bg-amber-100 text-amber-700"),
        _ => None,
    };
    let priority_label = match n.priority {
        NotificationPriority::Critical => "critical",
        NotificationPriority::High => "high",
        NotificationPriority::Normal => "normal",
        NotificationPriority::Low => "low",
    };

    rsx! {
        div {
            class: row_class,
            div {
                class: "flex items-start justify-between gap-3",
                div {
                    class: "flex-1 min-w-0",
                    div {
                        class: "flex items-center gap-2",
                        h3 { class: "text-sm font-medium text-stone-900", "{n.title}" }
                        if let Some(badge) = priority_badge {
                            span { class: "px-1.5 py-0.5 rounded text-xs {badge}", "{priority_label}" }
                        }
                    }
                    p { class: "text-sm text-stone-600 mt-0.5", "{n.message}" }
                    p { class: "text-xs text-stone-400 mt-1", "{when}" }
                }
                if !n.read {
                    button {
                        class: "text-xs text-red-700 hover:underline shrink-0",
                        onclick: move |_| props.on_read.call(id),
                        "Mark read"
                    }
                }
            }
        }
    }
}
