//! Full-flow test across the wired services: login brings the realtime
//! channel up, pushes land in the feed, logout tears everything down.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use client_core::http::HttpClient;
use client_core::hub::{EventHub, ToastLevel};
use client_core::notifications::NotificationFeed;
use client_core::realtime::protocol::ServerEvent;
use client_core::realtime::RealtimeService;
use client_core::session::{SessionService, SessionState};
use client_core::testing::{user_fixture, MemoryTokenStore, MockHttpBackend, MockSocketTransport};
use client_core::types::{LoginCredentials, Notification, NotificationPriority, Role};
use serde_json::json;
use uuid::Uuid;

struct World {
    session: SessionService,
    realtime: RealtimeService,
    hub: EventHub,
    feed: NotificationFeed,
    store: Arc<MemoryTokenStore>,
    transport: MockSocketTransport,
}

fn wire(backend: MockHttpBackend, transport: MockSocketTransport) -> World {
    let store = Arc::new(MemoryTokenStore::new());
    let hub = EventHub::new();
    let http = HttpClient::new(
        Arc::new(backend),
        "http://api.test",
        store.clone(),
        hub.clone(),
    );
    let session = SessionService::new(http.clone(), hub.clone());
    let feed = NotificationFeed::new();
    let realtime = RealtimeService::new(
        "ws://api.test/socket",
        Duration::from_secs(20),
        Arc::new(transport.clone()),
        http,
        hub.clone(),
        feed.clone(),
        session.subscribe(),
    );

    World {
        session,
        realtime,
        hub,
        feed,
        store,
        transport,
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn login_connects_push_arrives_logout_resets() {
    let user = user_fixture(Role::Donor);
    let backend = MockHttpBackend::new().with_response(
        "POST",
        "/auth/login",
        200,
        json!({ "user": user, "token": "access-1", "refreshToken": "refresh-1" }),
    );
    let world = wire(backend, MockSocketTransport::new());
    let mut toasts = world.hub.subscribe_toasts();

    world.session.start();
    world.realtime.start();

    // Login: state flips, tokens persist, the socket comes up.
    world
        .session
        .login(LoginCredentials {
            email: user.email.clone(),
            password: "hunter2".to_string(),
        })
        .await;

    assert!(world.session.state().is_authenticated());
    assert_eq!(world.store.stored().unwrap().token, "access-1");

    let login_toast = toasts.recv().await.unwrap();
    assert_eq!(login_toast.level, ToastLevel::Success);

    wait_until(|| *world.realtime.connection_status().borrow()).await;
    assert_eq!(world.transport.connect_count(), 1);

    // A pushed critical notification lands in the feed and toasts.
    world
        .transport
        .push(ServerEvent::NewNotification(Notification {
            id: Uuid::new_v4(),
            title: "O- needed urgently".to_string(),
            message: "Critical request at General Hospital".to_string(),
            kind: "request_match".to_string(),
            priority: NotificationPriority::Critical,
            read: false,
            data: None,
            created_at: Utc::now(),
        }));

    let push_toast = toasts.recv().await.unwrap();
    assert_eq!(push_toast.level, ToastLevel::Error);
    assert_eq!(world.feed.current().unread_count, 1);

    // Logout: session, tokens, channel and feed all reset.
    world.session.logout().await;

    assert_eq!(world.session.state(), SessionState::Unauthenticated);
    assert!(world.store.stored().is_none());
    wait_until(|| !*world.realtime.connection_status().borrow()).await;
    wait_until(|| world.feed.current().notifications.is_empty()).await;
    assert_eq!(world.feed.current().unread_count, 0);
}
