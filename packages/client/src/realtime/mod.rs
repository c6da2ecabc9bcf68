//! Realtime notification channel.
//!
//! Holds a live socket while the session is authenticated and mirrors
//! server-pushed notification events into the local feed, with a fixed
//! 20-second polling fallback for when the socket is down. Connection
//! attempts are budgeted by the pure [`machine::RealtimeMachine`]; when the
//! budget runs out the channel degrades silently to polling and a status
//! flag — no user-facing error.

pub mod machine;
pub mod protocol;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::api::NotificationsApi;
use crate::http::HttpClient;
use crate::hub::{request_topic, user_topic, EventHub, ToastLevel};
use crate::notifications::NotificationFeed;
use crate::session::SessionState;
use crate::types::NotificationPriority;

use machine::{ChannelCommand, ChannelEvent, RealtimeMachine};
use protocol::{ClientEvent, ServerEvent};
use transport::{BaseSocketTransport, SocketPair, SocketSink, SocketStream};

/// Pause between connection attempts within one session.
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Page size for the polling fallback.
const POLL_PAGE_LIMIT: u32 = 50;

enum ConnectionEnd {
    StreamClosed,
    SessionEnded,
}

/// Owns the socket lifecycle and the notification feed.
///
/// Cloneable; clones share state.
#[derive(Clone)]
pub struct RealtimeService {
    socket_url: String,
    poll_interval: Duration,
    transport: Arc<dyn BaseSocketTransport>,
    http: HttpClient,
    api: NotificationsApi,
    hub: EventHub,
    feed: NotificationFeed,
    session_rx: watch::Receiver<SessionState>,
    connected: Arc<watch::Sender<bool>>,
    outgoing: Arc<Mutex<Option<mpsc::Sender<ClientEvent>>>>,
}

impl RealtimeService {
    pub fn new(
        socket_url: impl Into<String>,
        poll_interval: Duration,
        transport: Arc<dyn BaseSocketTransport>,
        http: HttpClient,
        hub: EventHub,
        feed: NotificationFeed,
        session_rx: watch::Receiver<SessionState>,
    ) -> Self {
        Self {
            socket_url: socket_url.into(),
            poll_interval,
            api: NotificationsApi::new(http.clone()),
            transport,
            http,
            hub,
            feed,
            session_rx,
            connected: Arc::new(watch::channel(false).0),
            outgoing: Arc::new(Mutex::new(None)),
        }
    }

    /// Live connection flag; drives the status indicator in the UI.
    pub fn connection_status(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    /// Spawn the channel driver. One task per service instance.
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let svc = self.clone();
        tokio::spawn(async move { svc.run().await })
    }

    /// Subscribe to updates about one blood request, joining its room.
    /// Dropping the receiver unsubscribes locally; pair with
    /// [`Self::leave_request_room`] to tell the server.
    pub async fn join_request_room(&self, request_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.emit(ClientEvent::JoinRequestRoom { request_id }).await;
        self.hub.subscribe(&request_topic(&request_id)).await
    }

    pub async fn leave_request_room(&self, request_id: Uuid) {
        self.emit(ClientEvent::LeaveRequestRoom { request_id }).await;
    }

    /// Follow a request's status without joining its chatter room.
    pub async fn subscribe_blood_request(&self, request_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.emit(ClientEvent::SubscribeBloodRequest { request_id })
            .await;
        self.hub.subscribe(&request_topic(&request_id)).await
    }

    /// Presence/status updates for a single user.
    pub async fn subscribe_user_status(&self, user_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.hub.subscribe(&user_topic(&user_id)).await
    }

    pub async fn typing(&self, room: impl Into<String>) {
        self.emit(ClientEvent::Typing { room: room.into() }).await;
    }

    /// Optimistically mark one notification read, then tell the server —
    /// over the socket when connected, over REST otherwise. Remote failures
    /// are logged, never surfaced.
    pub async fn mark_read(&self, notification_id: Uuid) {
        self.feed.mark_read(notification_id);
        if !self
            .emit(ClientEvent::MarkNotificationRead { notification_id })
            .await
        {
            if let Err(e) = self.api.mark_read(notification_id).await {
                tracing::debug!(error = %e, "mark-read fallback failed");
            }
        }
    }

    /// Optimistically mark everything read. Idempotent.
    pub async fn mark_all_read(&self) {
        self.feed.mark_all_read();
        if !self.emit(ClientEvent::MarkAllNotificationsRead).await {
            if let Err(e) = self.api.mark_all_read().await {
                tracing::debug!(error = %e, "mark-all-read fallback failed");
            }
        }
    }

    /// Queue an event for the socket. False when the channel is down, in
    /// which case callers fall back to REST or drop the event.
    async fn emit(&self, event: ClientEvent) -> bool {
        if !*self.connected.borrow() {
            return false;
        }
        let outgoing = self.outgoing.lock().await;
        match outgoing.as_ref() {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    async fn run(&self) {
        let mut session_rx = self.session_rx.clone();
        loop {
            // Wait for an authenticated session.
            let user_id = loop {
                let current = session_rx.borrow_and_update().clone();
                if let SessionState::Authenticated { user } = current {
                    break user.id;
                }
                if session_rx.changed().await.is_err() {
                    return;
                }
            };

            self.run_authenticated(&mut session_rx, user_id).await;

            // Logout: drop the local mirror and any dangling room channels.
            let _ = self.connected.send(false);
            self.feed.reset();
            self.hub.cleanup().await;
        }
    }

    /// Drive the channel for the lifetime of one authenticated session.
    async fn run_authenticated(
        &self,
        session_rx: &mut watch::Receiver<SessionState>,
        user_id: Uuid,
    ) {
        let mut machine = RealtimeMachine::new();
        let (out_tx, mut out_rx) = mpsc::channel::<ClientEvent>(64);
        *self.outgoing.lock().await = Some(out_tx);

        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        'session: loop {
            // Open a socket while the attempt budget allows.
            let mut pair: Option<SocketPair> = None;
            while pair.is_none() {
                match machine.decide(&ChannelEvent::ConnectRequested) {
                    Some(ChannelCommand::OpenSocket { attempt }) => {
                        let token = match self.http.current_token().await {
                            Some(token) => token,
                            None => break,
                        };
                        match self.transport.connect(&self.socket_url, &token).await {
                            Ok(p) => {
                                machine.decide(&ChannelEvent::Opened);
                                tracing::debug!(attempt, "realtime channel connected");
                                pair = Some(p);
                            }
                            Err(e) => {
                                machine.decide(&ChannelEvent::ConnectFailed);
                                tracing::warn!(attempt, error = %e, "realtime connect failed");
                                tokio::select! {
                                    _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                                    res = session_rx.changed() => {
                                        if res.is_err() || !session_rx.borrow().is_authenticated() {
                                            break 'session;
                                        }
                                    }
                                }
                            }
                        }
                    }
                    _ => break,
                }
            }

            match pair {
                Some(SocketPair {
                    mut sink,
                    mut stream,
                }) => {
                    let _ = self.connected.send(true);
                    if let Err(e) = sink.send(&ClientEvent::JoinUserRoom { user_id }).await {
                        tracing::warn!(error = %e, "failed to join user room");
                    }

                    let end = self
                        .drive_connection(&mut sink, &mut stream, &mut out_rx, &mut poll, session_rx)
                        .await;

                    let _ = self.connected.send(false);
                    if let Err(e) = sink.close().await {
                        tracing::debug!(error = %e, "socket close failed");
                    }

                    match end {
                        ConnectionEnd::SessionEnded => {
                            machine.decide(&ChannelEvent::SessionEnded);
                            break 'session;
                        }
                        ConnectionEnd::StreamClosed => {
                            // Remaining budget governs whether we try again.
                            machine.decide(&ChannelEvent::StreamClosed);
                        }
                    }
                }
                None => {
                    // Attempt budget exhausted: notifications keep flowing
                    // through the poll, the status dot stays grey.
                    tracing::info!("realtime channel unavailable, polling only");
                    loop {
                        tokio::select! {
                            _ = poll.tick() => self.poll_once().await,
                            res = session_rx.changed() => {
                                if res.is_err() || !session_rx.borrow().is_authenticated() {
                                    break 'session;
                                }
                            }
                        }
                    }
                }
            }
        }

        *self.outgoing.lock().await = None;
    }

    async fn drive_connection(
        &self,
        sink: &mut Box<dyn SocketSink>,
        stream: &mut Box<dyn SocketStream>,
        out_rx: &mut mpsc::Receiver<ClientEvent>,
        poll: &mut tokio::time::Interval,
        session_rx: &mut watch::Receiver<SessionState>,
    ) -> ConnectionEnd {
        loop {
            tokio::select! {
                res = session_rx.changed() => {
                    if res.is_err() || !session_rx.borrow().is_authenticated() {
                        return ConnectionEnd::SessionEnded;
                    }
                }
                _ = poll.tick() => self.poll_once().await,
                outgoing = out_rx.recv() => {
                    if let Some(event) = outgoing {
                        if let Err(e) = sink.send(&event).await {
                            tracing::warn!(error = %e, "realtime send failed");
                            return ConnectionEnd::StreamClosed;
                        }
                    }
                }
                incoming = stream.next_event() => {
                    match incoming {
                        Some(Ok(event)) => self.handle_server_event(event).await,
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "realtime stream error");
                            return ConnectionEnd::StreamClosed;
                        }
                        None => return ConnectionEnd::StreamClosed,
                    }
                }
            }
        }
    }

    /// Apply one pushed event, in arrival order.
    async fn handle_server_event(&self, event: ServerEvent) {
        match &event {
            ServerEvent::NewNotification(notification) => {
                self.feed.push(notification.clone());
                let level = if notification.priority == NotificationPriority::Critical {
                    ToastLevel::Error
                } else {
                    ToastLevel::Info
                };
                self.hub.toast(level, notification.title.clone());
                self.hub.publish("notifications", event.clone()).await;
            }
            ServerEvent::BloodRequestUpdate { request_id, .. } => {
                self.hub.publish(&request_topic(request_id), event.clone()).await;
            }
            ServerEvent::DonationUpdate { request_id, .. } => {
                self.hub.publish("donations", event.clone()).await;
                if let Some(request_id) = request_id {
                    self.hub.publish(&request_topic(request_id), event.clone()).await;
                }
            }
            ServerEvent::EmergencyAlert { message, .. } => {
                self.hub.toast(ToastLevel::Error, message.clone());
                self.hub.publish("alerts", event.clone()).await;
            }
            ServerEvent::SystemAnnouncement { message, .. } => {
                self.hub.toast(ToastLevel::Info, message.clone());
                self.hub.publish("announcements", event.clone()).await;
            }
            ServerEvent::UserStatusUpdate { user_id, .. } => {
                self.hub.publish(&user_topic(user_id), event.clone()).await;
            }
        }
    }

    /// One poll tick: replace the mirror with server truth. Failures
    /// degrade silently — the poll is itself the fallback path.
    async fn poll_once(&self) {
        match self.api.page(1, POLL_PAGE_LIMIT).await {
            Ok(page) => self.feed.replace(page),
            Err(e) => tracing::debug!(error = %e, "notification poll failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user_fixture, MemoryTokenStore, MockHttpBackend, MockSocketTransport};
    use crate::types::{Notification, Role, TokenPair};
    use chrono::Utc;
    use serde_json::json;

    struct Harness {
        rt: RealtimeService,
        transport: MockSocketTransport,
        hub: EventHub,
        feed: NotificationFeed,
        session_tx: watch::Sender<SessionState>,
        backend: MockHttpBackend,
    }

    async fn harness(transport: MockSocketTransport, backend: MockHttpBackend) -> Harness {
        let store = Arc::new(MemoryTokenStore::new());
        let hub = EventHub::new();
        let http = HttpClient::new(
            Arc::new(backend.clone()),
            "http://api.test",
            store,
            hub.clone(),
        );
        http.set_tokens(TokenPair {
            token: "socket-access".to_string(),
            refresh_token: "socket-refresh".to_string(),
        })
        .await;

        let feed = NotificationFeed::new();
        let (session_tx, session_rx) = watch::channel(SessionState::Unauthenticated);
        let rt = RealtimeService::new(
            "ws://api.test/socket",
            Duration::from_secs(20),
            Arc::new(transport.clone()),
            http,
            hub.clone(),
            feed.clone(),
            session_rx,
        );

        Harness {
            rt,
            transport,
            hub,
            feed,
            session_tx,
            backend,
        }
    }

    fn authenticated() -> SessionState {
        SessionState::Authenticated {
            user: user_fixture(Role::Donor),
        }
    }

    fn notification(priority: NotificationPriority) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            title: "O- needed at General Hospital".to_string(),
            message: "A critical request matches your blood type".to_string(),
            kind: "request_match".to_string(),
            priority,
            read: false,
            data: None,
            created_at: Utc::now(),
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
    async fn critical_push_prepends_and_toasts_error_styled() {
        let h = harness(MockSocketTransport::new(), MockHttpBackend::new()).await;
        let mut toasts = h.hub.subscribe_toasts();
        h.rt.start();

        h.session_tx.send(authenticated()).unwrap();
        wait_until(|| h.transport.connect_count() == 1).await;
        wait_until(|| *h.rt.connection_status().borrow()).await;

        h.transport
            .push(ServerEvent::NewNotification(notification(
                NotificationPriority::Critical,
            )));

        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, ToastLevel::Error);

        let snapshot = h.feed.current();
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(snapshot.notifications.len(), 1);
        assert!(!snapshot.notifications[0].read);
    }

    #[tokio::test]
    async fn normal_push_toasts_info_styled() {
        let h = harness(MockSocketTransport::new(), MockHttpBackend::new()).await;
        let mut toasts = h.hub.subscribe_toasts();
        h.rt.start();

        h.session_tx.send(authenticated()).unwrap();
        wait_until(|| *h.rt.connection_status().borrow()).await;

        h.transport
            .push(ServerEvent::NewNotification(notification(
                NotificationPriority::Normal,
            )));

        assert_eq!(toasts.recv().await.unwrap().level, ToastLevel::Info);
    }

    #[tokio::test]
    async fn connection_joins_the_user_room() {
        let h = harness(MockSocketTransport::new(), MockHttpBackend::new()).await;
        h.rt.start();
        h.session_tx.send(authenticated()).unwrap();

        wait_until(|| !h.transport.sent_events().is_empty()).await;
        assert!(matches!(
            h.transport.sent_events()[0],
            ClientEvent::JoinUserRoom { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_attempts_are_bounded_per_session() {
        let h = harness(MockSocketTransport::failing(), MockHttpBackend::new()).await;
        h.rt.start();

        h.session_tx.send(authenticated()).unwrap();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(h.transport.connect_count(), 3);
        assert!(!*h.rt.connection_status().borrow());

        // Still no further attempts, no matter how long we wait.
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(h.transport.connect_count(), 3);

        // A logout/login cycle resets the budget.
        h.session_tx.send(SessionState::Unauthenticated).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        h.session_tx.send(authenticated()).unwrap();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(h.transport.connect_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_replaces_the_mirror_when_the_socket_is_down() {
        let backend = MockHttpBackend::new().with_repeated_response(
            "GET",
            "/notifications?page=1&limit=50",
            200,
            json!({
                "notifications": [notification(NotificationPriority::Normal)],
                "unreadCount": 4,
            }),
        );
        let h = harness(MockSocketTransport::failing(), backend).await;
        h.rt.start();

        h.session_tx.send(authenticated()).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let snapshot = h.feed.current();
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.unread_count, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_resets_the_feed() {
        let backend = MockHttpBackend::new().with_repeated_response(
            "GET",
            "/notifications?page=1&limit=50",
            200,
            json!({
                "notifications": [notification(NotificationPriority::Normal)],
                "unreadCount": 4,
            }),
        );
        let h = harness(MockSocketTransport::failing(), backend).await;
        h.rt.start();

        h.session_tx.send(authenticated()).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(h.feed.current().unread_count, 4);

        h.session_tx.send(SessionState::Unauthenticated).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.feed.current().unread_count, 0);
        assert!(h.feed.current().notifications.is_empty());
    }

    #[tokio::test]
    async fn request_room_subscription_receives_updates() {
        let h = harness(MockSocketTransport::new(), MockHttpBackend::new()).await;
        h.rt.start();
        h.session_tx.send(authenticated()).unwrap();
        wait_until(|| *h.rt.connection_status().borrow()).await;

        let request_id = Uuid::new_v4();
        let mut room = h.rt.join_request_room(request_id).await;
        wait_until(|| {
            h.transport
                .sent_events()
                .iter()
                .any(|e| matches!(e, ClientEvent::JoinRequestRoom { request_id: id } if *id == request_id))
        })
        .await;

        h.transport.push(ServerEvent::BloodRequestUpdate {
            request_id,
            status: crate::types::RequestStatus::Matched,
            message: None,
        });

        match room.recv().await.unwrap() {
            ServerEvent::BloodRequestUpdate { request_id: id, .. } => assert_eq!(id, request_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn mark_read_falls_back_to_rest_when_disconnected() {
        let n = notification(NotificationPriority::Normal);
        let id = n.id;
        let backend = MockHttpBackend::new().with_response(
            "POST",
            &format!("/notifications/{}/read", id),
            200,
            serde_json::Value::Null,
        );
        // Service never started: the channel is down by construction.
        let h = harness(MockSocketTransport::new(), backend).await;
        h.feed.push(n);

        h.rt.mark_read(id).await;

        assert_eq!(h.feed.current().unread_count, 0);
        assert_eq!(
            h.backend
                .count_calls("POST", &format!("/notifications/{}/read", id)),
            1
        );
    }

    #[tokio::test]
    async fn mark_all_read_twice_is_idempotent() {
        let backend = MockHttpBackend::new().with_repeated_response(
            "POST",
            "/notifications/read-all",
            200,
            serde_json::Value::Null,
        );
        let h = harness(MockSocketTransport::new(), backend).await;
        h.feed.push(notification(NotificationPriority::Normal));
        h.feed.push(notification(NotificationPriority::High));

        h.rt.mark_all_read().await;
        assert_eq!(h.feed.current().unread_count, 0);
        assert_eq!(h.feed.current().notifications.len(), 2);

        h.rt.mark_all_read().await;
        assert_eq!(h.feed.current().unread_count, 0);
        assert_eq!(h.feed.current().notifications.len(), 2);
    }
}
