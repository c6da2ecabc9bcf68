//! Service graph construction.
//!
//! All mutable state lives behind these explicitly constructed services;
//! consumers receive references instead of looking anything up ambiently.

use std::sync::Arc;

use anyhow::Result;

use crate::api::{DonationsApi, ReportsApi, RequestsApi, UsersApi};
use crate::config::Config;
use crate::http::{HttpClient, ReqwestBackend};
use crate::hub::EventHub;
use crate::notifications::NotificationFeed;
use crate::realtime::transport::WsTransport;
use crate::realtime::RealtimeService;
use crate::session::SessionService;
use crate::storage::FileTokenStore;

/// The wired-up client: one of each service, sharing one HTTP client and
/// one event hub.
#[derive(Clone)]
pub struct Services {
    pub hub: EventHub,
    pub session: SessionService,
    pub realtime: RealtimeService,
    pub feed: NotificationFeed,
    pub users: UsersApi,
    pub requests: RequestsApi,
    pub donations: DonationsApi,
    pub reports: ReportsApi,
}

impl Services {
    /// Build the full graph from configuration.
    pub fn init(config: &Config) -> Result<Self> {
        let hub = EventHub::new();
        let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
        let backend = Arc::new(ReqwestBackend::new()?);
        let http = HttpClient::new(backend, config.api_url.clone(), store, hub.clone());

        let session = SessionService::new(http.clone(), hub.clone());
        let feed = NotificationFeed::new();
        let realtime = RealtimeService::new(
            config.socket_url.clone(),
            config.poll_interval,
            Arc::new(WsTransport),
            http.clone(),
            hub.clone(),
            feed.clone(),
            session.subscribe(),
        );

        Ok(Self {
            users: UsersApi::new(http.clone()),
            requests: RequestsApi::new(http.clone()),
            donations: DonationsApi::new(http.clone()),
            reports: ReportsApi::new(http),
            hub,
            session,
            realtime,
            feed,
        })
    }

    /// Spawn the background tasks (forced-logout listener, channel driver)
    /// and attempt the silent session restore.
    pub async fn start(&self) {
        self.session.start();
        self.realtime.start();
        self.session.restore().await;
    }
}
