//! Auth session state machine and service.
//!
//! State transitions are a pure function over a tagged union; the service
//! around it does the IO and feeds outcomes back in as events. Mutation
//! operations never return errors to the caller — outcomes land in the
//! observable state plus one-shot toasts, and callers watch the state
//! channel rather than awaiting a thrown value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::api::{AuthApi, UsersApi};
use crate::error::ApiError;
use crate::http::{AuthSignal, HttpClient};
use crate::hub::{EventHub, Redirect, ToastLevel};
use crate::types::{LoginCredentials, NewUser, Role, TokenPair, UpdateProfile, User};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No session, no pending work.
    Unauthenticated,
    /// A stored token exists; waiting for the server to confirm identity.
    Restoring,
    Authenticated { user: User },
    /// A failed attempt, with the user-facing message. Retriable: a new
    /// login simply overwrites it.
    Error { message: String },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user } => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    RestoreStarted,
    RestoreSucceeded { user: User },
    RestoreFailed,
    LoginSucceeded { user: User },
    LoginFailed { message: String },
    LoggedOut,
    ProfileUpdated { user: User },
}

/// Pure transition function. Events that make no sense in the current state
/// leave it unchanged.
pub fn transition(state: &SessionState, event: &SessionEvent) -> SessionState {
    match (state, event) {
        (SessionState::Unauthenticated, SessionEvent::RestoreStarted) => SessionState::Restoring,

        (SessionState::Restoring, SessionEvent::RestoreSucceeded { user }) => {
            SessionState::Authenticated { user: user.clone() }
        }
        (SessionState::Restoring, SessionEvent::RestoreFailed) => SessionState::Unauthenticated,

        // Login succeeds from anywhere except an in-flight restore; a
        // repeat login while authenticated just replaces the cached user.
        (SessionState::Restoring, SessionEvent::LoginSucceeded { .. }) => state.clone(),
        (_, SessionEvent::LoginSucceeded { user }) => {
            SessionState::Authenticated { user: user.clone() }
        }

        // A failed login never tears down an established session.
        (SessionState::Authenticated { .. }, SessionEvent::LoginFailed { .. }) => state.clone(),
        (_, SessionEvent::LoginFailed { message }) => SessionState::Error {
            message: message.clone(),
        },

        (_, SessionEvent::LoggedOut) => SessionState::Unauthenticated,

        (SessionState::Authenticated { .. }, SessionEvent::ProfileUpdated { user }) => {
            SessionState::Authenticated { user: user.clone() }
        }

        _ => state.clone(),
    }
}

/// Owns the session state and runs the auth operations against the API.
///
/// Cloneable; clones share state.
#[derive(Clone)]
pub struct SessionService {
    http: HttpClient,
    auth: AuthApi,
    users: UsersApi,
    hub: EventHub,
    state: Arc<watch::Sender<SessionState>>,
    /// Bumped on logout. Async outcomes started under an older epoch are
    /// dropped instead of being applied to the fresh session.
    epoch: Arc<AtomicU64>,
}

impl SessionService {
    pub fn new(http: HttpClient, hub: EventHub) -> Self {
        Self {
            auth: AuthApi::new(http.clone()),
            users: UsersApi::new(http.clone()),
            http,
            hub,
            state: Arc::new(watch::channel(SessionState::Unauthenticated).0),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn the listener for forced logouts raised by the HTTP layer.
    pub fn start(&self) {
        let svc = self.clone();
        let mut rx = self.http.subscribe_auth_signals();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(AuthSignal::SessionExpired) => {
                        if svc.state().is_authenticated() {
                            svc.bump_epoch();
                            svc.apply(SessionEvent::LoggedOut);
                            svc.hub
                                .toast(ToastLevel::Error, ApiError::SessionExpired.user_message());
                            svc.hub.redirect(Redirect::Login);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    /// True when the authenticated user's role is one of `roles`.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        match self.current_user() {
            Some(user) => roles.contains(&user.role),
            None => false,
        }
    }

    /// Email, phone and medical verification must all hold.
    pub fn is_verified(&self) -> bool {
        self.current_user()
            .map(|u| u.is_fully_verified())
            .unwrap_or(false)
    }

    /// Silent session restore from the durable token pair.
    pub async fn restore(&self) {
        let epoch = self.current_epoch();

        match self.http.load_persisted().await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored tokens");
                return;
            }
        }

        self.apply(SessionEvent::RestoreStarted);

        match self.auth.me().await {
            Ok(user) => {
                if self.epoch_is(epoch) {
                    tracing::debug!(user = %user.id, "session restored");
                    self.apply(SessionEvent::RestoreSucceeded { user });
                }
            }
            Err(e) => {
                if self.epoch_is(epoch) {
                    tracing::info!(error = %e, "session restore rejected");
                    self.http.clear_tokens().await;
                    self.apply(SessionEvent::RestoreFailed);
                }
            }
        }
    }

    /// Attempt a login. The outcome is observable on the state channel.
    pub async fn login(&self, credentials: LoginCredentials) {
        let epoch = self.current_epoch();
        let outcome = self.auth.login(&credentials).await;
        self.complete_auth(epoch, outcome, "Welcome back").await;
    }

    /// Register a new account; tokens come straight from the registration
    /// response, no separate login step.
    pub async fn register(&self, user: NewUser) {
        let epoch = self.current_epoch();
        let outcome = self.auth.register(&user).await;
        self.complete_auth(epoch, outcome, "Welcome").await;
    }

    /// Clear the local session immediately; the remote call is fired after
    /// the fact and its outcome is irrelevant to the caller.
    pub async fn logout(&self) {
        let bearer = self.http.current_token().await;
        self.bump_epoch();
        self.http.clear_tokens().await;
        self.apply(SessionEvent::LoggedOut);
        self.hub.redirect(Redirect::Login);

        let auth = self.auth.clone();
        tokio::spawn(async move {
            if let Err(e) = auth.logout_with(bearer).await {
                tracing::debug!(error = %e, "remote logout failed");
            }
        });
    }

    /// Replace the cached user with the server's version on success.
    pub async fn update_profile(&self, update: UpdateProfile) {
        if !self.state().is_authenticated() {
            return;
        }
        let epoch = self.current_epoch();

        match self.users.update_me(&update).await {
            Ok(user) => {
                if self.epoch_is(epoch) {
                    self.hub.toast(ToastLevel::Success, "Profile updated");
                    self.apply(SessionEvent::ProfileUpdated { user });
                }
            }
            Err(e) => {
                // The HTTP layer already toasted transport-class failures.
                tracing::warn!(error = %e, "profile update failed");
            }
        }
    }

    async fn complete_auth(
        &self,
        epoch: u64,
        outcome: Result<crate::types::AuthResponse, ApiError>,
        greeting: &str,
    ) {
        match outcome {
            Ok(auth) => {
                if !self.epoch_is(epoch) {
                    tracing::debug!("dropping auth outcome from a previous session");
                    return;
                }
                self.http
                    .set_tokens(TokenPair {
                        token: auth.token,
                        refresh_token: auth.refresh_token,
                    })
                    .await;
                self.hub.toast(
                    ToastLevel::Success,
                    format!("{}, {}!", greeting, auth.user.first_name),
                );
                self.hub.redirect(if auth.user.role.is_admin() {
                    Redirect::AdminHome
                } else {
                    Redirect::Dashboard
                });
                self.apply(SessionEvent::LoginSucceeded { user: auth.user });
            }
            Err(e) => {
                if !self.epoch_is(epoch) {
                    return;
                }
                let message = e.user_message();
                if matches!(e, ApiError::Unauthorized) {
                    // Transport-class failures were already toasted by the
                    // HTTP layer; bad credentials are ours to announce.
                    self.hub.toast(ToastLevel::Error, message.clone());
                }
                self.apply(SessionEvent::LoginFailed { message });
            }
        }
    }

    fn apply(&self, event: SessionEvent) {
        self.state.send_modify(|state| {
            let next = transition(state, &event);
            *state = next;
        });
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn epoch_is(&self, epoch: u64) -> bool {
        self.current_epoch() == epoch
    }

    fn bump_epoch(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user_fixture, MemoryTokenStore, MockHttpBackend};
    use serde_json::json;
    use std::time::Duration;

    fn auth_body(user: &User, token: &str, refresh: &str) -> serde_json::Value {
        json!({
            "user": user,
            "token": token,
            "refreshToken": refresh,
        })
    }

    fn service_with(
        backend: MockHttpBackend,
    ) -> (SessionService, Arc<MemoryTokenStore>, EventHub) {
        let store = Arc::new(MemoryTokenStore::new());
        let hub = EventHub::new();
        let http = HttpClient::new(
            Arc::new(backend),
            "http://api.test",
            store.clone(),
            hub.clone(),
        );
        (SessionService::new(http, hub.clone()), store, hub)
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials {
            email: "ada@example.org".to_string(),
            password: "hunter2".to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Pure transition function
    // ------------------------------------------------------------------

    #[test]
    fn transition_restore_cycle() {
        let user = user_fixture(Role::Donor);

        let s = transition(&SessionState::Unauthenticated, &SessionEvent::RestoreStarted);
        assert_eq!(s, SessionState::Restoring);

        let s = transition(&s, &SessionEvent::RestoreSucceeded { user: user.clone() });
        assert_eq!(s, SessionState::Authenticated { user });

        let s = transition(&SessionState::Restoring, &SessionEvent::RestoreFailed);
        assert_eq!(s, SessionState::Unauthenticated);
    }

    #[test]
    fn transition_error_state_is_retriable() {
        let user = user_fixture(Role::Recipient);
        let error = SessionState::Error {
            message: "Invalid email or password".to_string(),
        };

        let s = transition(&error, &SessionEvent::LoginSucceeded { user: user.clone() });
        assert_eq!(s, SessionState::Authenticated { user });
    }

    #[test]
    fn transition_failed_login_does_not_kill_a_session() {
        let user = user_fixture(Role::Donor);
        let authed = SessionState::Authenticated { user };

        let s = transition(
            &authed,
            &SessionEvent::LoginFailed {
                message: "nope".to_string(),
            },
        );
        assert_eq!(s, authed);
    }

    #[test]
    fn transition_profile_update_requires_authentication() {
        let user = user_fixture(Role::Donor);
        let s = transition(
            &SessionState::Unauthenticated,
            &SessionEvent::ProfileUpdated { user },
        );
        assert_eq!(s, SessionState::Unauthenticated);
    }

    // ------------------------------------------------------------------
    // Service flows
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn login_success_persists_tokens_and_redirects() {
        let user = user_fixture(Role::Donor);
        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/login",
            200,
            auth_body(&user, "access-1", "refresh-1"),
        );
        let (svc, store, hub) = service_with(backend);
        let mut toasts = hub.subscribe_toasts();
        let mut redirects = hub.subscribe_redirects();

        svc.login(credentials()).await;

        assert_eq!(svc.state(), SessionState::Authenticated { user: user.clone() });
        assert_eq!(store.stored().unwrap().token, "access-1");

        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert!(toast.message.contains(&user.first_name));

        assert_eq!(redirects.recv().await.unwrap(), Redirect::Dashboard);
    }

    #[tokio::test]
    async fn admin_login_redirects_to_admin_home() {
        let user = user_fixture(Role::SystemAdmin);
        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/login",
            200,
            auth_body(&user, "access-1", "refresh-1"),
        );
        let (svc, _store, hub) = service_with(backend);
        let mut redirects = hub.subscribe_redirects();

        svc.login(credentials()).await;

        assert_eq!(redirects.recv().await.unwrap(), Redirect::AdminHome);
    }

    #[tokio::test]
    async fn bad_credentials_produce_error_state_and_one_toast() {
        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/login",
            401,
            json!({ "message": "bad credentials" }),
        );
        let (svc, store, hub) = service_with(backend);
        let mut toasts = hub.subscribe_toasts();

        svc.login(credentials()).await;

        assert_eq!(
            svc.state(),
            SessionState::Error {
                message: "Invalid email or password".to_string()
            }
        );
        assert!(store.stored().is_none());

        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toasts.try_recv().is_err(), "exactly one toast expected");
    }

    #[tokio::test]
    async fn register_provisions_tokens_directly() {
        let user = user_fixture(Role::Donor);
        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/register",
            201,
            auth_body(&user, "access-9", "refresh-9"),
        );
        let (svc, store, _hub) = service_with(backend);

        svc.register(NewUser {
            email: user.email.clone(),
            password: "hunter2".to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: Role::Donor,
            blood_type: None,
            phone: None,
            city: None,
        })
        .await;

        assert!(svc.state().is_authenticated());
        assert_eq!(store.stored().unwrap().token, "access-9");
    }

    #[tokio::test]
    async fn logout_clears_local_state_synchronously() {
        let user = user_fixture(Role::Donor);
        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/login",
            200,
            auth_body(&user, "access-1", "refresh-1"),
        );
        let (svc, store, _hub) = service_with(backend);

        svc.login(credentials()).await;
        assert!(svc.state().is_authenticated());

        // The remote logout endpoint isn't even scripted: its failure must
        // not affect the local transition.
        svc.logout().await;
        assert_eq!(svc.state(), SessionState::Unauthenticated);
        assert!(store.stored().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_login_outcome_is_dropped_after_logout() {
        let user = user_fixture(Role::Donor);
        let backend = MockHttpBackend::new().with_delayed_response(
            "POST",
            "/auth/login",
            200,
            auth_body(&user, "late-access", "late-refresh"),
            Duration::from_millis(200),
        );
        let (svc, store, _hub) = service_with(backend);

        let login = tokio::spawn({
            let svc = svc.clone();
            async move { svc.login(credentials()).await }
        });

        // Let the login task reach its in-flight await, then log out.
        tokio::task::yield_now().await;
        svc.logout().await;

        login.await.unwrap();

        // The late success must not resurrect the session.
        assert_eq!(svc.state(), SessionState::Unauthenticated);
        assert!(store.stored().is_none());
    }

    #[tokio::test]
    async fn restore_confirms_identity_with_the_server() {
        let user = user_fixture(Role::Recipient);
        let backend = MockHttpBackend::new().with_response(
            "GET",
            "/auth/me",
            200,
            json!({ "user": user }),
        );
        let (svc, store, _hub) = service_with(backend);
        store.seed(TokenPair {
            token: "stored-access".to_string(),
            refresh_token: "stored-refresh".to_string(),
        });

        svc.restore().await;

        assert_eq!(svc.state(), SessionState::Authenticated { user });
    }

    #[tokio::test]
    async fn restore_without_stored_tokens_stays_unauthenticated() {
        let backend = MockHttpBackend::new();
        let (svc, _store, _hub) = service_with(backend.clone());

        svc.restore().await;

        assert_eq!(svc.state(), SessionState::Unauthenticated);
        assert_eq!(backend.calls().len(), 0, "no network traffic expected");
    }

    #[tokio::test]
    async fn rejected_restore_clears_tokens() {
        // /auth/me 401s, the refresh 401s too: the stored session is dead.
        let backend = MockHttpBackend::new()
            .with_response("GET", "/auth/me", 401, serde_json::Value::Null)
            .with_response("POST", "/auth/refresh", 401, serde_json::Value::Null);
        let (svc, store, _hub) = service_with(backend);
        store.seed(TokenPair {
            token: "dead-access".to_string(),
            refresh_token: "dead-refresh".to_string(),
        });

        svc.restore().await;

        assert_eq!(svc.state(), SessionState::Unauthenticated);
        assert!(store.stored().is_none());
    }

    #[tokio::test]
    async fn login_logout_login_keeps_only_the_last_outcome() {
        let first = user_fixture(Role::Donor);
        let second = user_fixture(Role::Recipient);
        let backend = MockHttpBackend::new()
            .with_response("POST", "/auth/login", 200, auth_body(&first, "a1", "r1"))
            .with_response("POST", "/auth/login", 200, auth_body(&second, "a2", "r2"));
        let (svc, store, _hub) = service_with(backend);

        svc.login(credentials()).await;
        svc.logout().await;
        svc.login(credentials()).await;

        assert_eq!(svc.state(), SessionState::Authenticated { user: second });
        assert_eq!(store.stored().unwrap().token, "a2");
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn has_role_is_false_when_unauthenticated() {
        let (svc, _store, _hub) = service_with(MockHttpBackend::new());
        assert!(!svc.has_role(&[Role::SystemAdmin]));
    }

    #[tokio::test]
    async fn has_role_requires_exact_membership() {
        let user = user_fixture(Role::MedicalAdmin);
        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/login",
            200,
            auth_body(&user, "a", "r"),
        );
        let (svc, _store, _hub) = service_with(backend);
        svc.login(credentials()).await;

        assert!(!svc.has_role(&[Role::SystemAdmin]));
        assert!(svc.has_role(&[Role::SystemAdmin, Role::MedicalAdmin]));
    }

    #[tokio::test]
    async fn is_verified_requires_all_three_flags() {
        let mut user = user_fixture(Role::Donor);
        user.email_verified = true;
        user.phone_verified = true;
        user.medical_verified = false;

        let backend = MockHttpBackend::new().with_response(
            "POST",
            "/auth/login",
            200,
            auth_body(&user, "a", "r"),
        );
        let (svc, _store, _hub) = service_with(backend);
        svc.login(credentials()).await;

        assert!(!svc.is_verified());
    }
}
