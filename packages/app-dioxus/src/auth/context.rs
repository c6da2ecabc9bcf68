//! Authentication context provider
//!
//! Mirrors the SDK's session watch channel into signals so route guards and
//! pages can react to it. All mutations go through the session service;
//! this context is read-only state.

use client_core::session::SessionState;
use client_core::types::{Role, User};
use dioxus::prelude::*;

use crate::services;

/// Authentication context that provides session state to the entire app
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// Current session state, mirrored from the SDK
    pub state: Signal<SessionState>,
    /// Whether the silent session restore is still in flight
    pub restoring: Signal<bool>,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.role.is_admin()).unwrap_or(false)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.user().map(|u| roles.contains(&u.role)).unwrap_or(false)
    }

    pub fn is_verified(&self) -> bool {
        self.user().map(|u| u.is_fully_verified()).unwrap_or(false)
    }

    /// Message of the last failed auth attempt, if the session is in the
    /// error state.
    pub fn error_message(&self) -> Option<String> {
        match &*self.state.read() {
            SessionState::Error { message } => Some(message.clone()),
            _ => None,
        }
    }
}

/// Auth provider component that wraps the app
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut state = use_signal(|| SessionState::Unauthenticated);
    let mut restoring = use_signal(|| true);

    use_context_provider(|| AuthContext { state, restoring });

    // Start the background services, run the silent restore, then keep the
    // signal in lockstep with the SDK's watch channel.
    use_effect(move || {
        spawn(async move {
            let services = services();
            services.start().await;
            restoring.set(false);

            let mut rx = services.session.subscribe();
            loop {
                let current = rx.borrow_and_update().clone();
                state.set(current);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    });

    children
}

/// Hook to access the auth context
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
}
