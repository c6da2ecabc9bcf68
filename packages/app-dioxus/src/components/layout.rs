//! Route layouts: the app shell and the auth/admin guards.

use client_core::hub::Redirect as RedirectTarget;
use dioxus::prelude::*;
use tokio::sync::broadcast::error::RecvError;

use crate::auth::use_auth;
use crate::components::{AdminNav, LoadingSpinner, NavBar, ToastHost};
use crate::routes::Route;
use crate::services;

/// Outermost layout: hosts the toast overlay and applies the navigation
/// side effects the session service emits.
#[component]
pub fn Shell() -> Element {
    let navigator = use_navigator();

    use_effect(move || {
        spawn(async move {
            let mut rx = services().hub.subscribe_redirects();
            loop {
                match rx.recv().await {
                    Ok(target) => {
                        let route = match target {
                            RedirectTarget::Dashboard => Route::Dashboard {},
                            RedirectTarget::AdminHome => Route::AdminDashboard {},
                            RedirectTarget::Login => Route::Login {},
                        };
                        navigator.push(route);
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    });

    rsx! {
        div {
            class: "min-h-screen bg-stone-50 text-stone-900",
            ToastHost {}
            Outlet::<Route> {}
        }
    }
}

/// Layout guard for authenticated routes.
#[component]
pub fn RequireAuth() -> Element {
    let auth = use_auth();

    // Hold rendering until the silent restore has settled.
    if *auth.restoring.read() {
        return rsx! {
            div {
                class: "min-h-screen flex items-center justify-center",
                LoadingSpinner {}
            }
        };
    }

    if !auth.is_authenticated() {
        return rsx! {
            Redirect { to: Route::Login {} }
        };
    }

    rsx! {
        div {
            NavBar {}
            main {
                class: "p-6 max-w-5xl mx-auto",
                Outlet::<Route> {}
            }
        }
    }
}

/// Layout guard for admin routes.
#[component]
pub fn RequireAdmin() -> Element {
    let auth = use_auth();

    if !auth.is_admin() {
        return rsx! {
            Redirect { to: Route::Dashboard {} }
        };
    }

    rsx! {
        AdminNav {}
        Outlet::<Route> {}
    }
}
