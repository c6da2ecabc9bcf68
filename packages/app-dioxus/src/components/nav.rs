//! Navigation bars, the notification bell and the connection status dot.

use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::routes::Route;
use crate::services;

#[component]
pub fn NavBar() -> Element {
    let auth = use_auth();

    let handle_logout = move |_| {
        spawn(async move {
            services().session.logout().await;
        });
    };

    rsx! {
        nav {
            class: "bg-white border-b border-stone-200",
            div {
                class: "max-w-5xl mx-auto px-6 py-3 flex items-center justify-between",
                div {
                    class: "flex items-center gap-6",
                    Link {
                        to: Route::Dashboard {},
                        class: "font-bold text-red-700 text-lg",
                        "\u{1FA78} BloodLink"
                    }
                    Link { to: Route::Requests {}, class: "text-sm text-stone-600 hover:text-stone-900", "Requests" }
                    Link { to: Route::Donations {}, class: "text-sm text-stone-600 hover:text-stone-900", "Donations" }
                    Link { to: Route::Profile {}, class: "text-sm text-stone-600 hover:text-stone-900", "Profile" }
                    if auth.is_admin() {
                        Link { to: Route::AdminDashboard {}, class: "text-sm text-stone-600 hover:text-stone-900", "Admin" }
                    }
                }
                div {
                    class: "flex items-center gap-4",
                    ConnectionDot {}
                    NotificationBell {}
                    button {
                        class: "text-sm text-stone-500 hover:text-stone-900",
                        onclick: handle_logout,
                        "Sign out"
                    }
                }
            }
        }
    }
}

#[component]
pub fn AdminNav() -> Element {
    rsx! {
        nav {
            class: "bg-stone-100 border-b border-stone-200",
            div {
                class: "max-w-5xl mx-auto px-6 py-2 flex items-center gap-6",
                span { class: "text-xs font-semibold uppercase text-stone-400", "Admin" }
                Link { to: Route::AdminDashboard {}, class: "text-sm text-stone-600 hover:text-stone-900", "Overview" }
                Link { to: Route::AdminUsers {}, class: "text-sm text-stone-600 hover:text-stone-900", "Users" }
                Link { to: Route::AdminReports {}, class: "text-sm text-stone-600 hover:text-stone-900", "Reports" }
            }
        }
    }
}

/// Green while the realtime channel is up, grey otherwise. Exhausted
/// reconnect budgets end up here, not in an error dialog.
#[component]
fn ConnectionDot() -> Element {
    let mut connected = use_signal(|| false);

    use_effect(move || {
        spawn(async move {
            let mut rx = services().realtime.connection_status();
            loop {
                let current = *rx.borrow_and_update();
                connected.set(current);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    });

    let (class, title) = if connected() {
        ("w-2.5 h-2.5 rounded-full bg-green-500", "Live updates connected")
    } else {
        ("w-2.5 h-2.5 rounded-full bg-stone-300", "Live updates disconnected")
    };

    rsx! {
        span { class: class, title: title }
    }
}

#[component]
fn NotificationBell() -> Element {
    let mut unread = use_signal(|| 0u32);

    use_effect(move || {
        spawn(async move {
            let mut rx = services().feed.subscribe();
            loop {
                let count = rx.borrow_and_update().unread_count;
                unread.set(count);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    });

    rsx! {
        Link {
            to: Route::NotificationsPage {},
            class: "relative text-stone-600 hover:text-stone-900",
            span { class: "text-lg", "\u{1F514}" }
            if unread() > 0 {
                span {
                    class: "absolute -top-1 -right-2 bg-red-600 text-white text-xs rounded-full px-1.5",
                    "{unread}"
                }
            }
        }
    }
}
