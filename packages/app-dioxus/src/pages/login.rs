//! Login page

use client_core::types::LoginCredentials;
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::routes::Route;
use crate::services;

/// Login page
#[component]
pub fn Login() -> Element {
    let auth = use_auth();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut is_pending = use_signal(|| false);

    // Redirect if already authenticated
    if auth.is_authenticated() {
        let to = if auth.is_admin() {
            Route::AdminDashboard {}
        } else {
            Route::Dashboard {}
        };
        return rsx! {
            Redirect { to: to }
        };
    }

    // The session lands in the error state on failure; render its message.
    let error = auth.error_message();

    let handle_submit = move |_| {
        let email = email().trim().to_string();
        let password = password();
        if email.is_empty() || password.is_empty() {
            return;
        }

        spawn(async move {
            is_pending.set(true);
            // Outcome is observed through session state, not a return value.
            services()
                .session
                .login(LoginCredentials { email, password })
                .await;
            is_pending.set(false);
        });
    };

    rsx! {
        div {
            class: "min-h-screen flex items-center justify-center px-4",

            div {
                class: "bg-white rounded-lg shadow-md p-8 max-w-md w-full",

                div {
                    class: "mb-6 text-center",
                    h1 { class: "text-2xl font-bold text-stone-900 mb-2", "Sign in" }
                    p { class: "text-stone-600 text-sm", "BloodLink" }
                }

                if let Some(err) = error {
                    div {
                        class: "mb-4 p-3 bg-red-50 border border-red-200 text-red-800 rounded text-sm",
                        "{err}"
                    }
                }

                div {
                    class: "space-y-4",
                    div {
                        label { class: "block text-sm font-medium text-stone-700 mb-1", "Email" }
                        input {
                            class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                            r#type: "email",
                            value: "{email}",
                            oninput: move |e| email.set(e.value()),
                        }
                    }
                    div {
                        label { class: "block text-sm font-medium text-stone-700 mb-1", "Password" }
                        input {
                            class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                            r#type: "password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                    }
                    button {
                        class: "w-full bg-red-700 text-white rounded py-2 text-sm font-medium hover:bg-red-800 disabled:opacity-50",
                        disabled: is_pending(),
                        onclick: handle_submit,
                        if is_pending() { "Signing in..." } else { "Sign in" }
                    }
                }

                p {
                    class: "mt-6 text-center text-sm text-stone-600",
                    "No account yet? "
                    Link { to: Route::Register {}, class: "text-red-700 hover:underline", "Register" }
                }
            }
        }
    }
}
