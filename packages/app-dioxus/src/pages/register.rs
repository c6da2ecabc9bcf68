//! Registration page

use client_core::types::{BloodType, NewUser, Role};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::routes::Route;
use crate::services;

/// Registration page. Tokens come straight from the registration response,
/// so a successful submit lands the user on their dashboard.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut first_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut role = use_signal(|| Role::Donor);
    let mut blood_type = use_signal(|| None::<BloodType>);
    let mut is_pending = use_signal(|| false);

    if auth.is_authenticated() {
        return rsx! {
            Redirect { to: Route::Dashboard {} }
        };
    }

    let error = auth.error_message();

    let handle_submit = move |_| {
        let email = email().trim().to_string();
        if email.is_empty() || password().is_empty() || first_name().is_empty() {
            return;
        }

        spawn(async move {
            is_pending.set(true);
            services()
                .session
                .register(NewUser {
                    email,
                    password: password(),
                    first_name: first_name().trim().to_string(),
                    last_name: last_name().trim().to_string(),
                    role: role(),
                    blood_type: blood_type(),
                    phone: None,
                    city: None,
                })
                .await;
            is_pending.set(false);
        });
    };

    rsx! {
        div {
            class: "min-h-screen flex items-center justify-center px-4 py-8",

            div {
                class: "bg-white rounded-lg shadow-md p-8 max-w-md w-full",

                h1 { class: "text-2xl font-bold text-stone-900 mb-6 text-center", "Create account" }

                if let Some(err) = error {
                    div {
                        class: "mb-4 p-3 bg-red-50 border border-red-200 text-red-800 rounded text-sm",
                        "{err}"
                    }
                }

                div {
                    class: "space-y-4",
                    div {
                        class: "grid grid-cols-2 gap-3",
                        div {
                            label { class: "block text-sm font-medium text-stone-700 mb-1", "First name" }
                            input {
                                class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                                value: "{first_name}",
                                oninput: move |e| first_name.set(e.value()),
                            }
                        }
                        div {
                            label { class: "block text-sm font-medium text-stone-700 mb-1", "Last name" }
                            input {
                                class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                                value: "{last_name}",
                                oninput: move |e| last_name.set(e.value()),
                            }
                        }
                    }
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
                    div {
                        label { class: "block text-sm font-medium text-stone-700 mb-1", "I am a" }
                        select {
                            class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                            onchange: move |e| {
                                role.set(if e.value() == "recipient" {
                                    Role::Recipient
                                } else {
                                    Role::Donor
                                });
                            },
                            option { value: "donor", "Donor" }
                            option { value: "recipient", "Recipient" }
                        }
                    }
                    div {
                        label { class: "block text-sm font-medium text-stone-700 mb-1", "Blood type (if known)" }
                        select {
                            class: "w-full border border-stone-300 rounded px-3 py-2 text-sm",
                            onchange: move |e| {
                                let picked = BloodType::variants()
                                    .iter()
                                    .find(|bt| bt.label() == e.value())
                                    .copied();
                                blood_type.set(picked);
                            },
                            option { value: "", "Unknown" }
                            for label in BloodType::variants().iter().map(|bt| bt.label()) {
                                option { value: label, "{label}" }
                            }
                        }
                    }
                    button {
                        class: "w-full bg-red-700 text-white rounded py-2 text-sm font-medium hover:bg-red-800 disabled:opacity-50",
                        disabled: is_pending(),
                        onclick: handle_submit,
                        if is_pending() { "Creating account..." } else { "Register" }
                    }
                }

                p {
                    class: "mt-6 text-center text-sm text-stone-600",
                    "Already registered? "
                    Link { to: Route::Login {}, class: "text-red-700 hover:underline", "Sign in" }
                }
            }
        }
    }
}
