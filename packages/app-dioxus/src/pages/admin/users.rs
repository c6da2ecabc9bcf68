//! Admin user directory with role filtering.

use client_core::types::{Role, User};
use dioxus::prelude::*;

use crate::services;

#[component]
pub fn AdminUsers() -> Element {
    let mut users = use_signal(Vec::<User>::new);
    let mut is_loading = use_signal(|| true);
    let mut role_filter = use_signal(|| None::<Role>);

    use_effect(move || {
        let role = role_filter();
        spawn(async move {
            is_loading.set(true);
            match services().users.list(role, None).await {
                Ok(items) => users.set(items),
                Err(e) => tracing::warn!(error = %e, "failed to load users"),
            }
            is_loading.set(false);
        });
    });

    rsx! {
        div {
            class: "max-w-5xl mx-auto p-6",
            div {
                class: "flex items-center justify-between mb-6",
                h1 { class: "text-2xl font-bold text-stone-900", "Users" }
                select {
                    class: "border border-stone-300 rounded px-2 py-1.5 text-sm",
                    onchange: move |e| {
                        role_filter.set(match e.value().as_str() {
                            "donor" => Some(Role::Donor),
                            "recipient" => Some(Role::Recipient),
                            "medical_admin" => Some(Role::MedicalAdmin),
                            "system_admin" => Some(Role::SystemAdmin),
                            _ => None,
                        });
                    },
                    option { value: "", "All roles" }
                    option { value: "donor", "Donors" }
                    option { value: "recipient", "Recipients" }
                    option { value: "medical_admin", "Medical admins" }
                    option { value: "system_admin", "System admins" }
                }
            }

            if is_loading() {
                div { class: "text-center py-12 text-stone-500", "Loading..." }
            } else {
                div {
                    class: "bg-white rounded-lg shadow-sm border border-stone-200 divide-y divide-stone-200",
                    for user in users() {
                        UserRow { user: user }
                    }
                }
            }
        }
    }
}

#[component]
fn UserRow(user: User) -> Element {
    let name = user.full_name();
    let role = user.role.label();
    let blood = user.blood_type.map(|bt| bt.label()).unwrap_or("-");
    let verified = user.is_fully_verified();

    rsx! {
        div {
            class: "p-4 flex items-center justify-between",
            div {
                class: "flex-1 min-w-0",
                h3 { class: "text-sm font-medium text-stone-900 truncate", "{name}" }
                p { class: "text-sm text-stone-500", "{user.email}" }
            }
            div {
                class: "flex items-center gap-3 text-sm",
                span { class: "text-red-700 font-medium", "{blood}" }
                span { class: "px-2 py-0.5 bg-stone-100 rounded text-xs text-stone-600", "{role}" }
                if verified {
                    span { class: "text-green-600 text-xs", "verified" }
                } else {
                    span { class: "text-stone-400 text-xs", "unverified" }
                }
            }
        }
    }
}
